use std::time::Duration;

use ig_core::{ArticleRecord, Error, Result};
use reqwest::Client;
use url::Url;

use crate::extractor;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "IgCaptionAgent/1.0 (article extraction)";

/// Downloads one article page and hands it to the extractor.
#[derive(Debug, Clone)]
pub struct ArticleFetcher {
    client: Client,
}

impl ArticleFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Extraction(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Fetches the raw HTML of `url`. Any transport failure or non-2xx status is an
    /// extraction failure; an unparsable URL is rejected before any request.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| Error::Extraction(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Extraction(format!(
                "{} returned status {}",
                url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Extraction(format!("Failed to read body of {}: {}", url, e)))
    }

    pub async fn scrape(&self, url: &str) -> Result<ArticleRecord> {
        let html = self.fetch(url).await?;
        tracing::debug!("Fetched {} bytes from {}", html.len(), url);
        extractor::extract(&html, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_scrape_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/en/story"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><head><meta property="og:title" content="Story"></head>
                <body><h2>Part one</h2></body></html>"#,
            ))
            .mount(&server)
            .await;

        let url = format!("{}/en/story", server.uri());
        let fetcher = ArticleFetcher::new().unwrap();
        let article = fetcher.scrape(&url).await.unwrap();
        assert_eq!(article.url, url);
        assert_eq!(article.title, "Story");
        assert_eq!(article.structure, vec!["Part one"]);
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = ArticleFetcher::new().unwrap();
        let err = fetcher
            .scrape(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(ref msg) if msg.contains("404")));
    }

    #[tokio::test]
    async fn test_timeout_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let fetcher = ArticleFetcher::with_timeout(Duration::from_millis(50)).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_fails() {
        let fetcher = ArticleFetcher::new().unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(ref msg) if msg.contains("not a url")));
        assert!(err.is_fatal());
    }
}
