use std::collections::BTreeSet;

use ig_core::{ArticleRecord, Error, Result, CONTENT_CAP, UNTITLED_ARTICLE};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Paragraphs at or below this many characters are treated as navigation or footer noise.
const MIN_PARAGRAPH_CHARS: usize = 40;

/// Turns an article page into an [`ArticleRecord`].
pub fn extract(html: &str, url: &str) -> Result<ArticleRecord> {
    let document = Html::parse_document(html);

    let title = extract_title(&document)?;
    let structure = extract_texts(&document, "h2, h3")?;
    let content = extract_content(&document)?;
    let image_url = extract_image_url(&document, url)?;
    let source_tags = extract_tags(&document)?;

    tracing::debug!(
        url,
        title = %title,
        headings = structure.len(),
        content_chars = content.chars().count(),
        tags = source_tags.len(),
        has_image = !image_url.is_empty(),
        "Extracted article"
    );

    Ok(ArticleRecord {
        url: url.to_string(),
        title,
        structure,
        content,
        image_url,
        source_tags,
    })
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Extraction(format!("Invalid selector {}: {}", css, e)))
}

/// Element text with whitespace runs collapsed to single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_texts(document: &Html, css: &str) -> Result<Vec<String>> {
    let selector = selector(css)?;
    Ok(document.select(&selector).map(element_text).collect())
}

fn first_text(document: &Html, css: &str) -> Result<Option<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty()))
}

/// `content` attributes of all matching meta tags, trimmed, empties dropped.
fn meta_contents(document: &Html, css: &str) -> Result<Vec<String>> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .collect())
}

fn first_meta(document: &Html, css: &str) -> Result<Option<String>> {
    Ok(meta_contents(document, css)?.into_iter().next())
}

fn extract_title(document: &Html) -> Result<String> {
    if let Some(title) = first_meta(document, r#"meta[property="og:title"]"#)? {
        return Ok(title);
    }
    if let Some(title) = first_text(document, "h1")? {
        return Ok(title);
    }
    if let Some(title) = first_text(document, "title")? {
        return Ok(title);
    }
    Ok(UNTITLED_ARTICLE.to_string())
}

fn extract_content(document: &Html) -> Result<String> {
    let paragraphs = extract_texts(document, "p")?
        .into_iter()
        .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect::<Vec<_>>();

    Ok(truncate_chars(&paragraphs.join("\n\n"), CONTENT_CAP).to_string())
}

fn truncate_chars(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn extract_image_url(document: &Html, page_url: &str) -> Result<String> {
    let candidate = match first_meta(document, r#"meta[property="og:image"]"#)? {
        Some(image) => Some(image),
        None => first_meta(
            document,
            r#"meta[name="twitter:image"], meta[property="twitter:image"]"#,
        )?,
    };

    Ok(candidate
        .map(|image| force_https(&resolve_url(&image, page_url)))
        .unwrap_or_default())
}

/// Resolves a relative image reference against the article URL.
fn resolve_url(raw: &str, page_url: &str) -> String {
    match Url::parse(raw) {
        Ok(_) => raw.to_string(),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(page_url)
            .and_then(|base| base.join(raw))
            .map(|joined| joined.to_string())
            .unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

fn extract_tags(document: &Html) -> Result<BTreeSet<String>> {
    let mut tags = BTreeSet::new();

    for keywords in meta_contents(document, r#"meta[name="keywords"]"#)? {
        tags.extend(
            keywords
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string),
        );
    }
    tags.extend(meta_contents(document, r#"meta[property="article:tag"]"#)?);

    Ok(tags)
}
