use std::sync::Arc;

use ig_core::{AngleStore, ArticleRecord, GenerationResult, HistoryOutcome, Language, Result};
use ig_inference::{create_model, normalize, record_angle, CaptionGenerator};
use ig_scraper::ArticleFetcher;
use ig_storage::create_storage;

use crate::config::Cli;

#[derive(Debug)]
pub struct RunOutcome {
    pub article: ArticleRecord,
    pub result: GenerationResult,
    pub history: HistoryOutcome,
}

/// One article in, one caption out: fetch, extract, generate, normalize, remember the angle.
pub struct CaptionAgent {
    fetcher: ArticleFetcher,
    generator: CaptionGenerator,
    store: Arc<dyn AngleStore>,
    language: Option<Language>,
}

impl CaptionAgent {
    pub fn new(
        fetcher: ArticleFetcher,
        generator: CaptionGenerator,
        store: Arc<dyn AngleStore>,
    ) -> Self {
        Self {
            fetcher,
            generator,
            store,
            language: None,
        }
    }

    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    /// Builds every collaborator from the command line. Fails before any network
    /// call when the model needs a key and none is set.
    pub async fn from_cli(cli: &Cli) -> Result<Self> {
        let model = create_model(Some(cli.inference_config())).await?;
        tracing::info!("🧠 Using model {}", model.name());

        let store = create_storage(&cli.storage, Some(cli.history_file.clone()))?;
        tracing::debug!("Angle history backend: {}", store.name());

        let fetcher = ArticleFetcher::with_timeout(cli.fetch_timeout.0)?;

        Ok(Self::new(fetcher, CaptionGenerator::new(model), store).with_language(cli.language))
    }

    pub async fn run(&self, url: &str) -> Result<RunOutcome> {
        tracing::info!("Processing article: {}", url);
        let article = self.fetcher.scrape(url).await?;
        tracing::info!("Found title: {}", article.title);

        let mut history = self.store.load().await;
        let prior_angles = history.angles_for(url).to_vec();

        let raw = self
            .generator
            .generate(&article, &prior_angles, self.language)
            .await?;
        let result = normalize(raw, &article);

        let outcome = record_angle(self.store.as_ref(), &mut history, url, &result).await;

        Ok(RunOutcome {
            article,
            result,
            history: outcome,
        })
    }
}
