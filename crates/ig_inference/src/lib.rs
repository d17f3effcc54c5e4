use std::fmt;

pub mod generator;
pub mod language;
pub mod models;
pub mod normalize;
pub mod prompt;

#[derive(Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    /// Overrides the hosted API base URL.
    pub base_url: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

pub mod prelude {
    pub use super::generator::CaptionGenerator;
    pub use super::models::create_model;
    pub use super::normalize::{normalize, record_angle};
    pub use super::Config;
    pub use ig_core::{ArticleRecord, Error, GenerationResult, Language, Result};
}

pub use generator::CaptionGenerator;
pub use language::{detect_language, resolve_language};
pub use models::{create_model, requires_api_key, DEFAULT_MODEL};
pub use normalize::{clean_caption, normalize, record_angle};
pub use prompt::build_prompt;
