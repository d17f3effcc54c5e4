use std::sync::Arc;

use ig_core::{CaptionModel, Error, Result};

use crate::Config;

pub mod dummy;
pub mod gemini;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Whether `model_name` names a hosted Gemini model, which needs a key.
pub fn requires_api_key(model_name: &str) -> bool {
    model_name.trim().to_ascii_lowercase().starts_with("gemini")
}

pub async fn create_model(config: Option<Config>) -> Result<Arc<dyn CaptionModel>> {
    let config = config.unwrap_or_default();
    let model_name = config
        .model_name
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    match model_name.trim().to_ascii_lowercase().as_str() {
        "dummy" => Ok(Arc::new(dummy::DummyModel::new())),
        name if requires_api_key(name) => {
            let api_key = config
                .api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| {
                    Error::Config(
                        "No API key found. Set GEMINI_API_KEY or GOOGLE_API_KEY".to_string(),
                    )
                })?;
            Ok(Arc::new(gemini::GeminiModel::new(
                api_key,
                model_name.trim().to_string(),
                config.base_url,
            )?))
        }
        _ => Err(Error::Config(format!("Unknown model: {}", model_name))),
    }
}
