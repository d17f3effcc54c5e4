use std::fmt;

use async_trait::async_trait;
use ig_core::{CaptionModel, Result};
use tokio::sync::Mutex;

const DEFAULT_RESPONSE: &str = r#"{
  "instagram_post": {
    "caption_text": "En ny vinkel på dagens artikel.\n\nLänk i bio 👆\n\n#nyheter #läsning",
    "angle_description": "A first look at the article's main idea."
  }
}"#;

/// Offline model returning a canned response. Records every prompt it sees.
pub struct DummyModel {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::with_response(DEFAULT_RESPONSE)
    }

    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl CaptionModel for DummyModel {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn complete_json(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().await.push(prompt.to_string());
        Ok(self.response.clone())
    }
}
