use std::fmt;

use async_trait::async_trait;

use crate::Result;

/// A generative language model reachable through a prompt-in, JSON-text-out call.
#[async_trait]
pub trait CaptionModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Sends `prompt` once and returns the raw response text, expected to be JSON.
    async fn complete_json(&self, prompt: &str) -> Result<String>;
}
