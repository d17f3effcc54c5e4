use std::sync::Arc;

use ig_core::{
    ArticleRecord, CaptionLocation, CaptionModel, Error, InstagramPost, Language, RawGeneration,
    Result,
};
use serde_json::{Map, Value};

use crate::language::resolve_language;
use crate::prompt::build_prompt;

/// Composes the prompt, makes the single model call and resolves the response shape.
#[derive(Debug, Clone)]
pub struct CaptionGenerator {
    model: Arc<dyn CaptionModel>,
}

impl CaptionGenerator {
    pub fn new(model: Arc<dyn CaptionModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn generate(
        &self,
        article: &ArticleRecord,
        prior_angles: &[String],
        language_hint: Option<Language>,
    ) -> Result<RawGeneration> {
        let language = resolve_language(language_hint, &article.url);
        let prompt = build_prompt(article, language, prior_angles)?;

        tracing::info!(
            "Generating {} caption with {} ({} previous angles)",
            language,
            self.model.name(),
            prior_angles.len()
        );

        let text = self.model.complete_json(&prompt).await?;
        parse_response(&text, language)
    }
}

/// Strips a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    match body.find('\n') {
        Some(idx) if !body[..idx].trim_start().starts_with('{') => body[idx + 1..].trim(),
        _ => body.trim(),
    }
}

/// Removes `key`, keeping its value only when it is a string.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

/// Reads the nested post, dropping non-string caption and angle values.
/// The flag says whether a string caption was present.
fn nested_post(mut post: Map<String, Value>) -> (InstagramPost, bool) {
    let caption_text = take_string(&mut post, "caption_text");
    let has_caption = caption_text.is_some();
    let post = InstagramPost {
        caption_text: caption_text.unwrap_or_default(),
        angle_description: take_string(&mut post, "angle_description").unwrap_or_default(),
        extra: post,
    };
    (post, has_caption)
}

/// Resolves the loosely-shaped model output into a [`RawGeneration`].
pub fn parse_response(text: &str, language: Language) -> Result<RawGeneration> {
    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| Error::Generation(format!("Model returned invalid JSON: {}", e)))?;

    let Value::Object(mut extra) = value else {
        return Err(Error::Generation(
            "Model response is not a JSON object".to_string(),
        ));
    };

    let post_text = take_string(&mut extra, "post_text");
    // The model's own language claim is replaced by the detected one.
    extra.remove("language");
    let article_url = take_string(&mut extra, "article_url");
    let image_url = take_string(&mut extra, "image_url");
    let title = take_string(&mut extra, "title");

    let instagram_post = match extra.remove("instagram_post") {
        Some(Value::Object(post)) => Some(nested_post(post)),
        Some(other) => {
            extra.insert("instagram_post".to_string(), other);
            None
        }
        None => None,
    };

    let caption = if let Some(text) = post_text {
        CaptionLocation::TopLevel(text)
    } else if let Some((post, has_caption)) = instagram_post.as_ref() {
        if !has_caption {
            return Err(Error::Generation(
                "Model response contains no caption text".to_string(),
            ));
        }
        CaptionLocation::Nested(post.caption_text.clone())
    } else if let Some(text) = take_string(&mut extra, "caption_text") {
        CaptionLocation::TopLevel(text)
    } else {
        return Err(Error::Generation(
            "Model response contains no caption text".to_string(),
        ));
    };

    Ok(RawGeneration {
        caption,
        language,
        instagram_post: instagram_post.map(|(post, _)| post),
        article_url,
        image_url,
        title,
        extra,
    })
}
