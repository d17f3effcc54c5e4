use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upper bound on `ArticleRecord::content`, in characters.
pub const CONTENT_CAP: usize = 15_000;

/// Title used when a page offers none of the usual title sources.
pub const UNTITLED_ARTICLE: &str = "Untitled Article";

/// Structured view of one article page, produced once per run by the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    /// Second and third level headings, in document order.
    pub structure: Vec<String>,
    pub content: String,
    /// Empty when the page carries no Open Graph or Twitter card image.
    pub image_url: String,
    pub source_tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Sv,
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Sv => "sv",
            Language::En => "en",
        }
    }

    /// Call-to-action pointing readers at the profile link.
    pub fn link_in_bio(&self) -> &'static str {
        match self {
            Language::Sv => "Länk i bio",
            Language::En => "Link in bio",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sv" => Ok(Language::Sv),
            "en" => Ok(Language::En),
            other => Err(crate::Error::Config(format!(
                "Unsupported language: {} (expected sv or en)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstagramPost {
    #[serde(default)]
    pub caption_text: String,
    #[serde(default)]
    pub angle_description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Where the model put the caption text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionLocation {
    /// `post_text` (or a flat `caption_text`) at the root of the response.
    TopLevel(String),
    /// `instagram_post.caption_text`.
    Nested(String),
}

impl CaptionLocation {
    pub fn text(&self) -> &str {
        match self {
            CaptionLocation::TopLevel(text) | CaptionLocation::Nested(text) => text,
        }
    }
}

/// A model response after shape resolution, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGeneration {
    pub caption: CaptionLocation,
    pub language: Language,
    pub instagram_post: Option<InstagramPost>,
    pub article_url: Option<String>,
    pub image_url: Option<String>,
    pub title: Option<String>,
    /// Any other top-level keys the model returned.
    pub extra: Map<String, Value>,
}

/// The final output artifact of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub post_text: String,
    pub language: Language,
    #[serde(default)]
    pub article_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_post: Option<InstagramPost>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationResult {
    /// Fills the identity fields the model left empty from the extracted article.
    pub fn backfill(&mut self, article: &ArticleRecord) {
        if self.article_url.trim().is_empty() {
            self.article_url = article.url.clone();
        }
        if self.image_url.trim().is_empty() {
            self.image_url = article.image_url.clone();
        }
        if self.title.trim().is_empty() {
            self.title = article.title.clone();
        }
    }

    /// The angle this caption used: the nested post's description when the
    /// nested object exists, otherwise a top-level `angle_description`.
    pub fn angle_description(&self) -> Option<&str> {
        let angle = match &self.instagram_post {
            Some(post) => Some(post.angle_description.as_str()),
            None => self.extra.get("angle_description").and_then(Value::as_str),
        };
        angle.map(str::trim).filter(|a| !a.is_empty())
    }

    /// Pretty, non-ASCII preserving JSON for stdout and the webhook.
    pub fn to_pretty_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
