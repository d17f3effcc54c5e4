use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Angles already used per article URL, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<String>>",
    into = "BTreeMap<String, Vec<String>>"
)]
pub struct AngleHistory {
    entries: BTreeMap<String, Vec<String>>,
}

impl AngleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn angles_for(&self, url: &str) -> &[String] {
        self.entries.get(url).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Appends `angle` to the list for `url` unless it is blank or already there.
    /// Returns whether the history changed.
    pub fn record(&mut self, url: &str, angle: &str) -> bool {
        if angle.trim().is_empty() {
            return false;
        }
        let angles = self.entries.entry(url.to_string()).or_default();
        if angles.iter().any(|a| a == angle) {
            return false;
        }
        angles.push(angle.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, Vec<String>>> for AngleHistory {
    fn from(raw: BTreeMap<String, Vec<String>>) -> Self {
        let mut history = AngleHistory::new();
        for (url, angles) in raw {
            for angle in angles {
                history.record(&url, &angle);
            }
        }
        history
    }
}

impl From<AngleHistory> for BTreeMap<String, Vec<String>> {
    fn from(history: AngleHistory) -> Self {
        history.entries
    }
}

/// What happened to the history after a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// The result carried no angle description.
    NoAngle,
    /// The angle was already recorded for this URL; nothing was written.
    Unchanged(String),
    Saved(String),
    WriteFailed { angle: String, error: String },
}

impl fmt::Display for HistoryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryOutcome::NoAngle => write!(f, "no angle reported"),
            HistoryOutcome::Unchanged(angle) => write!(f, "angle already known: '{}'", angle),
            HistoryOutcome::Saved(angle) => write!(f, "saved new angle: '{}'", angle),
            HistoryOutcome::WriteFailed { angle, error } => {
                write!(f, "could not save angle '{}': {}", angle, error)
            }
        }
    }
}

#[async_trait]
pub trait AngleStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Reads the stored history. Missing or unreadable state yields an empty history.
    async fn load(&self) -> AngleHistory;

    /// Replaces the stored history with `history`.
    async fn persist(&self, history: &AngleHistory) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_once() {
        let mut history = AngleHistory::new();
        assert!(history.record("https://a", "health angle"));
        assert!(!history.record("https://a", "health angle"));
        assert_eq!(history.angles_for("https://a"), ["health angle".to_string()]);
    }

    #[test]
    fn test_record_keeps_order_per_url() {
        let mut history = AngleHistory::new();
        history.record("https://a", "first");
        history.record("https://b", "first");
        history.record("https://a", "second");
        assert_eq!(history.angles_for("https://a"), ["first", "second"]);
        assert_eq!(history.angles_for("https://b"), ["first"]);
        assert!(history.angles_for("https://c").is_empty());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_blank_angle_is_ignored() {
        let mut history = AngleHistory::new();
        assert!(!history.record("https://a", "   "));
        assert!(history.is_empty());
    }

    #[test]
    fn test_deserialize_collapses_duplicates() {
        let history: AngleHistory =
            serde_json::from_str(r#"{"https://a": ["x", "y", "x"], "https://b": []}"#).unwrap();
        assert_eq!(history.angles_for("https://a"), ["x", "y"]);
        assert_eq!(history.len(), 1);
        assert!(history.angles_for("https://b").is_empty());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut history = AngleHistory::new();
        history.record("https://a", "hälsa");
        let text = serde_json::to_string(&history).unwrap();
        assert_eq!(text, r#"{"https://a":["hälsa"]}"#);
    }
}
