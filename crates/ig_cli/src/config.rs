use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use ig_core::Language;
use ig_inference::{Config, DEFAULT_MODEL};
use ig_storage::DEFAULT_HISTORY_FILE;

const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_number = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_number = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number counts as seconds
        if !current_number.is_empty() {
            total_seconds += current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            has_number = true;
        }

        if !has_number {
            return Err("Duration must include a number".to_string());
        }
        if total_seconds == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

/// Turns one article into an Instagram caption and optionally posts it to a webhook.
#[derive(Parser, Debug)]
#[command(name = "ig", author, version, about, long_about = None)]
pub struct Cli {
    /// URL of the article to process
    pub url: String,

    /// Webhook that receives the generated JSON
    #[arg(long, env = "IG_WEBHOOK_URL")]
    pub webhook: Option<String>,

    /// Only print the JSON, never call the webhook
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, env = "IG_HISTORY_FILE", default_value = DEFAULT_HISTORY_FILE)]
    pub history_file: PathBuf,

    /// Angle history backend: json or memory
    #[arg(long, default_value = "json")]
    pub storage: String,

    #[arg(long, env = "IG_MODEL", default_value = DEFAULT_MODEL, help = "Model to use. Available models: gemini-* (default gemini-2.0-flash-lite), dummy")]
    pub model: String,

    /// Caption language (sv or en); detected from the URL when omitted
    #[arg(long)]
    pub language: Option<Language>,

    /// Article download timeout (e.g. 10s, 1m30s)
    #[arg(long, default_value = "10s")]
    pub fetch_timeout: HumanDuration,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn inference_config(&self) -> Config {
        Config {
            api_key: resolve_api_key(|name| std::env::var(name).ok()),
            model_name: Some(self.model.clone()),
            base_url: None,
        }
    }
}

/// First non-blank value of `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
pub fn resolve_api_key<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

/// Loads `.env` from the working directory. A missing file is not an error.
pub fn load_dotenv() -> std::result::Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_human_duration() {
        let parse = |s: &str| s.parse::<HumanDuration>().map(|d| d.0.as_secs());
        assert_eq!(parse("10s"), Ok(10));
        assert_eq!(parse("1m30s"), Ok(90));
        assert_eq!(parse("1h 5m"), Ok(3900));
        assert_eq!(parse("45"), Ok(45));
        assert!(parse("").is_err());
        assert!(parse("0s").is_err());
        assert!(parse("5d").is_err());
        assert!(parse("abc").is_err());
    }

    #[test]
    fn test_resolve_api_key_fallback() {
        let env = HashMap::from([
            ("GEMINI_API_KEY", "  ".to_string()),
            ("GOOGLE_API_KEY", "google-key".to_string()),
        ]);
        assert_eq!(
            resolve_api_key(|name| env.get(name).cloned()),
            Some("google-key".to_string())
        );

        let env = HashMap::from([
            ("GEMINI_API_KEY", "gemini-key".to_string()),
            ("GOOGLE_API_KEY", "google-key".to_string()),
        ]);
        assert_eq!(
            resolve_api_key(|name| env.get(name).cloned()),
            Some("gemini-key".to_string())
        );

        assert_eq!(resolve_api_key(|_| None), None);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "ig",
            "https://site.com/en/story",
            "--dry-run",
            "--language",
            "en",
            "--storage",
            "memory",
            "--model",
            "dummy",
            "--fetch-timeout",
            "1m30s",
        ])
        .unwrap();
        assert_eq!(cli.url, "https://site.com/en/story");
        assert!(cli.dry_run);
        assert_eq!(cli.language, Some(Language::En));
        assert_eq!(cli.storage, "memory");
        assert_eq!(cli.fetch_timeout, HumanDuration(Duration::from_secs(90)));
        assert_eq!(cli.inference_config().model_name.as_deref(), Some("dummy"));
    }

    #[test]
    fn test_cli_rejects_bad_language() {
        assert!(Cli::try_parse_from(["ig", "https://x", "--language", "de"]).is_err());
        assert!(Cli::try_parse_from(["ig"]).is_err());
    }
}
