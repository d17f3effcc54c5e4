use std::path::PathBuf;
use std::sync::Arc;

use ig_core::{AngleStore, Error, Result};

pub mod backends;

pub use backends::*;

pub const DEFAULT_HISTORY_FILE: &str = "instagram_post_history.json";

/// Builds the history backend named `kind` (`json` or `memory`).
pub fn create_storage(kind: &str, path: Option<PathBuf>) -> Result<Arc<dyn AngleStore>> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "json" => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE));
            tracing::debug!("Using JSON history at {}", path.display());
            Ok(Arc::new(JsonFileStore::new(path)))
        }
        "memory" => Ok(Arc::new(MemoryStore::new())),
        other => Err(Error::Config(format!(
            "Unknown storage backend: {} (expected json or memory)",
            other
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, DEFAULT_HISTORY_FILE};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_storage() {
        assert_eq!(create_storage("json", None).unwrap().name(), "json");
        assert_eq!(create_storage("Memory", None).unwrap().name(), "memory");
        assert!(matches!(
            create_storage("sqlite", None),
            Err(Error::Config(_))
        ));
    }
}
