use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ig_core::{AngleHistory, AngleStore, Result};
use tokio::sync::RwLock;

/// Process-local history, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    history: RwLock<AngleHistory>,
    persists: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: AngleHistory) -> Self {
        Self {
            history: RwLock::new(history),
            persists: AtomicUsize::new(0),
        }
    }

    pub async fn snapshot(&self) -> AngleHistory {
        self.history.read().await.clone()
    }

    /// Number of successful `persist` calls so far.
    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AngleStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> AngleHistory {
        self.snapshot().await
    }

    async fn persist(&self, history: &AngleHistory) -> Result<()> {
        *self.history.write().await = history.clone();
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
