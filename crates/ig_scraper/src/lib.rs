pub mod extractor;
pub mod fetcher;

pub use extractor::extract;
pub use fetcher::{ArticleFetcher, DEFAULT_FETCH_TIMEOUT};

pub mod prelude {
    pub use super::extractor::extract;
    pub use super::fetcher::ArticleFetcher;
    pub use ig_core::{ArticleRecord, Error, Result};
}
