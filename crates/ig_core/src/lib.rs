pub mod error;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::CaptionModel;
pub use storage::{AngleHistory, AngleStore, HistoryOutcome};
pub use types::{
    ArticleRecord, CaptionLocation, GenerationResult, InstagramPost, Language, RawGeneration,
    CONTENT_CAP, UNTITLED_ARTICLE,
};
