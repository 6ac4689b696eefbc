pub mod analyzer;
pub mod llm;
pub mod model;
pub mod recommend;
pub mod report;
pub mod score;
pub mod store;

pub use analyzer::{AnalyzeError, AnalyzerConfig, WebsiteAnalyzer};
pub use model::{AnalysisResult, Category, CategoryScores, Impact, Recommendation};
pub use store::{CacheEntry, MemoryStore, ResultStore, SqliteStore};
