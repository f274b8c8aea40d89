pub mod error;
pub mod identity;
pub mod job;
pub mod models;
pub mod stats;
pub mod storage;
pub mod types;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use job::{HarvestJob, HarvestRequest, JobStatus};
pub use models::{
    AnalysisResult, EmotionCategory, EmotionMetrics, EmotionScores, EngagementMetrics, SeoMetrics,
    StructureMetrics, WeightedKeyword,
};
pub use stats::DashboardStats;
pub use storage::ArticleStorage;
pub use types::{
    AnalysisRecord, Article, ArticleId, ArticlePage, ArticleQuery, Category, TemplateRecord,
    WritingTemplate,
};
