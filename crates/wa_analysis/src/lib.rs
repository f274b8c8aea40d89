pub mod analyzer;
pub mod heuristics;
pub mod templates;

pub use analyzer::{composite_score, Analyzer};
pub use heuristics::{EmotionModel, KeywordExtractor, SeoModel};
pub use templates::TemplateGenerator;

pub mod prelude {
    pub use super::analyzer::Analyzer;
    pub use super::templates::TemplateGenerator;
    pub use wa_core::{AnalysisResult, Error, Result};
}
