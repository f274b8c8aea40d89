//! Swappable scoring heuristics.
//!
//! Each heuristic is a strategy object so the lexicon-based defaults can be
//! replaced without touching the analyzer.

use std::fmt;
use wa_core::{EmotionMetrics, SeoMetrics, WeightedKeyword};

pub mod emotion;
pub mod engagement;
pub mod keywords;
pub mod seo;
pub mod structure;

pub use emotion::LexiconEmotionModel;
pub use keywords::TfIdfKeywordExtractor;
pub use seo::TitleLengthSeoModel;

pub trait EmotionModel: Send + Sync + fmt::Debug {
    /// Scores the concatenated title and content.
    fn score(&self, text: &str) -> EmotionMetrics;
}

pub trait SeoModel: Send + Sync + fmt::Debug {
    fn score(&self, title: &str, content: &str) -> SeoMetrics;
}

pub trait KeywordExtractor: Send + Sync + fmt::Debug {
    /// At most `top_k` keywords, heaviest first.
    fn extract(&self, text: &str, top_k: usize) -> Vec<WeightedKeyword>;
}

/// Length in Unicode scalar values, the unit every metric is counted in.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
