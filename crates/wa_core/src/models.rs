use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureMetrics {
    pub title_length: usize,
    pub content_length: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_sentence_length: f64,
}

/// Lexical emotion categories, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Positive,
    Negative,
    Urgent,
    Exclusive,
}

impl EmotionCategory {
    pub const ALL: [EmotionCategory; 4] = [
        EmotionCategory::Positive,
        EmotionCategory::Negative,
        EmotionCategory::Urgent,
        EmotionCategory::Exclusive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionCategory::Positive => "positive",
            EmotionCategory::Negative => "negative",
            EmotionCategory::Urgent => "urgent",
            EmotionCategory::Exclusive => "exclusive",
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionScores {
    pub positive: usize,
    pub negative: usize,
    pub urgent: usize,
    pub exclusive: usize,
}

impl EmotionScores {
    pub fn get(&self, category: EmotionCategory) -> usize {
        match category {
            EmotionCategory::Positive => self.positive,
            EmotionCategory::Negative => self.negative,
            EmotionCategory::Urgent => self.urgent,
            EmotionCategory::Exclusive => self.exclusive,
        }
    }

    pub fn set(&mut self, category: EmotionCategory, hits: usize) {
        match category {
            EmotionCategory::Positive => self.positive = hits,
            EmotionCategory::Negative => self.negative = hits,
            EmotionCategory::Urgent => self.urgent = hits,
            EmotionCategory::Exclusive => self.exclusive = hits,
        }
    }

    pub fn total(&self) -> usize {
        EmotionCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionMetrics {
    pub emotion_scores: EmotionScores,
    pub emotion_intensity: f64,
    pub dominant_emotion: Option<EmotionCategory>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub question_count: usize,
    pub exclamation_count: usize,
    pub number_count: usize,
    pub call_to_action: usize,
}

impl EngagementMetrics {
    /// Interaction cues counted by the engagement gate. Numerals are excluded.
    pub fn interaction_total(&self) -> usize {
        self.question_count + self.exclamation_count + self.call_to_action
    }
}

/// Only `title_length_optimal` is computed. The remaining fields are fixed
/// stand-ins and `placeholder` is set whenever they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoMetrics {
    pub title_length_optimal: bool,
    pub keyword_in_title: bool,
    pub readability_score: u32,
    pub keyword_density: f64,
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedKeyword {
    pub word: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub structure: StructureMetrics,
    pub emotion: EmotionMetrics,
    pub engagement: EngagementMetrics,
    pub seo: SeoMetrics,
    pub keywords: Vec<WeightedKeyword>,
    pub score: u8,
}
