use tracing::debug;
use wa_core::{
    AnalysisResult, EmotionMetrics, EngagementMetrics, SeoMetrics, StructureMetrics,
};

use crate::heuristics::{
    engagement::analyze_engagement, seo::title_length_optimal, structure::analyze_structure,
    EmotionModel, KeywordExtractor, LexiconEmotionModel, SeoModel, TfIdfKeywordExtractor,
    TitleLengthSeoModel,
};

pub const TOP_KEYWORDS: usize = 10;

pub const STRUCTURE_POINTS: u32 = 30;
pub const EMOTION_POINTS: u32 = 25;
pub const ENGAGEMENT_POINTS: u32 = 25;
pub const SEO_POINTS: u32 = 20;

pub const EMOTION_INTENSITY_GATE: f64 = 5.0;
pub const ENGAGEMENT_GATE: usize = 3;

/// Composite score: four independent pass/fail gates, capped at 100.
pub fn composite_score(
    structure: &StructureMetrics,
    emotion: &EmotionMetrics,
    engagement: &EngagementMetrics,
    seo: &SeoMetrics,
) -> u8 {
    let mut score = 0;
    if title_length_optimal(structure.title_length) {
        score += STRUCTURE_POINTS;
    }
    if emotion.emotion_intensity > EMOTION_INTENSITY_GATE {
        score += EMOTION_POINTS;
    }
    if engagement.interaction_total() >= ENGAGEMENT_GATE {
        score += ENGAGEMENT_POINTS;
    }
    if seo.title_length_optimal {
        score += SEO_POINTS;
    }
    score.min(100) as u8
}

/// Scores articles. Holds only immutable strategies, so one instance can be
/// shared across tasks.
#[derive(Debug)]
pub struct Analyzer {
    emotion: Box<dyn EmotionModel>,
    seo: Box<dyn SeoModel>,
    keywords: Box<dyn KeywordExtractor>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            emotion: Box::new(LexiconEmotionModel::default()),
            seo: Box::new(TitleLengthSeoModel),
            keywords: Box::new(TfIdfKeywordExtractor),
        }
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_emotion_model(mut self, model: impl EmotionModel + 'static) -> Self {
        self.emotion = Box::new(model);
        self
    }

    pub fn with_seo_model(mut self, model: impl SeoModel + 'static) -> Self {
        self.seo = Box::new(model);
        self
    }

    pub fn with_keyword_extractor(mut self, extractor: impl KeywordExtractor + 'static) -> Self {
        self.keywords = Box::new(extractor);
        self
    }

    pub fn analyze(&self, title: &str, content: &str) -> AnalysisResult {
        let text = format!("{}{}", title, content);

        let structure = analyze_structure(title, content);
        let emotion = self.emotion.score(&text);
        let engagement = analyze_engagement(&text);
        let seo = self.seo.score(title, content);
        let keywords = self.keywords.extract(&text, TOP_KEYWORDS);
        let score = composite_score(&structure, &emotion, &engagement, &seo);

        debug!(title_length = structure.title_length, score, "Analyzed article");

        AnalysisResult {
            structure,
            emotion,
            engagement,
            seo,
            keywords,
            score,
        }
    }
}
