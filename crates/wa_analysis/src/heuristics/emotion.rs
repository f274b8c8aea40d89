use wa_core::{EmotionCategory, EmotionMetrics, EmotionScores};

use super::{char_len, EmotionModel};

const POSITIVE: &[&str] = &["爆款", "必看", "干货", "绝招", "秘密", "技巧", "攻略", "逆袭", "成功", "赚钱"];
const NEGATIVE: &[&str] = &["失败", "错误", "陷阱", "骗局", "亏损", "危险"];
const URGENT: &[&str] = &["紧急", "立即", "马上", "赶紧", "快速", "急需"];
const EXCLUSIVE: &[&str] = &["独家", "首发", "内部", "专属", "限时", "稀有"];

/// Counts, per category, how many lexicon entries occur in the text.
#[derive(Debug, Clone)]
pub struct LexiconEmotionModel {
    lexicon: Vec<(EmotionCategory, Vec<String>)>,
}

impl LexiconEmotionModel {
    pub fn new(lexicon: Vec<(EmotionCategory, Vec<String>)>) -> Self {
        Self { lexicon }
    }
}

impl Default for LexiconEmotionModel {
    fn default() -> Self {
        let entries = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self::new(vec![
            (EmotionCategory::Positive, entries(POSITIVE)),
            (EmotionCategory::Negative, entries(NEGATIVE)),
            (EmotionCategory::Urgent, entries(URGENT)),
            (EmotionCategory::Exclusive, entries(EXCLUSIVE)),
        ])
    }
}

/// Two decimal places, exact halves rounded to the even neighbour.
fn round_half_even(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

impl EmotionModel for LexiconEmotionModel {
    fn score(&self, text: &str) -> EmotionMetrics {
        let mut scores = EmotionScores {
            positive: 0,
            negative: 0,
            urgent: 0,
            exclusive: 0,
        };
        for (category, words) in &self.lexicon {
            let hits = words.iter().filter(|w| text.contains(w.as_str())).count();
            scores.set(*category, hits);
        }

        let intensity = scores.total() as f64 / char_len(text).max(1) as f64 * 100.0;

        // First category in lexicon order wins ties.
        let mut dominant: Option<(EmotionCategory, usize)> = None;
        for (category, _) in &self.lexicon {
            let hits = scores.get(*category);
            if dominant.map_or(true, |(_, best)| hits > best) {
                dominant = Some((*category, hits));
            }
        }

        EmotionMetrics {
            emotion_scores: scores,
            emotion_intensity: round_half_even(intensity),
            dominant_emotion: dominant.map(|(category, _)| category),
        }
    }
}
