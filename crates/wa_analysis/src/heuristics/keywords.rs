use jieba_rs::{Jieba, KeywordExtract, TfIdf};
use lazy_static::lazy_static;
use wa_core::WeightedKeyword;

use super::{char_len, KeywordExtractor};

lazy_static! {
    static ref JIEBA: Jieba = Jieba::new();
    static ref TFIDF: TfIdf = TfIdf::default();
}

/// Ranks segmented words by TF-IDF against the bundled IDF table.
///
/// Stopwords and single-character words are skipped by the extractor. Words
/// of equal weight keep the order in which they first appear in the text.
#[derive(Debug, Clone, Default)]
pub struct TfIdfKeywordExtractor;

impl KeywordExtractor for TfIdfKeywordExtractor {
    fn extract(&self, text: &str, top_k: usize) -> Vec<WeightedKeyword> {
        if text.trim().is_empty() || top_k == 0 {
            return Vec::new();
        }

        // every candidate, so equal weights at the cut resolve by position
        let mut ranked: Vec<(usize, WeightedKeyword)> = TFIDF
            .extract_keywords(&JIEBA, text, char_len(text), vec![])
            .into_iter()
            .map(|k| {
                let position = text.find(&k.keyword).unwrap_or(usize::MAX);
                (
                    position,
                    WeightedKeyword {
                        word: k.keyword,
                        weight: k.weight,
                    },
                )
            })
            .collect();

        ranked.sort_by(|(pa, a), (pb, b)| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(pa.cmp(pb))
        });
        ranked.into_iter().take(top_k).map(|(_, k)| k).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(keywords: &[WeightedKeyword]) -> Vec<&str> {
        keywords.iter().map(|k| k.word.as_str()).collect()
    }

    #[test]
    fn test_segments_whole_words() {
        let keywords = TfIdfKeywordExtractor.extract("理财技巧：新手理财的十个技巧", 10);
        let found = words(&keywords);
        assert!(found.contains(&"理财"));
        assert!(found.contains(&"技巧"));
        assert!(!found.contains(&"财技"));
    }

    #[test]
    fn test_weights_descend() {
        let keywords = TfIdfKeywordExtractor.extract("职场人必备：5个让你加薪30%的核心技能。职场加薪靠技能。", 10);
        assert!(!keywords.is_empty());
        assert!(keywords.iter().all(|k| k.weight >= 0.0));
        assert!(keywords.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn test_repeated_word_reported_once() {
        let keywords = TfIdfKeywordExtractor.extract("理财 理财", 10);
        assert_eq!(words(&keywords), vec!["理财"]);
    }

    #[test]
    fn test_top_k_limit() {
        let text = "理财 技巧 职场 加薪 技能 效率 攻略 健康 教育 科技 金融 生活 旅行 美食";
        assert!(TfIdfKeywordExtractor.extract(text, 10).len() <= 10);
        assert!(TfIdfKeywordExtractor.extract(text, 3).len() <= 3);
    }

    #[test]
    fn test_empty_text() {
        assert!(TfIdfKeywordExtractor.extract("", 10).is_empty());
        assert!(TfIdfKeywordExtractor.extract("  ", 10).is_empty());
    }
}
