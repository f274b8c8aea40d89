use wa_core::SeoMetrics;

use super::{char_len, SeoModel};

pub const OPTIMAL_TITLE_MIN: usize = 15;
pub const OPTIMAL_TITLE_MAX: usize = 30;

pub fn title_length_optimal(title_length: usize) -> bool {
    (OPTIMAL_TITLE_MIN..=OPTIMAL_TITLE_MAX).contains(&title_length)
}

/// Checks the title length window. Keyword presence, readability and density
/// are not computed; they carry fixed values and `placeholder` is set.
#[derive(Debug, Clone, Default)]
pub struct TitleLengthSeoModel;

impl TitleLengthSeoModel {
    const KEYWORD_IN_TITLE: bool = true;
    const READABILITY: u32 = 85;
    const DENSITY: f64 = 3.2;
}

impl SeoModel for TitleLengthSeoModel {
    fn score(&self, title: &str, _content: &str) -> SeoMetrics {
        SeoMetrics {
            title_length_optimal: title_length_optimal(char_len(title)),
            keyword_in_title: Self::KEYWORD_IN_TITLE,
            readability_score: Self::READABILITY,
            keyword_density: Self::DENSITY,
            placeholder: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimal_window_is_inclusive() {
        assert!(!title_length_optimal(14));
        assert!(title_length_optimal(15));
        assert!(title_length_optimal(30));
        assert!(!title_length_optimal(31));
    }

    #[test]
    fn test_placeholders_are_flagged() {
        let seo = TitleLengthSeoModel.score("short", "");
        assert!(!seo.title_length_optimal);
        assert!(seo.placeholder);
        assert_eq!(seo.readability_score, 85);
    }
}
