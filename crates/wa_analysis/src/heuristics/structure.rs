use lazy_static::lazy_static;
use regex::Regex;
use wa_core::StructureMetrics;

use super::char_len;

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[。！？.!?]").unwrap();
}

pub fn sentence_count(content: &str) -> usize {
    SENTENCE_END.find_iter(content).count()
}

pub fn analyze_structure(title: &str, content: &str) -> StructureMetrics {
    let content_length = char_len(content);
    let sentence_count = sentence_count(content);

    let (paragraph_count, avg_sentence_length) = if content.is_empty() {
        (0, 0.0)
    } else {
        (
            content.split("\n\n").count(),
            content_length as f64 / sentence_count.max(1) as f64,
        )
    };

    StructureMetrics {
        title_length: char_len(title),
        content_length,
        sentence_count,
        paragraph_count,
        avg_sentence_length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_mixed_punctuation() {
        let s = analyze_structure("标题", "第一句。第二句！Third?");
        assert_eq!(s.title_length, 2);
        assert_eq!(s.content_length, 14);
        assert_eq!(s.sentence_count, 3);
        assert_eq!(s.paragraph_count, 1);
        assert!((s.avg_sentence_length - 14.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_terminal_punctuation_uses_full_length() {
        let s = analyze_structure("", "没有标点的内容");
        assert_eq!(s.sentence_count, 0);
        assert_eq!(s.avg_sentence_length, 7.0);
    }

    #[test]
    fn test_empty_content() {
        let s = analyze_structure("title", "");
        assert_eq!(s.paragraph_count, 0);
        assert_eq!(s.avg_sentence_length, 0.0);
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        assert_eq!(analyze_structure("", "a\n\nb\n\nc").paragraph_count, 3);
        assert_eq!(analyze_structure("", "a\nb").paragraph_count, 1);
    }
}
