use lazy_static::lazy_static;
use regex::Regex;
use wa_core::EngagementMetrics;

lazy_static! {
    static ref QUESTION: Regex = Regex::new(r"[？?]").unwrap();
    static ref EXCLAMATION: Regex = Regex::new(r"[！!]").unwrap();
    static ref NUMBER: Regex = Regex::new(r"\d+").unwrap();
    static ref CALL_TO_ACTION: Regex = Regex::new(r"点赞|转发|关注|收藏|分享").unwrap();
}

pub fn analyze_engagement(text: &str) -> EngagementMetrics {
    EngagementMetrics {
        question_count: QUESTION.find_iter(text).count(),
        exclamation_count: EXCLAMATION.find_iter(text).count(),
        number_count: NUMBER.find_iter(text).count(),
        call_to_action: CALL_TO_ACTION.find_iter(text).count(),
    }
}
