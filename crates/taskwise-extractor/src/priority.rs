//! Keyword-based priority detection

use crate::lexicon::Lexicon;
use taskwise_domain::{Priority, PriorityRecommendation};

const HIGH_REASON: &str = "Based on keywords: contains urgent/important words";
const LOW_REASON: &str = "Based on keywords: contains low priority words";
const DEFAULT_REASON: &str = "Based on keywords: default medium priority";

/// Scan `text` for priority triggers
///
/// High triggers win over low ones. Returns `None` when no trigger occurs,
/// which lets callers tell "nothing said" apart from an explicit medium.
pub fn scan_priority(lexicon: &Lexicon, text: &str) -> Option<Priority> {
    let content = text.to_lowercase();
    if lexicon.priority.high.iter().any(|w| content.contains(w.as_str())) {
        Some(Priority::High)
    } else if lexicon.priority.low.iter().any(|w| content.contains(w.as_str())) {
        Some(Priority::Low)
    } else {
        None
    }
}

/// Recommend a priority with a short explanation
pub fn recommend_priority(
    lexicon: &Lexicon,
    title: &str,
    description: Option<&str>,
) -> PriorityRecommendation {
    let content = format!("{} {}", title, description.unwrap_or(""));
    match scan_priority(lexicon, &content) {
        Some(Priority::High) => PriorityRecommendation::new(Priority::High, HIGH_REASON),
        Some(Priority::Low) => PriorityRecommendation::new(Priority::Low, LOW_REASON),
        _ => PriorityRecommendation::new(Priority::Medium, DEFAULT_REASON),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_beats_low() {
        let lexicon = Lexicon::builtin();
        assert_eq!(scan_priority(&lexicon, "urgent but optional"), Some(Priority::High));
        assert_eq!(scan_priority(&lexicon, "有空再看，很重要"), Some(Priority::High));
    }

    #[test]
    fn test_scan_is_case_insensitive() {
        let lexicon = Lexicon::builtin();
        assert_eq!(scan_priority(&lexicon, "ASAP please"), Some(Priority::High));
        assert_eq!(scan_priority(&lexicon, "Low Priority cleanup"), Some(Priority::Low));
        assert_eq!(scan_priority(&lexicon, "buy milk"), None);
    }

    #[test]
    fn test_recommendation_reasoning() {
        let lexicon = Lexicon::builtin();

        let rec = recommend_priority(&lexicon, "Fix prod outage", Some("critical"));
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.reasoning, HIGH_REASON);

        let rec = recommend_priority(&lexicon, "整理书架", Some("不急"));
        assert_eq!(rec.priority, Priority::Low);
        assert_eq!(rec.reasoning, LOW_REASON);

        let rec = recommend_priority(&lexicon, "buy milk", None);
        assert_eq!(rec.priority, Priority::Medium);
        assert_eq!(rec.reasoning, DEFAULT_REASON);
    }
}
