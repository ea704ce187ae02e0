//! Keyword-based tag inference

use crate::lexicon::Lexicon;

/// Infer up to `max_tags` category labels for a task
///
/// Categories are checked in lexicon order. A work match is refined to the
/// first matching sub-category (Meeting, Code, ...) before falling back to
/// the generic work label. When nothing matches, a single label is returned:
/// the work label if the text carries a work-adjacent cue, otherwise the
/// "other" label. The result is never empty.
pub fn infer_tags(
    lexicon: &Lexicon,
    title: &str,
    description: Option<&str>,
    max_tags: usize,
) -> Vec<String> {
    let content = format!("{} {}", title, description.unwrap_or("")).to_lowercase();
    let mut tags: Vec<String> = Vec::new();

    for category in &lexicon.categories {
        if tags.len() >= max_tags {
            break;
        }
        if !category.matches(&content) {
            continue;
        }

        let label = if category.key == "work" {
            lexicon
                .work_refinements
                .iter()
                .find(|refinement| refinement.matches(&content))
                .map_or(category.label.as_str(), |refinement| refinement.label.as_str())
        } else {
            category.label.as_str()
        };

        if !tags.iter().any(|t| t == label) {
            tags.push(label.to_string());
        }
    }

    if tags.is_empty() {
        let is_work = lexicon
            .work_adjacent
            .iter()
            .any(|cue| content.contains(cue.as_str()));
        let label = match (is_work, lexicon.work()) {
            (true, Some(work)) => work.label.clone(),
            _ => lexicon.other_label.clone(),
        };
        tags.push(label);
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(title: &str) -> Vec<String> {
        infer_tags(&Lexicon::builtin(), title, None, 3)
    }

    #[test]
    fn test_work_refinement_precedence() {
        assert_eq!(tags("开会"), ["Meeting"]);
        assert_eq!(tags("完成项目报告"), ["Project"]);
        assert_eq!(tags("review the report"), ["Review"]);
        assert_eq!(tags("write code for the project"), ["Code"]);
        assert_eq!(tags("weekly report"), ["Report"]);
        assert_eq!(tags("design the logo"), ["Work"]);
    }

    #[test]
    fn test_multiple_categories_in_order() {
        assert_eq!(
            tags("buy a flight ticket for the family trip"),
            ["Shopping", "Personal", "Travel"]
        );
    }

    #[test]
    fn test_cap_at_max_tags() {
        let result = infer_tags(
            &Lexicon::builtin(),
            "study for exam, buy books, gym, pay bank bill, book hotel",
            None,
            2,
        );
        assert_eq!(result.len(), 2);
        assert_eq!(result, ["Study", "Shopping"]);
    }

    #[test]
    fn test_description_is_scanned() {
        let result = infer_tags(&Lexicon::builtin(), "Saturday", Some("去医院复查"), 3);
        assert_eq!(result, ["Health"]);
    }

    #[test]
    fn test_fallback_labels() {
        assert_eq!(tags("reply to the client email"), ["Work"]);
        assert_eq!(tags("water the flowers"), ["Other"]);
    }

    #[test]
    fn test_never_empty() {
        assert_eq!(tags(""), ["Other"]);
    }
}
