//! Lenient interpretation of model output
//!
//! Models do not always return strict JSON. Every parser here tries a
//! structured parse first (after stripping markdown code fences), then a
//! best-effort text scan, and only then gives up with a [`ProviderError`].

use crate::error::{ProviderError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use taskwise_domain::{ParsedTask, Priority, PriorityRecommendation};
use tracing::debug;

/// Most tags kept from a text-scan recovery
pub const MAX_RECOVERED_TAGS: usize = 4;

/// Fewest steps a breakdown may have
pub const MIN_STEPS: usize = 3;

/// Most steps a breakdown may have
pub const MAX_STEPS: usize = 7;

static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]+)"|“([^”]+)”"#).unwrap());
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+\s*[.)、:：]|[-*•·]|[a-zA-Z][.)])\s*").unwrap());
static PRIORITY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?-u:\b)(high|medium|low)(?-u:\b)|高|中|低").unwrap());

/// Strip a surrounding markdown code block, if any
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Skip the opening fence line (```json or ```) and the closing fence
    let body = match trimmed.find('\n') {
        Some(newline) => &trimmed[newline + 1..],
        None => return "",
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse the response as JSON, falling back to the outermost `{...}` or `[...]` span
pub fn extract_json(response: &str) -> Option<Value> {
    let body = strip_code_fences(response);
    if let Ok(value) = serde_json::from_str(body) {
        return Some(value);
    }

    for (open, close) in [('{', '}'), ('[', ']')] {
        if let (Some(start), Some(end)) = (body.find(open), body.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str(&body[start..=end]) {
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Interpret a parse response
///
/// Requires a JSON object with a non-blank `title`. Priority is normalized
/// and the due date is accepted in several ISO shapes; an unreadable due
/// date is dropped rather than failing the whole response.
pub fn parse_task(response: &str) -> Result<ParsedTask> {
    let value = extract_json(response)
        .ok_or_else(|| ProviderError::InvalidResponse("Expected a JSON object".to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| ProviderError::InvalidResponse("Expected a JSON object".to_string()))?;

    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ProviderError::InvalidResponse("Missing or blank 'title'".to_string()))?
        .to_string();

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let priority = obj
        .get("priority")
        .and_then(Value::as_str)
        .map(Priority::normalize)
        .unwrap_or_default();

    let due_at = ["due_date", "due_at", "due"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .and_then(|raw| {
            let parsed = normalize_due(raw);
            if parsed.is_none() {
                debug!("Dropping unreadable due date '{}'", raw);
            }
            parsed
        });

    let tags = obj.get("tags").map(string_list).unwrap_or_default();

    Ok(ParsedTask {
        title,
        description,
        priority,
        due_at,
        tags,
    })
}

/// Interpret a tag-suggestion response
pub fn parse_tags(response: &str) -> Result<Vec<String>> {
    let tags = match extract_json(response) {
        Some(Value::Array(items)) => string_list(&Value::Array(items)),
        Some(Value::Object(obj)) => obj.get("tags").map(string_list).unwrap_or_default(),
        _ => QUOTED
            .captures_iter(response)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().trim().to_string())
            .filter(|t| !t.is_empty())
            .take(MAX_RECOVERED_TAGS)
            .collect(),
    };

    if tags.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(tags)
}

/// Interpret a breakdown response, keeping at most [`MAX_STEPS`] steps
pub fn parse_steps(response: &str) -> Result<Vec<String>> {
    let mut steps = match extract_json(response) {
        Some(Value::Array(items)) => string_list(&Value::Array(items)),
        Some(Value::Object(obj)) => ["subtasks", "steps"]
            .iter()
            .find_map(|key| obj.get(*key))
            .map(string_list)
            .unwrap_or_default(),
        _ => strip_code_fences(response)
            .lines()
            .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
            .filter(|line| !line.is_empty())
            .collect(),
    };

    if steps.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    if steps.len() < MIN_STEPS {
        return Err(ProviderError::InvalidResponse(format!(
            "Expected at least {} steps, got {}",
            MIN_STEPS,
            steps.len()
        )));
    }
    steps.truncate(MAX_STEPS);
    Ok(steps)
}

/// Interpret a priority response
pub fn parse_priority(response: &str) -> Result<PriorityRecommendation> {
    if let Some(Value::Object(obj)) = extract_json(response) {
        if let Some(priority) = obj.get("priority").and_then(Value::as_str) {
            let reasoning = obj
                .get("reasoning")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .trim()
                .to_string();
            return Ok(PriorityRecommendation::new(
                Priority::normalize(priority),
                reasoning,
            ));
        }
    }

    let token = PRIORITY_TOKEN
        .find(response)
        .ok_or_else(|| ProviderError::InvalidResponse("No priority in response".to_string()))?;
    Ok(PriorityRecommendation::new(
        Priority::normalize(token.as_str()),
        response.trim().to_string(),
    ))
}

/// Normalize a provider due date to local wall-clock time
///
/// Accepts RFC 3339 (the wall-clock time as written is kept), naive ISO
/// date-times, and bare dates (which land at 23:59).
pub fn normalize_due(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::from_hms_opt(23, 59, 0)?))
}

/// Strings from a JSON array, or a comma-separated JSON string
fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => s
            .split([',', '，'])
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[\"a\"]\n```"), "[\"a\"]");
        assert_eq!(strip_code_fences("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("  [1, 2] "), "[1, 2]");
        assert_eq!(strip_code_fences("```"), "");
    }

    #[test]
    fn test_extract_json_from_chatter() {
        let value = extract_json("Sure! Here you go: {\"priority\": \"high\"} Hope it helps.").unwrap();
        assert_eq!(value["priority"], "high");
        assert!(extract_json("no json here").is_none());
    }

    #[test]
    fn test_parse_task_full() {
        let task = parse_task(
            r#"```json
{"title": "开会", "description": "", "priority": "高", "due_date": "2025-03-13T15:00:00", "tags": ["会议", "工作"]}
```"#,
        )
        .unwrap();
        assert_eq!(task.title, "开会");
        assert_eq!(task.description, None);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_at, Some(at(2025, 3, 13, 15, 0)));
        assert_eq!(task.tags, vec!["会议".to_string(), "工作".to_string()]);
    }

    #[test]
    fn test_parse_task_defaults() {
        let task = parse_task(r#"{"title": "buy milk", "priority": "whatever", "due_date": "soon"}"#).unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.due_at, None);
        assert!(task.tags.is_empty());
    }

    #[test]
    fn test_parse_task_requires_title() {
        assert!(matches!(
            parse_task(r#"{"title": "   "}"#),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_task("I could not understand"),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_task(r#"["not", "an", "object"]"#),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_tags_json_and_recovery() {
        assert_eq!(parse_tags(r#"["Work", " Meeting "]"#).unwrap(), ["Work", "Meeting"]);
        assert_eq!(parse_tags(r#"{"tags": "work, 会议"}"#).unwrap(), ["work", "会议"]);
        assert_eq!(
            parse_tags(r#"Tags: "Work", "Meeting", "Q3", "Finance", "Extra""#).unwrap(),
            ["Work", "Meeting", "Q3", "Finance"]
        );
        assert!(matches!(parse_tags("nothing useful"), Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn test_parse_steps_json() {
        let steps = parse_steps(r#"["a", "b", "c", "d", "e", "f", "g", "h"]"#).unwrap();
        assert_eq!(steps.len(), MAX_STEPS);
        assert_eq!(steps[6], "g");
    }

    #[test]
    fn test_parse_steps_numbered_lines() {
        let steps = parse_steps("1. Book a room\n2) Send invites\n\n- Prepare slides\n3、准备材料").unwrap();
        assert_eq!(
            steps,
            ["Book a room", "Send invites", "Prepare slides", "准备材料"]
        );
    }

    #[test]
    fn test_parse_steps_too_few() {
        assert!(matches!(
            parse_steps(r#"["only one", "two"]"#),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(matches!(parse_steps("[]"), Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn test_parse_priority_json() {
        let rec = parse_priority(r#"{"priority": "HIGH", "reasoning": "Deadline today"}"#).unwrap();
        assert_eq!(rec.priority, Priority::High);
        assert_eq!(rec.reasoning, "Deadline today");
    }

    #[test]
    fn test_parse_priority_token_scan() {
        let rec = parse_priority("I would say this is low priority.").unwrap();
        assert_eq!(rec.priority, Priority::Low);

        let rec = parse_priority("建议：高").unwrap();
        assert_eq!(rec.priority, Priority::High);

        assert!(parse_priority("no idea").is_err());
    }

    #[test]
    fn test_normalize_due_forms() {
        assert_eq!(
            normalize_due("2025-03-13T15:00:00+08:00"),
            Some(at(2025, 3, 13, 15, 0))
        );
        assert_eq!(normalize_due("2025-03-13T09:30"), Some(at(2025, 3, 13, 9, 30)));
        assert_eq!(normalize_due("2025-03-13 09:30:00"), Some(at(2025, 3, 13, 9, 30)));
        assert_eq!(normalize_due("2025-03-13"), Some(at(2025, 3, 13, 23, 59)));
        assert_eq!(normalize_due("null"), None);
        assert_eq!(normalize_due("next tuesday"), None);
    }
}
