//! Prompts for the four task operations

use crate::backend::ChatRequest;
use chrono::NaiveDateTime;

/// Builds chat requests for each operation
pub struct PromptBuilder;

impl PromptBuilder {
    /// Request for parsing free text into task attributes
    pub fn parse(text: &str, now: NaiveDateTime) -> ChatRequest {
        let mut system = String::new();
        system.push_str(PARSE_INSTRUCTIONS);
        system.push_str("\n\n");
        system.push_str(&format!(
            "Current local date and time: {} ({})\n\n",
            now.format("%Y-%m-%d %H:%M"),
            now.format("%A")
        ));
        system.push_str(PARSE_OUTPUT_FORMAT);

        ChatRequest {
            system,
            user: text.to_string(),
            temperature: 0.1,
            json_mode: true,
        }
    }

    /// Request for category tags
    pub fn suggest_tags(title: &str, description: Option<&str>) -> ChatRequest {
        ChatRequest {
            system: TAGS_INSTRUCTIONS.to_string(),
            user: format!("Task: {}", task_content(title, description)),
            temperature: 0.3,
            json_mode: false,
        }
    }

    /// Request for an ordered list of subtasks
    pub fn breakdown(description: &str) -> ChatRequest {
        ChatRequest {
            system: BREAKDOWN_INSTRUCTIONS.to_string(),
            user: format!("Break down this task: {}", description),
            temperature: 0.5,
            json_mode: false,
        }
    }

    /// Request for a priority recommendation
    pub fn recommend_priority(title: &str, description: Option<&str>) -> ChatRequest {
        ChatRequest {
            system: PRIORITY_INSTRUCTIONS.to_string(),
            user: format!("Task: {}", task_content(title, description)),
            temperature: 0.3,
            json_mode: true,
        }
    }
}

fn task_content(title: &str, description: Option<&str>) -> String {
    match description {
        Some(description) if !description.trim().is_empty() => {
            format!("{}. {}", title, description)
        }
        _ => title.to_string(),
    }
}

const PARSE_INSTRUCTIONS: &str = r#"You extract a single task from a user's sentence. The sentence may be English or Chinese.

Rules:
- title: the action itself, without dates, times, reminders ("remind me to", "提醒我") or priority words
- Resolve relative dates against the current date below: "today"/"今天" = +0 days, "tomorrow"/"明天" = +1, "day after tomorrow"/"后天" = +2, "next monday"/"下周一" = the coming Monday, never today
- A bare Chinese hour such as "3点" means 15:00; "上午9点" means 09:00
- If a date is given without a time, use 23:59 of that date
- priority: "high" for urgent/important/asap/紧急/重要/尽快, "low" for low priority/optional/不急/有空再, otherwise "medium"
- Do not invent information the user did not give"#;

const PARSE_OUTPUT_FORMAT: &str = r#"Output format (JSON object only, no additional text):
{
  "title": "string",
  "description": "string or null",
  "priority": "low|medium|high",
  "due_date": "YYYY-MM-DDTHH:MM:SS or null",
  "tags": ["string"]
}"#;

const TAGS_INSTRUCTIONS: &str = r#"You classify tasks. Suggest the 2 to 4 most relevant tags for the task.

Rules:
- Tags are short (one or two words)
- Prefer common categories such as Work, Meeting, Study, Shopping, Health, Personal, Finance, Travel
- Reply with a JSON array of strings only, for example ["Work", "Meeting"]"#;

const BREAKDOWN_INSTRUCTIONS: &str = r#"You plan work. Split the task into concrete, actionable subtasks.

Rules:
- Between 3 and 7 subtasks
- In execution order
- Use the language of the task
- Reply with a JSON array of strings only, for example ["Step one", "Step two", "Step three"]"#;

const PRIORITY_INSTRUCTIONS: &str = r#"You assess task priority.

Criteria:
- high: urgent and important, a firm deadline, blocks other people, core work
- medium: important but not urgent, routine work, personal growth
- low: neither urgent nor important, leisure, can be postponed

Reply with a JSON object only:
{"priority": "low|medium|high", "reasoning": "one short sentence"}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_prompt_includes_date_and_text() {
        let now = NaiveDate::from_ymd_opt(2025, 3, 12)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let request = PromptBuilder::parse("明天开会", now);

        assert!(request.system.contains("2025-03-12 10:00"));
        assert!(request.system.contains("Wednesday"));
        assert!(request.system.contains("JSON object"));
        assert_eq!(request.user, "明天开会");
        assert!(request.json_mode);
    }

    #[test]
    fn test_task_content_joins_description() {
        let request = PromptBuilder::suggest_tags("Write report", Some("Q3 numbers"));
        assert_eq!(request.user, "Task: Write report. Q3 numbers");

        let request = PromptBuilder::recommend_priority("Write report", Some("  "));
        assert_eq!(request.user, "Task: Write report");
    }

    #[test]
    fn test_breakdown_prompt() {
        let request = PromptBuilder::breakdown("plan the offsite");
        assert!(request.user.ends_with("plan the offsite"));
        assert!(request.system.contains("Between 3 and 7"));
        assert!(!request.json_mode);
    }
}
