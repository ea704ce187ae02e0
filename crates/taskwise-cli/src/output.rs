//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde_json::json;
use taskwise_domain::{ParsedTask, Priority, PriorityRecommendation};
use taskwise_engine::{Resolved, Source};
use taskwise_llm::ProviderDescriptor;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a parsed task.
    pub fn format_parsed(&self, resolved: &Resolved<ParsedTask>) -> Result<String> {
        let task = &resolved.value;
        let due = task
            .due_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string());

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "task": task,
                "source": resolved.source.to_string(),
            }))?),
            OutputFormat::Quiet => Ok(task.title.clone()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Title", task.title.as_str()]);
                if let Some(description) = &task.description {
                    builder.push_record(["Description", description.as_str()]);
                }
                builder.push_record(["Priority".to_string(), self.priority_label(task.priority)]);
                builder.push_record(["Due", due.as_deref().unwrap_or("-")]);
                builder.push_record(["Tags".to_string(), task.tags.join(", ")]);

                Ok(format!(
                    "{}\n{}",
                    self.table(builder),
                    self.source_line(&resolved.source)
                ))
            }
        }
    }

    /// Format suggested tags.
    pub fn format_tags(&self, resolved: &Resolved<Vec<String>>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "tags": resolved.value,
                "source": resolved.source.to_string(),
            }))?),
            OutputFormat::Quiet => Ok(resolved.value.join("\n")),
            OutputFormat::Table => Ok(format!(
                "{}\n{}",
                self.colorize(&resolved.value.join(", "), "cyan"),
                self.source_line(&resolved.source)
            )),
        }
    }

    /// Format a subtask breakdown.
    pub fn format_steps(&self, resolved: &Resolved<Vec<String>>) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "subtasks": resolved.value,
                "source": resolved.source.to_string(),
            }))?),
            OutputFormat::Quiet => Ok(resolved.value.join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["#", "Subtask"]);
                for (i, step) in resolved.value.iter().enumerate() {
                    builder.push_record([(i + 1).to_string(), step.clone()]);
                }
                Ok(format!(
                    "{}\n{}",
                    self.table(builder),
                    self.source_line(&resolved.source)
                ))
            }
        }
    }

    /// Format a priority recommendation.
    pub fn format_priority(&self, resolved: &Resolved<PriorityRecommendation>) -> Result<String> {
        let rec = &resolved.value;
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "priority": rec.priority,
                "reasoning": rec.reasoning,
                "source": resolved.source.to_string(),
            }))?),
            OutputFormat::Quiet => Ok(rec.priority.to_string()),
            OutputFormat::Table => Ok(format!(
                "{} {}\n{}",
                self.priority_label(rec.priority),
                rec.reasoning,
                self.source_line(&resolved.source)
            )),
        }
    }

    /// Format the provider list in attempt order.
    pub fn format_providers(&self, providers: &[&ProviderDescriptor]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<_> = providers
                    .iter()
                    .map(|p| {
                        json!({
                            "identity": p.identity,
                            "model": p.model,
                            "available": p.available,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(providers
                .iter()
                .filter(|p| p.available)
                .map(|p| p.identity.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if providers.is_empty() {
                    return Ok(self.colorize(
                        "No providers configured; using rule-based extraction.",
                        "yellow",
                    ));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Provider", "Model", "Status"]);
                for (i, p) in providers.iter().enumerate() {
                    let status = if p.available {
                        self.colorize("ready", "green")
                    } else {
                        self.colorize("missing credentials", "red")
                    };
                    builder.push_record([
                        (i + 1).to_string(),
                        p.identity.clone(),
                        p.model.clone().unwrap_or_else(|| "-".to_string()),
                        status,
                    ]);
                }
                Ok(self.table(builder))
            }
        }
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn source_line(&self, source: &Source) -> String {
        match source {
            Source::Provider(identity) => self.info(&format!("via {}", identity)),
            Source::Fallback => self.warning("via rule-based extraction"),
        }
    }

    fn priority_label(&self, priority: Priority) -> String {
        let color = match priority {
            Priority::High => "red",
            Priority::Medium => "yellow",
            Priority::Low => "green",
        };
        self.colorize(priority.as_str(), color)
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn resolved<T>(value: T, source: Source) -> Resolved<T> {
        Resolved {
            value,
            source,
            failures: Vec::new(),
        }
    }

    fn sample_task() -> ParsedTask {
        ParsedTask {
            title: "开会".to_string(),
            description: None,
            priority: Priority::High,
            due_at: NaiveDate::from_ymd_opt(2025, 3, 13)
                .unwrap()
                .and_hms_opt(15, 0, 0),
            tags: vec!["Meeting".to_string()],
        }
    }

    #[test]
    fn test_parsed_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_parsed(&resolved(sample_task(), Source::Fallback))
            .unwrap();
        assert!(output.contains("开会"));
        assert!(output.contains("2025-03-13 15:00"));
        assert!(output.contains("high"));
        assert!(output.contains("via rule-based extraction"));
    }

    #[test]
    fn test_parsed_json_includes_source() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter
            .format_parsed(&resolved(sample_task(), Source::Provider("openai".into())))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["source"], "openai");
        assert_eq!(value["task"]["title"], "开会");
    }

    #[test]
    fn test_quiet_steps() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let steps = vec!["Plan".to_string(), "Ship".to_string()];
        let output = formatter
            .format_steps(&resolved(steps, Source::Fallback))
            .unwrap();
        assert_eq!(output, "Plan\nShip");
    }

    #[test]
    fn test_priority_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let rec = PriorityRecommendation::new(Priority::Low, "can wait");
        let output = formatter
            .format_priority(&resolved(rec, Source::Provider("ollama".into())))
            .unwrap();
        assert!(output.starts_with("low can wait"));
        assert!(output.contains("via ollama"));
    }

    #[test]
    fn test_providers_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let ready = ProviderDescriptor::new("ollama").with_model("llama3");
        let missing = ProviderDescriptor::new("openai").with_available(false);
        let output = formatter.format_providers(&[&missing, &ready]).unwrap();
        assert!(output.contains("missing credentials"));
        assert!(output.contains("llama3"));

        let empty = formatter.format_providers(&[]).unwrap();
        assert!(empty.contains("rule-based"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.info("test"), "ℹ test");
    }
}
