//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskwise_engine::ProviderMode;

/// Taskwise CLI - Turn free-form text into structured tasks.
#[derive(Debug, Parser)]
#[command(name = "taskwise")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider selection (auto, openai, google, ollama, none)
    #[arg(short, long, global = true, value_parser = parse_provider_mode)]
    pub provider: Option<ProviderMode>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (bare values)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a natural-language task description
    Parse(ParseArgs),

    /// Suggest category tags for a task
    Tags(TaskArgs),

    /// Break a task down into subtasks
    Breakdown(BreakdownArgs),

    /// Recommend a priority for a task
    Priority(TaskArgs),

    /// List configured providers in fallback order
    Providers,

    /// Show the effective configuration with secrets redacted
    Config,
}

/// Arguments for the parse command.
#[derive(Debug, Parser)]
pub struct ParseArgs {
    /// Task description (e.g. "明天下午3点开会" or "call mom tomorrow at 5pm")
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Reference time for relative dates (YYYY-MM-DD HH:MM), defaults to now
    #[arg(long, value_parser = parse_reference_time)]
    pub now: Option<chrono::NaiveDateTime>,
}

/// Arguments for commands taking a title and optional description.
#[derive(Debug, Parser)]
pub struct TaskArgs {
    /// Task title
    pub title: String,

    /// Task description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Arguments for the breakdown command.
#[derive(Debug, Parser)]
pub struct BreakdownArgs {
    /// Task description
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

fn parse_provider_mode(s: &str) -> Result<ProviderMode, String> {
    ProviderMode::parse(s).ok_or_else(|| format!("unknown provider mode '{}'", s))
}

fn parse_reference_time(s: &str) -> Result<chrono::NaiveDateTime, String> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("expected YYYY-MM-DD HH:MM, got '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_command_joins_words() {
        let cli = Cli::parse_from(["taskwise", "parse", "call", "mom", "tomorrow"]);
        match cli.command {
            Command::Parse(args) => assert_eq!(args.text.join(" "), "call mom tomorrow"),
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_reference_time_flag() {
        let cli = Cli::parse_from(["taskwise", "parse", "开会", "--now", "2025-03-12 10:00"]);
        match cli.command {
            Command::Parse(args) => assert_eq!(
                args.now,
                NaiveDate::from_ymd_opt(2025, 3, 12).unwrap().and_hms_opt(10, 0, 0)
            ),
            _ => panic!("Expected Parse command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "taskwise",
            "priority",
            "pay rent",
            "-d",
            "due friday",
            "--provider",
            "Gemini",
            "-vv",
            "--format",
            "json",
        ]);
        assert_eq!(cli.provider, Some(ProviderMode::Google));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Command::Priority(args) => {
                assert_eq!(args.title, "pay rent");
                assert_eq!(args.description.as_deref(), Some("due friday"));
            }
            _ => panic!("Expected Priority command"),
        }
    }

    #[test]
    fn test_invalid_provider_is_rejected() {
        let result = Cli::try_parse_from(["taskwise", "--provider", "bard", "providers"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_text_is_rejected() {
        assert!(Cli::try_parse_from(["taskwise", "parse"]).is_err());
    }
}
