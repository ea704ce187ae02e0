//! Parse command implementation.

use super::require_text;
use crate::cli::ParseArgs;
use crate::error::Result;
use crate::output::Formatter;
use taskwise_engine::Orchestrator;

/// Execute the parse command.
pub async fn execute_parse(
    args: ParseArgs,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
) -> Result<()> {
    let text = require_text("text", &args.text.join(" "))?;

    let resolved = match args.now {
        Some(now) => orchestrator.parse_at(&text, now).await,
        None => orchestrator.parse(&text).await,
    };

    println!("{}", formatter.format_parsed(&resolved)?);
    Ok(())
}
