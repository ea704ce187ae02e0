//! Breakdown command implementation.

use super::require_text;
use crate::cli::BreakdownArgs;
use crate::error::Result;
use crate::output::Formatter;
use taskwise_engine::Orchestrator;

/// Execute the breakdown command.
pub async fn execute_breakdown(
    args: BreakdownArgs,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
) -> Result<()> {
    let description = require_text("description", &args.description.join(" "))?;
    let resolved = orchestrator.breakdown(&description).await;

    println!("{}", formatter.format_steps(&resolved)?);
    Ok(())
}
