//! Priority command implementation.

use super::{optional_text, require_text};
use crate::cli::TaskArgs;
use crate::error::Result;
use crate::output::Formatter;
use taskwise_engine::Orchestrator;

/// Execute the priority command.
pub async fn execute_priority(
    args: TaskArgs,
    orchestrator: &Orchestrator,
    formatter: &Formatter,
) -> Result<()> {
    let title = require_text("title", &args.title)?;
    let description = optional_text("description", args.description.as_deref())?;

    let resolved = orchestrator
        .recommend_priority(&title, description.as_deref())
        .await;

    println!("{}", formatter.format_priority(&resolved)?);
    Ok(())
}
