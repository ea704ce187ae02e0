//! Providers command implementation.

use crate::error::Result;
use crate::output::Formatter;
use taskwise_engine::EngineContext;

/// Execute the providers command.
pub fn execute_providers(context: &EngineContext, formatter: &Formatter) -> Result<()> {
    let descriptors: Vec<_> = context.descriptors().collect();
    println!("{}", formatter.format_providers(&descriptors)?);
    Ok(())
}
