//! Command implementations.

pub mod breakdown;
pub mod config;
pub mod parse;
pub mod priority;
pub mod providers;
pub mod tags;

pub use self::breakdown::execute_breakdown;
pub use self::config::execute_config;
pub use self::parse::execute_parse;
pub use self::priority::execute_priority;
pub use self::providers::execute_providers;
pub use self::tags::execute_tags;

use crate::error::{CliError, Result};
use taskwise_engine::MAX_INPUT_CHARS;

/// Trim `text` and reject it when empty or too long.
pub(crate) fn require_text(field: &str, text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CliError::InvalidInput(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > MAX_INPUT_CHARS {
        return Err(CliError::InvalidInput(format!(
            "{} exceeds {} characters",
            field, MAX_INPUT_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

/// Like [`require_text`], but a blank value means "absent".
pub(crate) fn optional_text(field: &str, text: Option<&str>) -> Result<Option<String>> {
    match text {
        Some(t) if !t.trim().is_empty() => require_text(field, t).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("title", "  pay rent ").unwrap(), "pay rent");
        assert!(matches!(require_text("title", " \n"), Err(CliError::InvalidInput(_))));

        let long = "字".repeat(MAX_INPUT_CHARS + 1);
        assert!(matches!(require_text("title", &long), Err(CliError::InvalidInput(_))));
        assert!(require_text("title", &"字".repeat(MAX_INPUT_CHARS)).is_ok());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("description", None).unwrap(), None);
        assert_eq!(optional_text("description", Some("  ")).unwrap(), None);
        assert_eq!(
            optional_text("description", Some(" soon ")).unwrap().as_deref(),
            Some("soon")
        );
    }
}
