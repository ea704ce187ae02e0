//! Priority module - the three-level urgency scale for tasks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a task
///
/// The variants are declared in ascending order so the derived `Ord`
/// gives `Low < Medium < High`. `Medium` is the default when no evidence
/// points either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait, optional or leisure work
    Low,

    /// Regular work with no explicit urgency cue
    #[default]
    Medium,

    /// Urgent or important work
    High,
}

impl Priority {
    /// Get the priority name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse a priority from its canonical name (case-insensitive)
    ///
    /// Only `low`, `medium` and `high` are accepted. Use [`Priority::normalize`]
    /// for values coming from language models or user input.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Map a loosely formatted priority value onto the scale
    ///
    /// Accepts case variants, single-letter abbreviations and Chinese labels
    /// ("高", "低优先级", ...). Anything unrecognized becomes `Medium`.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskwise_domain::Priority;
    ///
    /// assert_eq!(Priority::normalize("HIGH"), Priority::High);
    /// assert_eq!(Priority::normalize("高"), Priority::High);
    /// assert_eq!(Priority::normalize("h"), Priority::High);
    /// assert_eq!(Priority::normalize("whatever"), Priority::Medium);
    /// ```
    pub fn normalize(value: &str) -> Self {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "high" | "h" | "高" | "高优先级" | "优先级高" => return Priority::High,
            "medium" | "med" | "m" | "中" | "中优先级" | "优先级中" => return Priority::Medium,
            "low" | "l" | "低" | "低优先级" | "优先级低" => return Priority::Low,
            _ => {}
        }

        // Fuzzy match on the Chinese level characters
        if normalized.contains('高') {
            Priority::High
        } else if normalized.contains('低') {
            Priority::Low
        } else {
            Priority::Medium
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid priority: {}", s))
    }
}

/// A priority suggestion together with a short human-readable justification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRecommendation {
    /// Recommended priority
    pub priority: Priority,

    /// Why this priority was chosen
    pub reasoning: String,
}

impl PriorityRecommendation {
    /// Create a new recommendation
    pub fn new(priority: Priority, reasoning: impl Into<String>) -> Self {
        Self {
            priority,
            reasoning: reasoning.into(),
        }
    }
}
