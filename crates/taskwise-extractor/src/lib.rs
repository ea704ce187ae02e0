//! Taskwise Extractor
//!
//! Deterministic, rule-based understanding of task sentences in English
//! and Chinese. This is the engine's last line of defence: it never calls
//! out to anything, never fails, and always produces a usable answer.
//!
//! # Overview
//!
//! Given a sentence like `"明天下午3点提醒我开会，很重要"` the extractor
//! produces a [`ParsedTask`](taskwise_domain::ParsedTask) with:
//!
//! - a **title** stripped of filler, date/time phrases and priority markers (`"开会"`)
//! - a **priority** from high/low keyword triggers (`high`)
//! - a **due date** resolved against a supplied "now" (tomorrow at 15:00)
//! - **tags** from the category lexicon (`["Meeting"]`)
//!
//! All vocabulary lives in the [`Lexicon`], which can be extended from a
//! TOML file without touching the rules.
//!
//! # Example Usage
//!
//! ```
//! use chrono::NaiveDate;
//! use taskwise_domain::Priority;
//! use taskwise_extractor::Extractor;
//!
//! let now = NaiveDate::from_ymd_opt(2025, 3, 12)
//!     .unwrap()
//!     .and_hms_opt(10, 0, 0)
//!     .unwrap();
//!
//! let parsed = Extractor::default().parse_at("tomorrow at 9am review the report", now);
//! assert_eq!(parsed.title, "review the report");
//! assert_eq!(parsed.priority, Priority::Medium);
//! assert_eq!(parsed.tags, vec!["Review".to_string()]);
//! ```

#![warn(missing_docs)]

mod breakdown;
mod config;
mod datetime;
mod error;
mod extractor;
mod lexicon;
mod priority;
mod tags;
mod title;


pub use breakdown::{fallback_steps, is_cjk};
pub use config::ExtractorConfig;
pub use datetime::{clock_time, relative_date, resolve_due};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use lexicon::{Category, Lexicon, LexiconExtension, PriorityExtension, PriorityTriggers};
pub use priority::{recommend_priority, scan_priority};
pub use tags::infer_tags;
pub use title::{clean_title, TitleCleaner};
