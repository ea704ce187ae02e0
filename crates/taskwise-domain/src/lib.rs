//! Taskwise Domain Layer
//!
//! Core value types shared by every other Taskwise crate: the parsed task
//! attributes produced by the language-understanding engine, the priority
//! scale, the stored task record, and the collaborator traits for the task
//! store and the similarity index.
//!
//! ## Key Concepts
//!
//! - **ParsedTask**: attributes extracted from free-form text, never persisted as-is
//! - **Priority**: closed `low < medium < high` scale, `medium` by default
//! - **Task**: a stored record created from a `ParsedTask`
//! - **TaskStore / TaskIndex**: boundaries implemented by infrastructure crates
//!
//! ## Architecture
//!
//! Pure data and trait definitions only. Infrastructure implementations
//! (remote providers, storage, indexing) live in other crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod priority;
pub mod task;
pub mod traits;

// Re-exports for convenience
pub use priority::{Priority, PriorityRecommendation};
pub use task::{NewTask, ParsedTask, Task, TaskId, TaskPatch, TaskStatus};
pub use traits::{Page, TaskFilter, TaskIndex, TaskStore};
