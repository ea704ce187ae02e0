//! Trait definitions for external collaborators
//!
//! The language-understanding engine produces [`ParsedTask`](crate::ParsedTask)
//! values; persisting and indexing them is the job of these collaborators.
//! Infrastructure implementations live in other crates.

use crate::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus};

/// Trait for storing and retrieving tasks
///
/// Implemented by the infrastructure layer (taskwise-store)
pub trait TaskStore {
    /// Error type for store operations
    type Error;

    /// Create a new task and return the stored record
    fn create_task(&mut self, task: NewTask) -> Result<Task, Self::Error>;

    /// Get a task by ID
    fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error>;

    /// List tasks matching the filter, returning one page and the total match count
    fn list_tasks(&self, filter: &TaskFilter, page: Page) -> Result<(Vec<Task>, usize), Self::Error>;

    /// Apply a partial update; `None` when the task does not exist
    fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>, Self::Error>;

    /// Delete a task; `false` when the task does not exist
    fn delete_task(&mut self, id: TaskId) -> Result<bool, Self::Error>;
}

/// Trait for the similarity index over task text
///
/// Implemented by the infrastructure layer (taskwise-store)
pub trait TaskIndex {
    /// Error type for index operations
    type Error;

    /// Add a task's text to the index
    fn index_task(&mut self, id: TaskId, text: &str) -> Result<(), Self::Error>;

    /// Replace the indexed text of a task
    fn reindex_task(&mut self, id: TaskId, text: &str) -> Result<(), Self::Error>;

    /// Remove a task from the index
    fn remove_task(&mut self, id: TaskId) -> Result<(), Self::Error>;

    /// Return up to `k` task ids ordered by ascending distance to `text`
    fn query_nearest(&self, text: &str, k: usize) -> Result<Vec<(TaskId, f32)>, Self::Error>;
}

/// Filter criteria for listing tasks
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only tasks with this status
    pub status: Option<TaskStatus>,

    /// Only tasks with this priority
    pub priority: Option<Priority>,
}

impl TaskFilter {
    /// Whether a task satisfies every set criterion
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
            && self.priority.map_or(true, |priority| task.priority == priority)
    }
}

/// Offset/limit pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of matching records to skip
    pub offset: usize,

    /// Maximum number of records to return
    pub limit: usize,
}

impl Default for Page {
    fn default() -> Self {
        Self { offset: 0, limit: 100 }
    }
}
