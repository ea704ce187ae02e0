//! Task module - parsed task attributes and the stored task record

use crate::priority::Priority;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a stored task based on UUIDv7
///
/// UUIDv7 keeps identifiers chronologically sortable, so listing by id
/// also lists by creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(uuid::Uuid);

impl TaskId {
    /// Generate a new UUIDv7-based TaskId
    ///
    /// # Examples
    ///
    /// ```
    /// use taskwise_domain::TaskId;
    ///
    /// let a = TaskId::new();
    /// let b = TaskId::new();
    /// assert_ne!(a, b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// Parse a TaskId from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid task id: {}", e))
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

/// Lifecycle status of a stored task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Pending,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" | "done" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task attributes extracted from free-form text
///
/// Produced fresh for every parse request and handed to the caller by
/// value. It has no identity of its own; it becomes a [`Task`] only when
/// a store creates one from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTask {
    /// Short task title
    pub title: String,

    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Priority level
    #[serde(default)]
    pub priority: Priority,

    /// Absolute due date and time, in local wall-clock time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<NaiveDateTime>,

    /// Category labels, most relevant first
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ParsedTask {
    /// Create parsed attributes with only a title; everything else defaulted
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::Medium,
            due_at: None,
            tags: Vec::new(),
        }
    }
}

/// Input payload for creating a stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title (must not be blank)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Initial status
    pub status: TaskStatus,

    /// Priority level
    pub priority: Priority,

    /// Category labels
    pub tags: Vec<String>,

    /// Due date and time
    pub due_at: Option<NaiveDateTime>,
}

impl From<ParsedTask> for NewTask {
    fn from(parsed: ParsedTask) -> Self {
        Self {
            title: parsed.title,
            description: parsed.description,
            status: TaskStatus::Pending,
            priority: parsed.priority,
            tags: parsed.tags,
            due_at: parsed.due_at,
        }
    }
}

/// Partial update for a stored task; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<Priority>,

    /// Replacement tag list
    pub tags: Option<Vec<String>>,

    /// New due date
    pub due_at: Option<NaiveDateTime>,
}

impl TaskPatch {
    /// Whether the patch touches the fields that feed the similarity index
    pub fn changes_indexed_text(&self) -> bool {
        self.title.is_some() || self.description.is_some()
    }
}

/// A stored task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Lifecycle status
    pub status: TaskStatus,

    /// Priority level
    pub priority: Priority,

    /// Category labels
    pub tags: Vec<String>,

    /// Due date and time
    pub due_at: Option<NaiveDateTime>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh record from a creation payload
    pub fn create(new: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            tags: new.tags,
            due_at: new.due_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(due_at) = patch.due_at {
            self.due_at = Some(due_at);
        }
        self.updated_at = Utc::now();
    }

    /// Text used to place the task in the similarity index
    pub fn index_text(&self) -> String {
        match &self.description {
            Some(description) if !description.is_empty() => {
                format!("{} {}", self.title, description)
            }
            _ => self.title.clone(),
        }
    }
}
