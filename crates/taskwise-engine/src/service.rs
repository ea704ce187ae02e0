//! Task service: validation in front of the orchestrator, plus the task
//! store and similarity index collaborators
//!
//! The orchestrator never fails; everything that can go wrong here is
//! caller misuse (blank text, out-of-range `k`) or a collaborator error.

use crate::error::{EngineError, Result};
use crate::orchestrator::Orchestrator;
use chrono::NaiveDateTime;
use taskwise_domain::{
    NewTask, Page, ParsedTask, PriorityRecommendation, Task, TaskFilter, TaskId, TaskIndex,
    TaskPatch, TaskStore,
};
use tracing::{debug, info, warn};

/// Maximum accepted length of free-text input, in characters
pub const MAX_INPUT_CHARS: usize = 2000;

/// Upper bound on `k` for semantic search
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Task operations backed by an orchestrator, a store and an index
pub struct TaskAssistant<S, I> {
    orchestrator: Orchestrator,
    store: S,
    index: I,
}

impl<S, I> TaskAssistant<S, I>
where
    S: TaskStore,
    S::Error: std::fmt::Display,
    I: TaskIndex,
    I::Error: std::fmt::Display,
{
    /// Create a service over the given collaborators
    pub fn new(orchestrator: Orchestrator, store: S, index: I) -> Self {
        Self {
            orchestrator,
            store,
            index,
        }
    }

    /// The orchestrator
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// The task store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The similarity index
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Parse free text into task attributes
    pub async fn parse(&self, text: &str) -> Result<ParsedTask> {
        let text = validate_text("text", text)?;
        Ok(self.orchestrator.parse(text).await.into_value())
    }

    /// Parse free text against an explicit reference instant
    pub async fn parse_at(&self, text: &str, now: NaiveDateTime) -> Result<ParsedTask> {
        let text = validate_text("text", text)?;
        Ok(self.orchestrator.parse_at(text, now).await.into_value())
    }

    /// Suggest tags for a task
    pub async fn suggest_tags(&self, title: &str, description: Option<&str>) -> Result<Vec<String>> {
        let title = validate_text("title", title)?;
        Ok(self
            .orchestrator
            .suggest_tags(title, description)
            .await
            .into_value())
    }

    /// Break a task into subtasks
    pub async fn breakdown(&self, description: &str) -> Result<Vec<String>> {
        let description = validate_text("description", description)?;
        Ok(self.orchestrator.breakdown(description).await.into_value())
    }

    /// Recommend a priority for a task
    pub async fn recommend_priority(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<PriorityRecommendation> {
        let title = validate_text("title", title)?;
        Ok(self
            .orchestrator
            .recommend_priority(title, description)
            .await
            .into_value())
    }

    /// Parse free text and store the result as a new task
    ///
    /// Tags are filled through [`Orchestrator::suggest_tags`] when the parse
    /// produced none. The task is indexed after it is stored; an indexing
    /// failure is logged and the stored task is still returned.
    pub async fn parse_and_create(&mut self, text: &str) -> Result<Task> {
        let text = validate_text("text", text)?;
        let mut parsed = self.orchestrator.parse(text).await.into_value();

        if parsed.tags.is_empty() {
            parsed.tags = self
                .orchestrator
                .suggest_tags(&parsed.title, parsed.description.as_deref())
                .await
                .into_value();
        }

        self.create_task(NewTask::from(parsed))
    }

    /// Store a task and index it
    pub fn create_task(&mut self, task: NewTask) -> Result<Task> {
        validate_text("title", &task.title)?;

        let task = self
            .store
            .create_task(task)
            .map_err(|e| EngineError::Store(e.to_string()))?;
        info!("Created task {}", task.id);

        if let Err(e) = self.index.index_task(task.id, &task.index_text()) {
            warn!("Failed to index task {}: {}", task.id, e);
        }
        Ok(task)
    }

    /// Fetch a task
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.store
            .get_task(id)
            .map_err(|e| EngineError::Store(e.to_string()))
    }

    /// List tasks matching `filter`, with the total match count
    pub fn list_tasks(&self, filter: &TaskFilter, page: Page) -> Result<(Vec<Task>, usize)> {
        if page.limit == 0 {
            return Err(EngineError::InvalidInput(
                "limit must be greater than 0".to_string(),
            ));
        }
        self.store
            .list_tasks(filter, page)
            .map_err(|e| EngineError::Store(e.to_string()))
    }

    /// Update a task; re-indexes it when its title or description changed
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>> {
        if let Some(title) = &patch.title {
            validate_text("title", title)?;
        }
        let reindex = patch.changes_indexed_text();

        let updated = self
            .store
            .update_task(id, patch)
            .map_err(|e| EngineError::Store(e.to_string()))?;

        if let Some(task) = &updated {
            if reindex {
                if let Err(e) = self.index.reindex_task(task.id, &task.index_text()) {
                    warn!("Failed to re-index task {}: {}", task.id, e);
                }
            }
        }
        Ok(updated)
    }

    /// Delete a task and drop it from the index
    pub fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        let deleted = self
            .store
            .delete_task(id)
            .map_err(|e| EngineError::Store(e.to_string()))?;

        if deleted {
            if let Err(e) = self.index.remove_task(id) {
                warn!("Failed to remove task {} from index: {}", id, e);
            }
        }
        Ok(deleted)
    }

    /// Tasks most similar to `query`, nearest first, with their distances
    ///
    /// Ids the index returns that are no longer in the store are skipped.
    pub fn semantic_search(&self, query: &str, k: usize) -> Result<Vec<(Task, f32)>> {
        let query = validate_text("query", query)?;
        if !(1..=MAX_SEARCH_RESULTS).contains(&k) {
            return Err(EngineError::InvalidInput(format!(
                "k must be between 1 and {}",
                MAX_SEARCH_RESULTS
            )));
        }

        let hits = self
            .index
            .query_nearest(query, k)
            .map_err(|e| EngineError::Index(e.to_string()))?;

        let mut results = Vec::with_capacity(hits.len());
        for (id, distance) in hits {
            match self.get_task(id)? {
                Some(task) => results.push((task, distance)),
                None => debug!("Index returned unknown task {}", id),
            }
        }
        Ok(results)
    }
}

fn validate_text<'a>(field: &str, text: &'a str) -> Result<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{} must not be empty", field)));
    }
    if trimmed.chars().count() > MAX_INPUT_CHARS {
        return Err(EngineError::InvalidInput(format!(
            "{} exceeds {} characters",
            field, MAX_INPUT_CHARS
        )));
    }
    Ok(trimmed)
}
