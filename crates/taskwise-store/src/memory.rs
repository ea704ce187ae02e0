//! In-memory task store

use crate::StoreError;
use taskwise_domain::{NewTask, Page, Task, TaskFilter, TaskId, TaskPatch, TaskStore};
use tracing::debug;

/// A [`TaskStore`] keeping tasks in a vector, in creation order
///
/// Listing returns tasks oldest first. Suitable for tests, demos and
/// single-process tools.
#[derive(Debug, Default, Clone)]
pub struct MemoryTaskStore {
    tasks: Vec<Task>,
}

impl MemoryTaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}

impl TaskStore for MemoryTaskStore {
    type Error = StoreError;

    fn create_task(&mut self, task: NewTask) -> Result<Task, Self::Error> {
        if task.title.trim().is_empty() {
            return Err(StoreError::InvalidData("title must not be empty".to_string()));
        }
        let task = Task::create(task);
        debug!("Storing task {}", task.id);
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Ok(self.position(id).map(|i| self.tasks[i].clone()))
    }

    fn list_tasks(&self, filter: &TaskFilter, page: Page) -> Result<(Vec<Task>, usize), Self::Error> {
        let matching: Vec<&Task> = self.tasks.iter().filter(|task| filter.matches(task)).collect();
        let total = matching.len();
        let tasks = matching
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect();
        Ok((tasks, total))
    }

    fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<Option<Task>, Self::Error> {
        if matches!(&patch.title, Some(title) if title.trim().is_empty()) {
            return Err(StoreError::InvalidData("title must not be empty".to_string()));
        }
        Ok(self.position(id).map(|i| {
            self.tasks[i].apply(patch);
            self.tasks[i].clone()
        }))
    }

    fn delete_task(&mut self, id: TaskId) -> Result<bool, Self::Error> {
        match self.position(id) {
            Some(i) => {
                self.tasks.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskwise_domain::{ParsedTask, Priority, TaskStatus};

    fn new_task(title: &str, priority: Priority) -> NewTask {
        let mut parsed = ParsedTask::titled(title);
        parsed.priority = priority;
        NewTask::from(parsed)
    }

    #[test]
    fn test_create_and_get() {
        let mut store = MemoryTaskStore::new();
        let task = store.create_task(new_task("Buy milk", Priority::Low)).unwrap();

        let fetched = store.get_task(task.id).unwrap().unwrap();
        assert_eq!(fetched, task);
        assert_eq!(fetched.status, TaskStatus::Pending);
        assert!(store.get_task(TaskId::new()).unwrap().is_none());
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut store = MemoryTaskStore::new();
        assert!(matches!(
            store.create_task(new_task("  ", Priority::Medium)),
            Err(StoreError::InvalidData(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_and_delete_missing() {
        let mut store = MemoryTaskStore::new();
        assert!(store.update_task(TaskId::new(), TaskPatch::default()).unwrap().is_none());
        assert!(!store.delete_task(TaskId::new()).unwrap());
    }
}
