//! Taskwise Storage Layer
//!
//! In-memory implementations of the task collaborators: a task store with
//! filters and pagination, and a similarity index built on local
//! embeddings and an HNSW graph.
//!
//! # Architecture
//!
//! - [`MemoryTaskStore`]: tasks in creation order
//! - [`SemanticIndex`]: text → [`HashEmbedder`] → [`VectorIndex`]
//!
//! # Examples
//!
//! ```
//! use taskwise_domain::{NewTask, ParsedTask, TaskIndex, TaskStore};
//! use taskwise_store::{MemoryTaskStore, SemanticIndex};
//!
//! let mut store = MemoryTaskStore::new();
//! let mut index = SemanticIndex::with_hash_embedder();
//!
//! let task = store.create_task(NewTask::from(ParsedTask::titled("Renew passport"))).unwrap();
//! index.index_task(task.id, &task.index_text()).unwrap();
//!
//! let hits = index.query_nearest("passport", 1).unwrap();
//! assert_eq!(hits[0].0, task.id);
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod memory;
pub mod semantic;
pub mod vector_index;

pub use embedding::{EmbeddingError, EmbeddingModel, HashEmbedder};
pub use memory::MemoryTaskStore;
pub use semantic::{SemanticIndex, SemanticIndexError};
pub use vector_index::{VectorIndex, VectorIndexError};

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
