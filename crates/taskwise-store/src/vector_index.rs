//! HNSW Vector Index for Semantic Search
//!
//! Wraps `hnsw_rs` for nearest-neighbour search over task embeddings.
//!
//! # Removal
//!
//! HNSW graphs do not support deleting points. Removing or re-embedding a
//! task tombstones its old point: the point stays in the graph but is no
//! longer mapped to a task, and searches over-fetch by the number of
//! tombstones so `k` live results can still be returned. Once tombstones
//! outnumber both the live points and [`COMPACT_MIN_TOMBSTONES`], the next
//! `upsert` or `remove` rebuilds the graph from the live points;
//! [`VectorIndex::compact`] does the same on demand.
//!
//! # HNSW Parameters
//!
//! - **M**: Number of bi-directional links per node (default: 16)
//! - **efConstruction**: Candidate list size during construction (default: 200)
//! - **efSearch**: Candidate list size during search (default: 64)

use hnsw_rs::prelude::*;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use taskwise_domain::TaskId;
use thiserror::Error;
use tracing::debug;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const DEFAULT_MAX_ELEMENTS: usize = 100_000;

/// Default search quality parameter
pub const DEFAULT_EF_SEARCH: usize = 64;

/// Tombstones tolerated before automatic compaction, regardless of index size
pub const COMPACT_MIN_TOMBSTONES: usize = 64;

/// Errors that can occur during vector index operations
#[derive(Error, Debug)]
pub enum VectorIndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },
}

struct Inner {
    hnsw: Hnsw<'static, f32, DistCosine>,
    /// Internal point id to task, live points only
    points: HashMap<usize, TaskId>,
    /// Task to its live point id
    tasks: HashMap<TaskId, usize>,
    /// Embeddings of live points, kept for compaction
    vectors: HashMap<usize, Vec<f32>>,
    next_id: usize,
    tombstones: usize,
}

impl Inner {
    fn empty() -> Self {
        Self {
            hnsw: new_graph(),
            points: HashMap::new(),
            tasks: HashMap::new(),
            vectors: HashMap::new(),
            next_id: 0,
            tombstones: 0,
        }
    }

    fn tombstone(&mut self, task_id: TaskId) -> bool {
        match self.tasks.remove(&task_id) {
            Some(point) => {
                self.points.remove(&point);
                self.vectors.remove(&point);
                self.tombstones += 1;
                true
            }
            None => false,
        }
    }

    fn needs_compaction(&self) -> bool {
        self.tombstones > COMPACT_MIN_TOMBSTONES.max(self.points.len())
    }

    fn compact(&mut self) {
        let live: Vec<(TaskId, Vec<f32>)> = self
            .tasks
            .iter()
            .filter_map(|(&task_id, point)| self.vectors.get(point).map(|v| (task_id, v.clone())))
            .collect();

        debug!(
            "Compacting vector index: {} live, {} tombstones",
            live.len(),
            self.tombstones
        );

        let mut rebuilt = Inner::empty();
        for (task_id, vector) in live {
            rebuilt.insert(task_id, vector);
        }
        *self = rebuilt;
    }

    fn insert(&mut self, task_id: TaskId, vector: Vec<f32>) {
        let point = self.next_id;
        self.next_id += 1;
        self.hnsw.insert((&vector, point));
        self.points.insert(point, task_id);
        self.tasks.insert(task_id, point);
        self.vectors.insert(point, vector);
    }
}

fn new_graph() -> Hnsw<'static, f32, DistCosine> {
    let nb_layer = 16.min((DEFAULT_MAX_ELEMENTS as f32).ln().trunc() as usize);
    Hnsw::<'static, f32, DistCosine>::new(
        DEFAULT_M,
        DEFAULT_MAX_ELEMENTS,
        nb_layer,
        DEFAULT_EF_CONSTRUCTION,
        DistCosine {},
    )
}

/// Nearest-neighbour index from embeddings to task ids
///
/// # Examples
///
/// ```no_run
/// use taskwise_store::vector_index::VectorIndex;
/// use taskwise_domain::TaskId;
///
/// let index = VectorIndex::new(3);
/// let id = TaskId::new();
/// index.upsert(id, &[1.0, 0.0, 0.0]).unwrap();
///
/// let results = index.search(&[1.0, 0.0, 0.0], 5).unwrap();
/// assert_eq!(results[0].0, id);
/// ```
pub struct VectorIndex {
    dimension: usize,
    ef_search: usize,
    inner: Mutex<Inner>,
}

impl VectorIndex {
    /// Create an index for vectors of `dimension` components
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ef_search: DEFAULT_EF_SEARCH,
            inner: Mutex::new(Inner::empty()),
        }
    }

    /// Set the search quality parameter
    pub fn with_ef_search(mut self, ef_search: usize) -> Self {
        self.ef_search = ef_search.max(1);
        self
    }

    /// Embedding dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), VectorIndexError> {
        if vector.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    /// Insert or replace the embedding of a task
    pub fn upsert(&self, task_id: TaskId, embedding: &[f32]) -> Result<(), VectorIndexError> {
        self.check_dimension(embedding)?;

        let mut inner = self.lock();
        inner.tombstone(task_id);
        inner.insert(task_id, embedding.to_vec());
        if inner.needs_compaction() {
            inner.compact();
        }
        Ok(())
    }

    /// Remove a task; returns whether it was present
    pub fn remove(&self, task_id: TaskId) -> bool {
        let mut inner = self.lock();
        let removed = inner.tombstone(task_id);
        if inner.needs_compaction() {
            inner.compact();
        }
        removed
    }

    /// Up to `k` tasks nearest to `query`, as `(task, cosine distance)` ascending
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(TaskId, f32)>, VectorIndexError> {
        self.check_dimension(query)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let inner = self.lock();
        if inner.points.is_empty() {
            return Ok(Vec::new());
        }

        let fetch = k + inner.tombstones;
        let mut results: Vec<(TaskId, f32)> = inner
            .hnsw
            .search(query, fetch, self.ef_search.max(fetch))
            .into_iter()
            .filter_map(|neighbour| {
                inner
                    .points
                    .get(&neighbour.d_id)
                    .map(|&task_id| (task_id, neighbour.distance))
            })
            .collect();

        results.sort_by(|a, b| a.1.total_cmp(&b.1));
        results.truncate(k);
        Ok(results)
    }

    /// Number of live tasks in the index
    pub fn len(&self) -> usize {
        self.lock().points.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of dead points still in the graph
    pub fn tombstones(&self) -> usize {
        self.lock().tombstones
    }

    /// Rebuild the graph from live points, dropping tombstones
    pub fn compact(&self) {
        self.lock().compact();
    }

    /// Clear all vectors from the index
    pub fn clear(&self) {
        *self.lock() = Inner::empty();
    }
}
