//! Similarity index over task text

use crate::embedding::{EmbeddingError, EmbeddingModel, HashEmbedder};
use crate::vector_index::{VectorIndex, VectorIndexError};
use taskwise_domain::{TaskId, TaskIndex};
use thiserror::Error;

/// Errors raised by [`SemanticIndex`]
#[derive(Error, Debug)]
pub enum SemanticIndexError {
    /// Text could not be embedded
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The vector index rejected the embedding
    #[error("Vector index error: {0}")]
    VectorIndex(#[from] VectorIndexError),
}

/// A [`TaskIndex`] that embeds task text and searches it with HNSW
pub struct SemanticIndex<M: EmbeddingModel = HashEmbedder> {
    model: M,
    vectors: VectorIndex,
}

impl SemanticIndex<HashEmbedder> {
    /// Index using the default hash embedder
    pub fn with_hash_embedder() -> Self {
        Self::new(HashEmbedder::default())
    }
}

impl<M: EmbeddingModel> SemanticIndex<M> {
    /// Index using `model` for embeddings
    pub fn new(model: M) -> Self {
        let vectors = VectorIndex::new(model.dimension());
        Self { model, vectors }
    }

    /// The underlying vector index
    pub fn vectors(&self) -> &VectorIndex {
        &self.vectors
    }
}

impl Default for SemanticIndex<HashEmbedder> {
    fn default() -> Self {
        Self::with_hash_embedder()
    }
}

impl<M: EmbeddingModel> TaskIndex for SemanticIndex<M> {
    type Error = SemanticIndexError;

    fn index_task(&mut self, id: TaskId, text: &str) -> Result<(), Self::Error> {
        let embedding = self.model.embed(text)?;
        self.vectors.upsert(id, &embedding)?;
        Ok(())
    }

    fn reindex_task(&mut self, id: TaskId, text: &str) -> Result<(), Self::Error> {
        self.index_task(id, text)
    }

    fn remove_task(&mut self, id: TaskId) -> Result<(), Self::Error> {
        self.vectors.remove(id);
        Ok(())
    }

    /// A query with nothing to embed matches no task
    fn query_nearest(&self, text: &str, k: usize) -> Result<Vec<(TaskId, f32)>, Self::Error> {
        let embedding = match self.model.embed(text) {
            Ok(embedding) => embedding,
            Err(EmbeddingError::InvalidInput(_)) => return Ok(Vec::new()),
        };
        Ok(self.vectors.search(&embedding, k)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_ranks_by_shared_words() {
        let mut index = SemanticIndex::with_hash_embedder();
        let report = TaskId::new();
        let groceries = TaskId::new();
        index.index_task(report, "write the quarterly report").unwrap();
        index.index_task(groceries, "buy groceries and milk").unwrap();

        let results = index.query_nearest("quarterly report", 2).unwrap();
        assert_eq!(results[0].0, report);
        assert!(results[0].1 <= results[1].1);
    }

    #[test]
    fn test_unembeddable_text_is_an_error() {
        let mut index = SemanticIndex::with_hash_embedder();
        let result = index.index_task(TaskId::new(), "!!!");
        assert!(matches!(result, Err(SemanticIndexError::Embedding(_))));
    }

    #[test]
    fn test_query_without_words_matches_nothing() {
        let mut index = SemanticIndex::with_hash_embedder();
        index.index_task(TaskId::new(), "call the dentist").unwrap();

        assert!(index.query_nearest("!!!", 5).unwrap().is_empty());
        assert!(index.query_nearest("   ", 5).unwrap().is_empty());
    }

    #[test]
    fn test_remove_task() {
        let mut index = SemanticIndex::with_hash_embedder();
        let id = TaskId::new();
        index.index_task(id, "call the dentist").unwrap();
        index.remove_task(id).unwrap();
        assert!(index.query_nearest("dentist", 5).unwrap().is_empty());
    }
}
