//! Flat (brute-force) vector index for exact nearest neighbor search.
//!
//! Compares the query against every stored vector. This is the in-process
//! counterpart of an exact `IndexFlatL2`: no training, no approximation.

use thiserror::Error;

use crate::distance::squared_euclidean_distance;
use crate::{Embedding, NodeId, SearchResult};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlatIndexError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, FlatIndexError>;

/// Flat index for exact Euclidean nearest neighbor search.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dim: usize,
    ids: Vec<NodeId>,
    vectors: Vec<Embedding>,
}

impl FlatIndex {
    /// Euclidean index for the given dimension.
    pub fn l2(dim: usize) -> Self {
        Self {
            dim,
            ids: Vec::new(),
            vectors: Vec::new(),
        }
    }

    fn check_dim(&self, embedding: &Embedding) -> Result<()> {
        if embedding.dim() != self.dim {
            return Err(FlatIndexError::DimensionMismatch {
                expected: self.dim,
                got: embedding.dim(),
            });
        }
        Ok(())
    }

    pub fn insert(&mut self, id: NodeId, embedding: Embedding) -> Result<()> {
        self.check_dim(&embedding)?;
        self.ids.push(id);
        self.vectors.push(embedding);
        Ok(())
    }

    /// Batch insert multiple vectors. Nothing is inserted if any dimension is wrong.
    pub fn insert_batch(&mut self, items: Vec<(NodeId, Embedding)>) -> Result<()> {
        for (_, emb) in &items {
            self.check_dim(emb)?;
        }
        self.ids.reserve(items.len());
        self.vectors.reserve(items.len());
        for (id, emb) in items {
            self.ids.push(id);
            self.vectors.push(emb);
        }
        Ok(())
    }

    /// Search for the k nearest neighbors, closest first.
    ///
    /// Scores are L2 distances.
    pub fn search(&self, query: &Embedding, k: usize) -> Result<Vec<SearchResult>> {
        self.check_dim(query)?;
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut results: Vec<SearchResult> = self
            .ids
            .iter()
            .zip(&self.vectors)
            .map(|(id, emb)| SearchResult::new(*id, squared_euclidean_distance(query.as_slice(), emb.as_slice())))
            .collect();

        let k = k.min(results.len());
        results.select_nth_unstable_by(k - 1, |a, b| a.score.total_cmp(&b.score));
        results.truncate(k);
        results.sort_by(|a, b| a.score.total_cmp(&b.score));

        // Ranked on squared distance, reported as distance
        for r in &mut results {
            r.score = r.score.sqrt();
        }

        Ok(results)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.vectors.clear();
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_vectors() -> Vec<(NodeId, Embedding)> {
        vec![
            (NodeId::new(1), Embedding::new(vec![1.0, 0.0, 0.0])),
            (NodeId::new(2), Embedding::new(vec![0.0, 1.0, 0.0])),
            (NodeId::new(3), Embedding::new(vec![0.0, 0.0, 1.0])),
            (NodeId::new(4), Embedding::new(vec![0.707, 0.707, 0.0])),
            (NodeId::new(5), Embedding::new(vec![0.577, 0.577, 0.577])),
        ]
    }

    #[test]
    fn test_insert_and_search() {
        let mut index = FlatIndex::l2(3);

        for (id, emb) in create_test_vectors() {
            index.insert(id, emb).unwrap();
        }

        assert_eq!(index.len(), 5);

        let query = Embedding::new(vec![0.9, 0.1, 0.0]);
        let results = index.search(&query, 3).unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, NodeId::new(1));
        assert!(results.windows(2).all(|w| w[0].score <= w[1].score));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut index = FlatIndex::l2(3);

        let result = index.insert(NodeId::new(1), Embedding::new(vec![1.0, 0.0]));
        assert_eq!(
            result,
            Err(FlatIndexError::DimensionMismatch { expected: 3, got: 2 })
        );
    }

    #[test]
    fn test_batch_insert_rejects_whole_batch() {
        let mut index = FlatIndex::l2(3);
        let mut items = create_test_vectors();
        items.push((NodeId::new(6), Embedding::new(vec![1.0])));

        assert!(index.insert_batch(items).is_err());
        assert!(index.is_empty());

        index.insert_batch(create_test_vectors()).unwrap();
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_euclidean_metric() {
        let mut index = FlatIndex::l2(3);

        index
            .insert(NodeId::new(1), Embedding::new(vec![0.0, 0.0, 0.0]))
            .unwrap();
        index
            .insert(NodeId::new(2), Embedding::new(vec![3.0, 4.0, 0.0]))
            .unwrap();

        let query = Embedding::new(vec![0.0, 0.0, 0.0]);
        let results = index.search(&query, 2).unwrap();

        assert_eq!(results[0].id, NodeId::new(1));
        assert!((results[0].score - 0.0).abs() < 1e-6);
        assert!((results[1].score - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_k_larger_than_index() {
        let mut index = FlatIndex::l2(3);
        index.insert_batch(create_test_vectors()).unwrap();
        let results = index.search(&Embedding::new(vec![1.0, 0.0, 0.0]), 50).unwrap();
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_empty_search() {
        let index = FlatIndex::l2(3);
        let query = Embedding::new(vec![1.0, 0.0, 0.0]);
        let results = index.search(&query, 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut index = FlatIndex::l2(3);
        index.insert_batch(create_test_vectors()).unwrap();
        index.clear();
        assert!(index.is_empty());
    }
}
