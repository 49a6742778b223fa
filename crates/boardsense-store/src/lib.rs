//! # Boardsense Store
//!
//! A namespaced vector store interface. The store is constructed and owned by
//! the caller (typically one namespace per board), so its lifetime and
//! sharing are explicit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

mod error;
mod memory;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryVectorStore;

/// An embedding with its id and free-form metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorItem {
    pub id: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl VectorItem {
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        VectorItem {
            id: id.into(),
            vector,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A query hit, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub item: VectorItem,
    /// Cosine similarity in `[-1, 1]`
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace an item by id
    async fn upsert(&self, namespace: &str, item: VectorItem) -> StoreResult<()>;

    /// Up to `k` items most similar to `vector`. An unknown namespace yields
    /// no matches.
    async fn query(&self, namespace: &str, vector: &[f32], k: usize) -> StoreResult<Vec<QueryMatch>>;

    /// Drop a namespace and everything in it; `false` if it did not exist
    async fn delete_namespace(&self, namespace: &str) -> StoreResult<bool>;

    async fn count(&self, namespace: &str) -> StoreResult<usize>;
}

/// Cosine similarity of two equal-length vectors; zero when either has no magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
