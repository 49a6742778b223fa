use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::{cosine_similarity, QueryMatch, VectorItem, VectorStore};

#[derive(Debug, Default)]
struct Namespace {
    /// Fixed by the first item stored
    dimension: usize,
    items: HashMap<String, VectorItem>,
}

/// In-memory vector store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    namespaces: Arc<RwLock<HashMap<String, Namespace>>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_dimension(namespace: &str, expected: usize, actual: usize) -> StoreResult<()> {
        if expected != actual {
            return Err(StoreError::DimensionMismatch {
                namespace: namespace.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, namespace: &str, item: VectorItem) -> StoreResult<()> {
        if item.vector.is_empty() {
            return Err(StoreError::EmptyVector);
        }

        let mut namespaces = self.namespaces.write().await;
        let entry = namespaces.entry(namespace.to_string()).or_insert_with(|| Namespace {
            dimension: item.vector.len(),
            items: HashMap::new(),
        });
        Self::check_dimension(namespace, entry.dimension, item.vector.len())?;

        debug!(namespace, id = %item.id, "Upserting vector");
        entry.items.insert(item.id.clone(), item);
        Ok(())
    }

    async fn query(&self, namespace: &str, vector: &[f32], k: usize) -> StoreResult<Vec<QueryMatch>> {
        if vector.is_empty() {
            return Err(StoreError::EmptyVector);
        }

        let namespaces = self.namespaces.read().await;
        let Some(entry) = namespaces.get(namespace) else {
            return Ok(Vec::new());
        };
        Self::check_dimension(namespace, entry.dimension, vector.len())?;

        let mut matches: Vec<QueryMatch> = entry
            .items
            .values()
            .map(|item| QueryMatch {
                score: cosine_similarity(&item.vector, vector),
                item: item.clone(),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item.id.cmp(&b.item.id))
        });
        matches.truncate(k);
        Ok(matches)
    }

    async fn delete_namespace(&self, namespace: &str) -> StoreResult<bool> {
        let mut namespaces = self.namespaces.write().await;
        let removed = namespaces.remove(namespace).is_some();
        debug!(namespace, removed, "Deleted namespace");
        Ok(removed)
    }

    async fn count(&self, namespace: &str) -> StoreResult<usize> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces.get(namespace).map(|entry| entry.items.len()).unwrap_or(0))
    }
}
