use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::VectorStore, DocumentRecord, DomainError, Embedding, SearchResult};

/// Cosine-scan store for development and tests. Records are keyed by the
/// document id, so an upsert of equal content replaces its earlier record.
pub struct InMemoryVectorStore {
    records: RwLock<Vec<(DocumentRecord, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(
        &self,
        record: &DocumentRecord,
        embedding: &Embedding,
    ) -> Result<(), DomainError> {
        let mut store = self
            .records
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        store.retain(|(r, _)| r.id != record.id);
        store.push((record.clone(), embedding.clone()));
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let store = self
            .records
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut scored: Vec<SearchResult> = store
            .iter()
            .map(|(record, embedding)| SearchResult {
                record: record.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(scored.into_iter().take(top_k).collect())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_search() {
        let store = InMemoryVectorStore::new();

        let record = DocumentRecord::from_content("test content");
        let embedding = Embedding::new(vec![1.0, 0.0, 0.0]);

        store.upsert(&record, &embedding).await.unwrap();

        let query = Embedding::new(vec![1.0, 0.0, 0.0]);
        let results = store.search(&query, 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.content, "test content");
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_reupsert_of_equal_content_replaces() {
        let store = InMemoryVectorStore::new();

        let record = DocumentRecord::from_content("same text");
        store
            .upsert(&record, &Embedding::new(vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .upsert(
                &DocumentRecord::from_content("same text"),
                &Embedding::new(vec![0.0, 1.0]),
            )
            .await
            .unwrap();

        let results = store
            .search(&Embedding::new(vec![0.0, 1.0]), 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = InMemoryVectorStore::new();

        store
            .upsert(
                &DocumentRecord::from_content("close"),
                &Embedding::new(vec![1.0, 0.1]),
            )
            .await
            .unwrap();
        store
            .upsert(
                &DocumentRecord::from_content("far"),
                &Embedding::new(vec![0.0, 1.0]),
            )
            .await
            .unwrap();

        let results = store
            .search(&Embedding::new(vec![1.0, 0.0]), 2)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.content, "close");
        assert_eq!(results[1].record.content, "far");
    }

    #[tokio::test]
    async fn test_top_k_limits_results() {
        let store = InMemoryVectorStore::new();

        for text in ["a", "b", "c", "d"] {
            store
                .upsert(
                    &DocumentRecord::from_content(text),
                    &Embedding::new(vec![1.0, 0.0]),
                )
                .await
                .unwrap();
        }

        let results = store
            .search(&Embedding::new(vec![1.0, 0.0]), 3)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
    }
}
