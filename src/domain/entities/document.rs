use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A document submitted for question answering, as stored in the vector index.
///
/// The id is derived from the content itself, so re-submitting the same text
/// overwrites its own record and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub content: String,
    pub indexed_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn from_content(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, content.as_bytes()),
            content,
            indexed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub record: DocumentRecord,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_deterministic_for_equal_content() {
        let a = DocumentRecord::from_content("the same text");
        let b = DocumentRecord::from_content("the same text");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_id_differs_for_different_content() {
        let a = DocumentRecord::from_content("first document");
        let b = DocumentRecord::from_content("second document");
        assert_ne!(a.id, b.id);
    }
}
