use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{ChatService, EmbeddingService, VectorStore},
    DocumentRecord, DomainError, Embedding, SearchResult,
};
use crate::infrastructure::config::QueryPromptConfig;

/// Answers questions about a submitted document.
///
/// The pipeline is strictly sequential: validate, embed document and question,
/// upsert then search the vector store, then one chat completion. The embed
/// and store stages only run when retrieval is enabled; the completion stage
/// always runs.
pub struct QueryService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatService>,
    prompt: QueryPromptConfig,
    retrieval_enabled: bool,
    top_k: usize,
}

impl QueryService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        chat: Arc<dyn ChatService>,
        prompt: QueryPromptConfig,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            chat,
            prompt,
            retrieval_enabled: false,
            top_k: 3,
        }
    }

    pub fn with_retrieval(mut self, top_k: usize) -> Self {
        self.retrieval_enabled = true;
        self.top_k = top_k;
        self
    }

    #[instrument(skip(self, question, resume), fields(resume_len = resume.len()))]
    pub async fn answer(&self, question: &str, resume: &str) -> Result<String, DomainError> {
        if question.trim().is_empty() || resume.trim().is_empty() {
            return Err(DomainError::validation("Missing question or resume content"));
        }

        let matches = if self.retrieval_enabled {
            self.index_and_retrieve(question, resume).await?
        } else {
            Vec::new()
        };

        let system = self
            .prompt
            .render(resume, question, &format_context(&matches));
        let answer = self.chat.complete_with_system(&system, question).await?;

        Ok(answer.trim().to_string())
    }

    /// Upserts the document vector, then retrieves the question's nearest
    /// neighbors. The upsert always precedes the search.
    async fn index_and_retrieve(
        &self,
        question: &str,
        resume: &str,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let document_vector = self.embed_checked(resume).await?;
        let question_vector = self.embed_checked(question).await?;

        let record = DocumentRecord::from_content(resume);
        self.vector_store.upsert(&record, &document_vector).await?;
        self.vector_store.search(&question_vector, self.top_k).await
    }

    async fn embed_checked(&self, text: &str) -> Result<Embedding, DomainError> {
        let embedding = self.embedding.embed(text).await?;
        let expected = self.embedding.dimension();
        if !embedding.matches_dimension(expected) {
            return Err(DomainError::DimensionMismatch {
                expected,
                got: embedding.dimension(),
            });
        }
        Ok(embedding)
    }
}

fn format_context(matches: &[SearchResult]) -> String {
    if matches.is_empty() {
        return String::new();
    }

    let excerpts = matches
        .iter()
        .enumerate()
        .map(|(i, r)| format!("[{}] {}", i + 1, r.record.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("\nRelevant excerpts from previously indexed documents:\n{excerpts}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct CallLog(Arc<Mutex<Vec<String>>>);

    impl CallLog {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeEmbedding {
        log: CallLog,
        reported_dimension: usize,
        produced_dimension: usize,
    }

    #[async_trait]
    impl EmbeddingService for FakeEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            self.log.push(format!("embed:{text}"));
            Ok(Embedding::new(vec![0.1; self.produced_dimension]))
        }

        fn dimension(&self) -> usize {
            self.reported_dimension
        }
    }

    struct FakeStore {
        log: CallLog,
        matches: Vec<SearchResult>,
    }

    #[async_trait]
    impl VectorStore for FakeStore {
        async fn upsert(
            &self,
            _record: &DocumentRecord,
            _embedding: &Embedding,
        ) -> Result<(), DomainError> {
            self.log.push("upsert");
            Ok(())
        }

        async fn search(
            &self,
            _query: &Embedding,
            _top_k: usize,
        ) -> Result<Vec<SearchResult>, DomainError> {
            self.log.push("search");
            Ok(self.matches.clone())
        }

        async fn ping(&self) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct FakeChat {
        log: CallLog,
        reply: String,
        seen: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl ChatService for FakeChat {
        async fn complete_with_system(
            &self,
            system: &str,
            prompt: &str,
        ) -> Result<String, DomainError> {
            self.log.push("complete");
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            Ok(self.reply.clone())
        }
    }

    struct FailingChat;

    #[async_trait]
    impl ChatService for FailingChat {
        async fn complete_with_system(
            &self,
            _system: &str,
            _prompt: &str,
        ) -> Result<String, DomainError> {
            Err(DomainError::external("completion provider unreachable"))
        }
    }

    struct Harness {
        log: CallLog,
        seen: Arc<Mutex<Vec<(String, String)>>>,
        service: QueryService,
    }

    fn harness(reply: &str, matches: Vec<SearchResult>, produced_dimension: usize) -> Harness {
        let log = CallLog::default();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let service = QueryService::new(
            Arc::new(FakeEmbedding {
                log: log.clone(),
                reported_dimension: 4,
                produced_dimension,
            }),
            Arc::new(FakeStore {
                log: log.clone(),
                matches,
            }),
            Arc::new(FakeChat {
                log: log.clone(),
                reply: reply.to_string(),
                seen: seen.clone(),
            }),
            QueryPromptConfig::default(),
        );

        Harness { log, seen, service }
    }

    fn excerpt(content: &str) -> SearchResult {
        SearchResult {
            record: DocumentRecord::from_content(content),
            score: 0.9,
        }
    }

    #[tokio::test]
    async fn test_empty_question_issues_no_calls() {
        let h = harness("unused", vec![], 4);
        let service = h.service.with_retrieval(3);

        let err = service.answer("  ", "some document").await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation error: Missing question or resume content");
        assert!(h.log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_empty_resume_issues_no_calls() {
        let h = harness("unused", vec![], 4);

        let err = h.service.answer("a question", "").await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(h.log.entries().is_empty());
    }

    #[tokio::test]
    async fn test_completion_only_pipeline() {
        let h = harness("  {\"answer\": \"john@example.com\"}  ", vec![], 4);

        let answer = h
            .service
            .answer("What is the candidate's email?", "contains john@example.com")
            .await
            .unwrap();

        assert_eq!(answer, "{\"answer\": \"john@example.com\"}");
        assert_eq!(h.log.entries(), vec!["complete"]);

        let seen = h.seen.lock().unwrap();
        let (system, prompt) = &seen[0];
        assert!(system.contains("Document: contains john@example.com"));
        assert!(system.contains("Question: What is the candidate's email?"));
        assert_eq!(prompt, "What is the candidate's email?");
    }

    #[tokio::test]
    async fn test_retrieval_pipeline_call_order() {
        let h = harness("{\"answer\": \"x\"}", vec![excerpt("stored text")], 4);
        let service = h.service.with_retrieval(3);

        service.answer("the question", "the document").await.unwrap();

        assert_eq!(
            h.log.entries(),
            vec![
                "embed:the document",
                "embed:the question",
                "upsert",
                "search",
                "complete"
            ]
        );
    }

    #[tokio::test]
    async fn test_retrieved_matches_fold_into_prompt() {
        let h = harness("{\"answer\": \"x\"}", vec![excerpt("first hit"), excerpt("second hit")], 4);
        let service = h.service.with_retrieval(3);

        service.answer("q", "doc").await.unwrap();

        let seen = h.seen.lock().unwrap();
        let (system, _) = &seen[0];
        assert!(system.contains("[1] first hit"));
        assert!(system.contains("[2] second hit"));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_aborts_before_store_and_completion() {
        let h = harness("unused", vec![], 7);
        let service = h.service.with_retrieval(3);

        let err = service.answer("q", "doc").await.unwrap_err();

        assert!(matches!(
            err,
            DomainError::DimensionMismatch { expected: 4, got: 7 }
        ));
        assert_eq!(h.log.entries(), vec!["embed:doc"]);
    }

    #[tokio::test]
    async fn test_chat_failure_propagates() {
        let log = CallLog::default();
        let service = QueryService::new(
            Arc::new(FakeEmbedding {
                log: log.clone(),
                reported_dimension: 4,
                produced_dimension: 4,
            }),
            Arc::new(FakeStore {
                log: log.clone(),
                matches: vec![],
            }),
            Arc::new(FailingChat),
            QueryPromptConfig::default(),
        );

        let err = service.answer("q", "doc").await.unwrap_err();

        assert!(matches!(err, DomainError::ExternalService(_)));
    }
}
