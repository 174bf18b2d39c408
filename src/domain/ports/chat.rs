use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// A hosted chat-completion model.
///
/// Implementations send a system instruction plus a single user message and
/// return the text of the first completion choice.
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn complete_with_system(&self, system: &str, prompt: &str)
        -> Result<String, DomainError>;
}
