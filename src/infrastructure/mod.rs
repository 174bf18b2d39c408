pub mod config;
pub mod embedding;
pub mod llm;
pub mod vector_store;

pub use config::{AppConfig, ConfigError, PromptsConfig, QueryPromptConfig};
pub use embedding::TextEmbedding;
pub use llm::OpenAiChat;
pub use vector_store::{InMemoryVectorStore, QdrantVectorStore};
