mod chat;
mod embedding;
mod vector_store;

pub use chat::ChatService;
pub use embedding::EmbeddingService;
pub use vector_store::VectorStore;
