mod document;
mod embedding;

pub use document::{DocumentRecord, SearchResult};
pub use embedding::Embedding;
