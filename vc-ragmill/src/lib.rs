//! ```text
//! Raw source text ──► chunker::chunk_text ──────────► Vec<TextChunk>
//!                 └─► chunker::chunk_by_paragraphs ──► Vec<TextChunk>
//!
//! Vec<TextChunk> ──► Retriever::find_relevant_passages ──► ranked passages
//!                                  │
//!                                  └─► embeddings::EmbeddingProvider
//!                                        ├─► HttpEmbeddingProvider (remote)
//!                                        └─► HashedEmbeddingProvider (local)
//!
//! Claim + long source ──► Retriever::relevant_context ──► bounded context
//! ```
//!
pub mod chunker;
pub mod embeddings;
pub mod retriever;
pub mod types;

pub use chunker::{TextChunk, chunk_by_paragraphs, chunk_text};
pub use embeddings::{EmbeddingProvider, HashedEmbeddingProvider, HttpEmbeddingProvider};
pub use retriever::{RelevantPassage, Retriever, cosine_similarity};
pub use types::RagError;
