//! Persistent vector storage with exact, exhaustive similarity search.
//!
//! Documents carry pre-computed embeddings; stores rank them against a query
//! embedding by cosine similarity and return the best `top_k`.
//!
//! # Main types
//!
//! - [`VectorStore`] — Trait for storing and querying documents.
//! - [`FileVectorStore`] — JSONL file-backed store, re-scanned on every query.
//! - [`InMemoryVectorStore`] — Non-persistent store with the same ranking.
//! - [`StoreConfig`] — Directory and `top_k` for a file-backed store.
//! - [`SearchReport`] — Ranked hits plus records skipped as unreadable.

/// One-line record encoding.
pub mod codec;
/// Store configuration.
pub mod config;
/// File-backed store.
pub mod file_store;
/// Cosine similarity scoring.
pub mod similarity;
/// Vector store trait and in-memory implementation.
pub mod store;

pub use codec::{decode_record, encode_record};
pub use config::{StoreConfig, DEFAULT_TOP_K, STORE_FILE_NAME};
pub use file_store::{FileVectorStore, StoreStats};
pub use similarity::{cosine_similarity, validate_embedding};
pub use store::{InMemoryVectorStore, SearchHit, SearchReport, SkippedRecord, VectorStore};
