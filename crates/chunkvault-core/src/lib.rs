//! Core types and error definitions for chunkvault.
//!
//! This crate provides the types shared by every chunkvault crate: the
//! [`Document`] stored in a vector store and the unified error type.
//!
//! # Main types
//!
//! - [`Document`] — A content chunk plus its embedding and provenance.
//! - [`ChunkvaultError`] — Unified error enum for all chunkvault operations.
//! - [`ChunkvaultResult`] — Convenience alias for `Result<T, ChunkvaultError>`.

/// The document model.
pub mod document;
/// Error types.
pub mod error;

pub use document::{Document, DEFAULT_SOURCE};
pub use error::{ChunkvaultError, ChunkvaultResult};
