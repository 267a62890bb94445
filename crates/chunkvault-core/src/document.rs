use serde::{Deserialize, Serialize};

/// Provenance used when a document does not say where it came from.
pub const DEFAULT_SOURCE: &str = "manual";

/// A content chunk stored in a vector store.
///
/// The `id` is assigned by whoever ingests the document; stores never check
/// it for uniqueness, so two documents with the same id are both kept and
/// both retrievable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier assigned by the ingestion side.
    #[serde(default)]
    pub id: String,
    /// The text chunk.
    pub content: String,
    /// Pre-computed embedding of `content`.
    #[serde(default)]
    pub embedding: Vec<f64>,
    /// Position of this chunk within its source.
    #[serde(default)]
    pub chunk_number: u32,
    /// Name of the source (e.g. a file name).
    #[serde(default = "default_source")]
    pub source_name: String,
    /// Kind of source (e.g. `"file"`, `"string"`).
    #[serde(default = "default_source")]
    pub source_type: String,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

impl Document {
    /// Creates a document with the given content and default metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            content: content.into(),
            embedding: Vec::new(),
            chunk_number: 0,
            source_name: default_source(),
            source_type: default_source(),
        }
    }

    /// Sets the identifier. Chainable builder method.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the embedding. Chainable builder method.
    pub fn with_embedding(mut self, embedding: Vec<f64>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Sets the chunk position. Chainable builder method.
    pub fn with_chunk_number(mut self, chunk_number: u32) -> Self {
        self.chunk_number = chunk_number;
        self
    }

    /// Sets source name and type. Chainable builder method.
    pub fn with_source(
        mut self,
        source_name: impl Into<String>,
        source_type: impl Into<String>,
    ) -> Self {
        self.source_name = source_name.into();
        self.source_type = source_type.into();
        self
    }

    /// Length of the embedding vector.
    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}
