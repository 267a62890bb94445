//! One-line JSON encoding of [`Document`] records.
//!
//! Each record is a single JSON object terminated by the caller with `\n`.
//! JSON string escaping keeps newlines inside `content` off the record
//! boundary, and `serde_json` is built with `float_roundtrip` so embeddings
//! decode to the exact values that were encoded.

use chunkvault_core::{ChunkvaultError, ChunkvaultResult, Document};

/// Encodes a document as a single line, without the trailing newline.
pub fn encode_record(document: &Document) -> ChunkvaultResult<String> {
    // serde_json writes NaN/inf as `null`, which would not decode back.
    if let Some(pos) = document.embedding.iter().position(|x| !x.is_finite()) {
        return Err(ChunkvaultError::Serialization(format!(
            "document '{}': embedding component {pos} is not finite",
            document.id
        )));
    }
    let line = serde_json::to_string(document)?;
    debug_assert!(!line.contains('\n'));
    Ok(line)
}

/// Decodes one record. Surrounding whitespace (including a `\r\n` ending) is
/// ignored.
pub fn decode_record(line: &str) -> ChunkvaultResult<Document> {
    serde_json::from_str(line.trim())
        .map_err(|e| ChunkvaultError::Serialization(format!("invalid record: {e}")))
}
