use anyhow::Context;
use chunkvault_core::Document;
use serde::Deserialize;

/// One line of an ingestion file. Only `content` and `embedding` are
/// required.
#[derive(Debug, Deserialize)]
struct IngestRecord {
    id: Option<String>,
    content: String,
    embedding: Vec<f64>,
    #[serde(default)]
    chunk_number: u32,
    source_name: Option<String>,
    source_type: Option<String>,
}

/// Parse a JSON Lines ingestion file into documents, in file order.
///
/// Missing ids get a fresh UUID; missing provenance defaults to
/// `source_name` and `"file"`.
pub fn parse_documents(text: &str, source_name: &str) -> anyhow::Result<Vec<Document>> {
    let mut documents = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: IngestRecord = serde_json::from_str(line)
            .with_context(|| format!("Invalid document on line {}", i + 1))?;
        let id = record
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        documents.push(
            Document::new(record.content)
                .with_id(id)
                .with_embedding(record.embedding)
                .with_chunk_number(record.chunk_number)
                .with_source(
                    record.source_name.unwrap_or_else(|| source_name.to_string()),
                    record.source_type.unwrap_or_else(|| "file".to_string()),
                ),
        );
    }
    Ok(documents)
}

/// Parse a comma-separated embedding such as `1,2.5,-3`.
pub fn parse_embedding(s: &str) -> Result<Vec<f64>, String> {
    s.split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid component '{}': {e}", part.trim()))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_documents_fills_defaults() {
        let text = r#"{"id":"1","content":"Hello!","embedding":[1,2,3],"chunk_number":1,"source_name":"test","source_type":"string"}

{"content":"no id","embedding":[0.5]}
"#;
        let docs = parse_documents(text, "notes.jsonl").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "1");
        assert_eq!(docs[0].embedding, vec![1.0, 2.0, 3.0]);
        assert_eq!(docs[0].source_type, "string");

        assert!(uuid::Uuid::parse_str(&docs[1].id).is_ok());
        assert_eq!(docs[1].source_name, "notes.jsonl");
        assert_eq!(docs[1].source_type, "file");
        assert_eq!(docs[1].chunk_number, 0);
    }

    #[test]
    fn test_parse_documents_reports_line() {
        let text = "{\"content\":\"a\",\"embedding\":[1]}\n{\"content\":\"b\"}\n";
        let err = parse_documents(text, "x").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_parse_embedding() {
        assert_eq!(parse_embedding("1, 2.5,-3").unwrap(), vec![1.0, 2.5, -3.0]);
        assert!(parse_embedding("1,,2").is_err());
        assert!(parse_embedding("one").is_err());
    }
}
