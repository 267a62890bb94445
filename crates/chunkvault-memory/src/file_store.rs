use crate::codec::{decode_record, encode_record};
use crate::config::StoreConfig;
use crate::store::{Ranker, SearchReport, VectorStore};
use async_trait::async_trait;
use chunkvault_core::{ChunkvaultError, ChunkvaultResult, Document};
use std::collections::BTreeSet;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader};
use tracing::debug;

/// Summary of the backing file produced by [`FileVectorStore::stats`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Records that decoded successfully.
    pub records: usize,
    /// Non-blank lines that failed to decode.
    pub corrupt: usize,
    /// Distinct embedding lengths among the decoded records.
    pub dimensions: BTreeSet<usize>,
}

/// File-backed vector store that persists documents as JSONL on disk.
///
/// Nothing is cached between calls: every search re-reads the whole file, so
/// a search always observes every document appended before it started. The
/// file is opened per call and closed before the call returns.
///
/// There is no locking. Concurrent writers from several processes may
/// interleave records.
pub struct FileVectorStore {
    config: StoreConfig,
    path: PathBuf,
}

impl FileVectorStore {
    /// Create a store over `config.directory`. Performs no I/O; the backing
    /// file is created by the first non-empty [`add_documents`] call.
    ///
    /// [`add_documents`]: VectorStore::add_documents
    pub fn new(config: StoreConfig) -> ChunkvaultResult<Self> {
        config.validate()?;
        let path = config.store_path();
        Ok(Self { config, path })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Count valid and corrupt records in one pass over the file.
    pub async fn stats(&self) -> ChunkvaultResult<StoreStats> {
        let mut stats = StoreStats::default();
        self.for_each_record(|_, record| match record {
            Ok(document) => {
                stats.records += 1;
                stats.dimensions.insert(document.dimension());
            }
            Err(_) => stats.corrupt += 1,
        })
        .await?;
        Ok(stats)
    }

    /// Feeds every non-blank line to `visit` with its 1-based line number.
    /// Returns `false` when the backing file does not exist.
    async fn for_each_record<F>(&self, mut visit: F) -> ChunkvaultResult<bool>
    where
        F: FnMut(usize, ChunkvaultResult<Document>) + Send,
    {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            line_no += 1;
            let record = match std::str::from_utf8(&buf) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => decode_record(text),
                Err(e) => Err(ChunkvaultError::Serialization(format!(
                    "record is not valid UTF-8: {e}"
                ))),
            };
            visit(line_no, record);
        }
        Ok(true)
    }
}

#[async_trait]
impl VectorStore for FileVectorStore {
    async fn add_documents(&self, documents: &[Document]) -> ChunkvaultResult<()> {
        if documents.is_empty() {
            return Ok(());
        }
        // Encode up front so a bad document leaves the file untouched.
        let lines = documents
            .iter()
            .map(encode_record)
            .collect::<ChunkvaultResult<Vec<_>>>()?;

        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        // A torn final line must not swallow the first new record.
        if file.metadata().await?.len() > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).await?;
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                file.write_all(b"\n").await?;
            }
        }
        for mut line in lines {
            line.push('\n');
            file.write_all(line.as_bytes()).await?;
            file.flush().await?;
        }

        debug!(
            path = %self.path.display(),
            count = documents.len(),
            "Appended documents"
        );
        Ok(())
    }

    async fn search(&self, query_embedding: &[f64]) -> ChunkvaultResult<SearchReport> {
        let mut ranker = Ranker::new(query_embedding, self.config.top_k)?;
        let present = self
            .for_each_record(|line_no, record| match record {
                Ok(document) => ranker.offer(line_no, document),
                Err(e) => ranker.skip(line_no, e.to_string()),
            })
            .await?;

        let report = ranker.finish();
        debug!(
            path = %self.path.display(),
            present,
            hits = report.hits.len(),
            skipped = report.skipped.len(),
            "Similarity search complete"
        );
        Ok(report)
    }

    fn top_k(&self) -> usize {
        self.config.top_k
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn make_doc(id: &str, embedding: Vec<f64>) -> Document {
        Document::new(format!("content {id}"))
            .with_id(id)
            .with_embedding(embedding)
    }

    fn temp_store(top_k: usize) -> (FileVectorStore, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileVectorStore::new(StoreConfig::new(tmp.path()).with_top_k(top_k)).unwrap();
        (store, tmp)
    }

    #[tokio::test]
    async fn test_new_does_not_create_file() {
        let (store, _tmp) = temp_store(4);
        assert!(!store.path().exists());
        assert!(store.path().ends_with("chunkvault.store"));
    }

    #[tokio::test]
    async fn test_empty_batch_leaves_store_absent() {
        let (store, _tmp) = temp_store(4);
        store.add_documents(&[]).await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_one_line_per_document() {
        let (store, _tmp) = temp_store(4);
        store
            .add_documents(&[
                make_doc("a", vec![1.0, 0.0]),
                Document::new("multi\nline").with_id("b").with_embedding(vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let raw = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_unencodable_batch_writes_nothing() {
        let (store, _tmp) = temp_store(4);
        let result = store
            .add_documents(&[
                make_doc("ok", vec![1.0]),
                make_doc("bad", vec![f64::NAN]),
            ])
            .await;
        assert!(matches!(result, Err(ChunkvaultError::Serialization(_))));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_missing_directory_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileVectorStore::new(StoreConfig::new(tmp.path().join("nope"))).unwrap();
        let result = store.add_documents(&[make_doc("a", vec![1.0])]).await;
        assert!(matches!(result, Err(ChunkvaultError::Io(_))));
    }

    #[tokio::test]
    async fn test_stats_counts_records() {
        let (store, _tmp) = temp_store(4);
        assert_eq!(store.stats().await.unwrap(), StoreStats::default());

        store
            .add_documents(&[make_doc("a", vec![1.0, 0.0]), make_doc("b", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap();
        let mut raw = tokio::fs::OpenOptions::new()
            .append(true)
            .open(store.path())
            .await
            .unwrap();
        raw.write_all(b"{\"id\":\"broken\n\n").await.unwrap();
        raw.flush().await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.records, 2);
        assert_eq!(stats.corrupt, 1);
        assert_eq!(stats.dimensions, BTreeSet::from([2, 3]));
    }

    #[tokio::test]
    async fn test_append_after_torn_line_starts_new_line() {
        let (store, _tmp) = temp_store(4);
        store
            .add_documents(&[make_doc("a", vec![1.0, 0.0])])
            .await
            .unwrap();
        let mut raw = tokio::fs::OpenOptions::new()
            .append(true)
            .open(store.path())
            .await
            .unwrap();
        raw.write_all(b"{\"id\":\"torn\"").await.unwrap();
        raw.flush().await.unwrap();

        store
            .add_documents(&[make_doc("b", vec![0.0, 1.0])])
            .await
            .unwrap();

        let text = tokio::fs::read_to_string(store.path()).await.unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "{\"id\":\"torn\"");
        assert_eq!(decode_record(lines[2]).unwrap().id, "b");
    }

    #[tokio::test]
    async fn test_append_after_complete_line_adds_no_blank_line() {
        let (store, _tmp) = temp_store(4);
        store
            .add_documents(&[make_doc("a", vec![1.0, 0.0])])
            .await
            .unwrap();
        store
            .add_documents(&[make_doc("b", vec![0.0, 1.0])])
            .await
            .unwrap();

        let text = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(text.matches('\n').count(), 2);
        assert!(!text.contains("\n\n"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_skipped() {
        let (store, _tmp) = temp_store(4);
        store
            .add_documents(&[make_doc("a", vec![1.0, 0.0])])
            .await
            .unwrap();
        let mut raw = tokio::fs::OpenOptions::new()
            .append(true)
            .open(store.path())
            .await
            .unwrap();
        raw.write_all(&[0xff, 0xfe, b'\n']).await.unwrap();
        raw.flush().await.unwrap();

        let report = store.search(&[1.0, 0.0]).await.unwrap();
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].position, 2);
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let result = FileVectorStore::new(StoreConfig::new(".").with_top_k(0));
        assert!(matches!(result, Err(ChunkvaultError::Config(_))));
    }
}
