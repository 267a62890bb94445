use crate::config::DEFAULT_TOP_K;
use crate::similarity::{cosine_similarity, validate_embedding};
use async_trait::async_trait;
use chunkvault_core::{ChunkvaultError, ChunkvaultResult, Document};
use std::cmp::Ordering;
use tokio::sync::RwLock;

/// A document returned by a search, with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The stored document.
    pub document: Document,
    /// Cosine similarity to the query, in `[-1, 1]`.
    pub score: f64,
}

/// A stored record left out of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based position of the record in insertion order (the line number
    /// for file-backed stores).
    pub position: usize,
    /// Why the record was skipped.
    pub reason: String,
}

/// Outcome of a search: ranked hits plus the records that could not be
/// scored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchReport {
    /// Hits ordered by descending score, ties in insertion order.
    pub hits: Vec<SearchHit>,
    /// Records excluded from ranking.
    pub skipped: Vec<SkippedRecord>,
}

impl SearchReport {
    /// Drops scores and diagnostics, keeping the ranked documents.
    pub fn into_documents(self) -> Vec<Document> {
        self.hits.into_iter().map(|hit| hit.document).collect()
    }
}

/// Trait for vector storage backends.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Append documents in the given order.
    async fn add_documents(&self, documents: &[Document]) -> ChunkvaultResult<()>;

    /// Rank every stored document against `query_embedding` and return at
    /// most [`top_k`](VectorStore::top_k) hits.
    ///
    /// Records that cannot be scored are skipped and listed in the report.
    /// A degenerate query fails the whole call.
    async fn search(&self, query_embedding: &[f64]) -> ChunkvaultResult<SearchReport>;

    /// Like [`search`](VectorStore::search) but returns only the documents.
    async fn similarity_search(&self, query_embedding: &[f64]) -> ChunkvaultResult<Vec<Document>> {
        Ok(self.search(query_embedding).await?.into_documents())
    }

    /// Maximum number of documents a search returns.
    fn top_k(&self) -> usize;
}

struct Scored {
    score: f64,
    position: usize,
    document: Document,
}

/// Best first: higher score, then earlier position. Scores are always
/// finite, so `partial_cmp` never falls back.
fn rank_order(a: &Scored, b: &Scored) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.position.cmp(&b.position))
}

/// Collects scored documents and keeps only the best `top_k`.
///
/// Candidates are pruned back to `top_k` whenever twice that many have
/// accumulated, so memory stays proportional to `top_k` during a scan.
pub(crate) struct Ranker<'q> {
    query: &'q [f64],
    top_k: usize,
    scored: Vec<Scored>,
    skipped: Vec<SkippedRecord>,
}

impl<'q> Ranker<'q> {
    /// Fails if the query itself cannot be compared against anything.
    pub(crate) fn new(query: &'q [f64], top_k: usize) -> ChunkvaultResult<Self> {
        validate_embedding(query)?;
        Ok(Self {
            query,
            top_k,
            scored: Vec::new(),
            skipped: Vec::new(),
        })
    }

    pub(crate) fn offer(&mut self, position: usize, document: Document) {
        match cosine_similarity(self.query, &document.embedding) {
            Ok(score) => {
                self.scored.push(Scored {
                    score,
                    position,
                    document,
                });
                if self.scored.len() >= self.top_k.saturating_mul(2).max(2) {
                    self.prune();
                }
            }
            Err(e) => {
                let reason = match e {
                    ChunkvaultError::DimensionMismatch { expected, actual } => format!(
                        "document '{}' has {actual} dimensions, query has {expected}",
                        document.id
                    ),
                    other => format!("document '{}': {other}", document.id),
                };
                self.skip(position, reason);
            }
        }
    }

    pub(crate) fn skip(&mut self, position: usize, reason: String) {
        tracing::warn!(position, reason = %reason, "Skipping stored record");
        self.skipped.push(SkippedRecord { position, reason });
    }

    fn prune(&mut self) {
        self.scored.sort_by(rank_order);
        self.scored.truncate(self.top_k);
    }

    pub(crate) fn finish(mut self) -> SearchReport {
        self.prune();
        SearchReport {
            hits: self
                .scored
                .into_iter()
                .map(|s| SearchHit {
                    document: s.document,
                    score: s.score,
                })
                .collect(),
            skipped: self.skipped,
        }
    }
}

/// In-memory vector store using brute-force cosine similarity.
/// Nothing is persisted; suitable for tests and short-lived indexes.
pub struct InMemoryVectorStore {
    documents: RwLock<Vec<Document>>,
    top_k: usize,
}

impl InMemoryVectorStore {
    /// Create an empty store returning at most `top_k` results per search.
    pub fn new(top_k: usize) -> ChunkvaultResult<Self> {
        if top_k == 0 {
            return Err(ChunkvaultError::Config(
                "top_k must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            documents: RwLock::new(Vec::new()),
            top_k,
        })
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add_documents(&self, documents: &[Document]) -> ChunkvaultResult<()> {
        let mut stored = self.documents.write().await;
        stored.extend_from_slice(documents);
        Ok(())
    }

    async fn search(&self, query_embedding: &[f64]) -> ChunkvaultResult<SearchReport> {
        let mut ranker = Ranker::new(query_embedding, self.top_k)?;
        let stored = self.documents.read().await;
        for (i, document) in stored.iter().enumerate() {
            ranker.offer(i + 1, document.clone());
        }
        Ok(ranker.finish())
    }

    fn top_k(&self) -> usize {
        self.top_k
    }
}
