use crate::config::StoreConfig;
use crate::data::connectors::{JsonLinesBackend, RecordBackend, RecordValidator};
use crate::data::index::{FlatIndex, IndexCache};
use crate::engines::metrics::distance;
use crate::error::{ProteinDbError, Result};
use crate::types::{Metric, SequenceRecord};
use std::sync::{Arc, RwLock};

/// Store shared between threads that both insert and query
pub type SharedStore<R> = Arc<RwLock<EmbeddingStore<R>>>;

/// One record returned by a store query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a, R> {
    /// Insertion position of the record
    pub position: usize,
    /// L2 distance for euclidean queries, cosine similarity for cosine queries
    pub score: f64,
    pub record: &'a R,
}

/// Ordered record collection with exact nearest-neighbour and threshold queries.
///
/// The record type selects the store mode: `EmbeddingStore<SimpleRecord>` keeps
/// sequence and embedding only, `EmbeddingStore<ProteinRecord>` keeps metadata too.
/// The flat index is a cache over `records`, rebuilt on the first query after
/// any insertion.
pub struct EmbeddingStore<R: SequenceRecord> {
    records: Vec<R>,
    dimension: Option<usize>,
    index: IndexCache,
    backend: Option<Box<dyn RecordBackend<R>>>,
}

impl<R: SequenceRecord> Default for EmbeddingStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SequenceRecord> EmbeddingStore<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            dimension: None,
            index: IndexCache::new(),
            backend: None,
        }
    }

    /// Open a store over a persisted backend, loading every record it holds
    pub fn open<B>(backend: B) -> Result<Self>
    where
        B: RecordBackend<R> + 'static,
    {
        let records = backend.load_all()?;
        let dimension = RecordValidator::validate_batch(&records, None)?;
        log::info!(
            "Opened embedding store with {} records (dimension {:?})",
            records.len(),
            dimension
        );

        Ok(Self {
            records,
            dimension,
            index: IndexCache::new(),
            backend: Some(Box::new(backend)),
        })
    }

    /// Open the JSON-lines file at `config.path`, or start empty in memory
    /// when no path is configured
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        match &config.path {
            Some(path) => Self::open(JsonLinesBackend::new(path)),
            None => Ok(Self::new()),
        }
    }

    pub fn from_records(records: Vec<R>) -> Result<Self> {
        let mut store = Self::new();
        store.insert_many(records)?;
        Ok(store)
    }

    pub fn into_shared(self) -> SharedStore<R> {
        Arc::new(RwLock::new(self))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Embedding dimension, fixed by the first inserted record
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&R> {
        self.records.get(position)
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    pub fn insert(&mut self, record: R) -> Result<()> {
        let dimension = RecordValidator::validate_embedding(record.embedding(), self.dimension)?;

        if let Some(backend) = self.backend.as_mut() {
            backend.insert_one(&record)?;
        }

        self.records.push(record);
        self.dimension = Some(dimension);
        self.index.invalidate();
        Ok(())
    }

    /// Insert a batch atomically: every record is validated before any is
    /// stored, and the index is invalidated once.
    pub fn insert_many<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = R>,
    {
        let batch: Vec<R> = records.into_iter().collect();
        if batch.is_empty() {
            return Ok(0);
        }

        let dimension = RecordValidator::validate_batch(&batch, self.dimension)?;

        if let Some(backend) = self.backend.as_mut() {
            backend.insert_many(&batch)?;
        }

        let count = batch.len();
        self.records.extend(batch);
        self.dimension = dimension;
        self.index.invalidate();
        log::debug!("Inserted {} records, store size {}", count, self.records.len());
        Ok(count)
    }

    fn current_index(&self) -> Arc<FlatIndex> {
        let dim = self.dimension.unwrap_or(0);
        self.index.get_or_build(self.records.len(), || {
            FlatIndex::build(dim, self.records.iter().map(|r| r.embedding()))
        })
    }

    fn checked_dimension(&self, query: &[f64]) -> Result<usize> {
        let dim = match self.dimension {
            Some(dim) if !self.records.is_empty() => dim,
            _ => return Err(ProteinDbError::EmptyStore),
        };
        RecordValidator::validate_query(query, dim)?;
        Ok(dim)
    }

    /// The `k` records closest to `query` by Euclidean distance.
    ///
    /// Results are nearest first with ties in insertion order; at most
    /// `min(k, len)` are returned.
    pub fn nearest(&self, query: &[f64], k: usize) -> Result<Vec<SearchHit<'_, R>>> {
        self.checked_dimension(query)?;

        let index = self.current_index();
        Ok(index
            .search(query, k)
            .into_iter()
            .map(|(position, distance)| SearchHit {
                position,
                score: distance,
                record: &self.records[position],
            })
            .collect())
    }

    /// Sequence-only form of `nearest`
    pub fn nearest_sequences(&self, query: &[f64], k: usize) -> Result<Vec<&str>> {
        Ok(self
            .nearest(query, k)?
            .into_iter()
            .map(|hit| hit.record.sequence())
            .collect())
    }

    /// Every record satisfying the metric predicate, in insertion order.
    ///
    /// `metric` is `"euclidean"` (distance <= threshold) or `"cosine"`
    /// (similarity >= threshold).
    pub fn within_threshold(
        &self,
        query: &[f64],
        threshold: f64,
        metric: &str,
    ) -> Result<Vec<SearchHit<'_, R>>> {
        let metric: Metric = metric.parse()?;
        self.within(query, threshold, metric)
    }

    pub fn within(
        &self,
        query: &[f64],
        threshold: f64,
        metric: Metric,
    ) -> Result<Vec<SearchHit<'_, R>>> {
        self.checked_dimension(query)?;

        match metric {
            Metric::Euclidean => {
                let index = self.current_index();
                Ok((0..index.len())
                    .filter_map(|position| {
                        let row = index.row(position);
                        let score = distance::squared_euclidean_unchecked(row, query).sqrt();
                        (score <= threshold).then(|| SearchHit {
                            position,
                            score,
                            record: &self.records[position],
                        })
                    })
                    .collect())
            }
            Metric::Cosine => {
                let query_norm = distance::norm(query);
                if query_norm == 0.0 {
                    return Err(ProteinDbError::DegenerateVector);
                }

                let index = self.current_index();
                let mut hits = Vec::new();
                let mut skipped = 0;
                for position in 0..index.len() {
                    let row = index.row(position);
                    let row_norm = distance::norm(row);
                    if row_norm == 0.0 {
                        log::debug!("Skipping zero-norm record {} in cosine query", position);
                        skipped += 1;
                        continue;
                    }
                    let cosine = distance::dot(row, query) / (row_norm * query_norm);
                    let score = cosine.clamp(-1.0, 1.0);
                    if score >= threshold {
                        hits.push(SearchHit {
                            position,
                            score,
                            record: &self.records[position],
                        });
                    }
                }
                if skipped > 0 {
                    log::warn!(
                        "Cosine query skipped {} records with a zero-norm embedding",
                        skipped
                    );
                }
                Ok(hits)
            }
        }
    }
}
