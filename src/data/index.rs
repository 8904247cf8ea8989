use crate::engines::metrics::distance::squared_euclidean_unchecked;
use crate::types::Embedding;
use std::sync::{Arc, PoisonError, RwLock};

/// Row-major copy of every stored embedding, scanned exhaustively on search.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dim: usize,
    rows: usize,
    data: Vec<f64>,
}

impl FlatIndex {
    pub fn build<'a, I>(dim: usize, embeddings: I) -> Self
    where
        I: IntoIterator<Item = &'a Embedding>,
    {
        let mut data = Vec::new();
        let mut rows = 0;
        for embedding in embeddings {
            debug_assert_eq!(embedding.dim(), dim);
            data.extend_from_slice(embedding.as_slice());
            rows += 1;
        }
        Self { dim, rows, data }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, position: usize) -> &[f64] {
        &self.data[position * self.dim..(position + 1) * self.dim]
    }

    /// Exact k-nearest rows by L2 distance as `(position, distance)`,
    /// nearest first, equal distances in row order.
    pub fn search(&self, query: &[f64], k: usize) -> Vec<(usize, f64)> {
        debug_assert_eq!(query.len(), self.dim);
        if self.dim == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f64)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(i, row)| (i, squared_euclidean_unchecked(row, query)))
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        for entry in scored.iter_mut() {
            entry.1 = entry.1.sqrt();
        }
        scored
    }
}

/// Lazily rebuilt index slot shared by concurrent readers.
///
/// The slot only ever holds an index built from the record list it was asked
/// for; `get_or_build` rebuilds whenever the row count disagrees.
#[derive(Debug, Default)]
pub struct IndexCache {
    slot: RwLock<Option<Arc<FlatIndex>>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        *self.slot.get_mut().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_built(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn get_or_build<F>(&self, expected_rows: usize, build: F) -> Arc<FlatIndex>
    where
        F: FnOnce() -> FlatIndex,
    {
        {
            let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(index) = slot.as_ref() {
                if index.len() == expected_rows {
                    return Arc::clone(index);
                }
            }
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // Another reader may have rebuilt while we waited for the write lock
        if let Some(index) = slot.as_ref() {
            if index.len() == expected_rows {
                return Arc::clone(index);
            }
        }

        let index = Arc::new(build());
        log::debug!(
            "Rebuilt flat index: {} rows x {} dims",
            index.len(),
            index.dim()
        );
        *slot = Some(Arc::clone(&index));
        index
    }
}
