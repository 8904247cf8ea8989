use crate::error::Result;
use crate::types::SequenceRecord;

/// Durable backing store for an embedding store's records.
///
/// The store calls `insert_one`/`insert_many` before it appends in memory, so a
/// failed write leaves both sides unchanged.
pub trait RecordBackend<R: SequenceRecord>: Send + Sync {
    fn load_all(&self) -> Result<Vec<R>>;
    fn insert_one(&mut self, record: &R) -> Result<()>;
    fn insert_many(&mut self, records: &[R]) -> Result<()>;
}

/// Backend holding records in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend<R> {
    records: Vec<R>,
}

impl<R: SequenceRecord> MemoryBackend<R> {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }
}

impl<R: SequenceRecord> RecordBackend<R> for MemoryBackend<R> {
    fn load_all(&self) -> Result<Vec<R>> {
        Ok(self.records.clone())
    }

    fn insert_one(&mut self, record: &R) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn insert_many(&mut self, records: &[R]) -> Result<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }
}
