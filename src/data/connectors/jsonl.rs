use crate::error::{ProteinDbError, Result};
use crate::types::SequenceRecord;
use super::types::RecordBackend;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Append-only JSON-lines file, one serialized record per line.
pub struct JsonLinesBackend<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: SequenceRecord> JsonLinesBackend<R> {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, records: &[R]) -> Result<()> {
        // Serialize the whole batch before touching the file
        let mut buffer = String::new();
        for record in records {
            buffer.push_str(&serde_json::to_string(record)?);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buffer.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl<R: SequenceRecord> RecordBackend<R> for JsonLinesBackend<R> {
    fn load_all(&self) -> Result<Vec<R>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = std::fs::File::open(&self.path)?;
        let mut records = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|e| {
                ProteinDbError::Persistence(format!(
                    "{}:{}: failed to parse record: {}",
                    self.path.display(),
                    line_no + 1,
                    e
                ))
            })?;
            records.push(record);
        }

        log::debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn insert_one(&mut self, record: &R) -> Result<()> {
        self.append(std::slice::from_ref(record))
    }

    fn insert_many(&mut self, records: &[R]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        self.append(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProteinMetadata, ProteinRecord, SimpleRecord};

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend: JsonLinesBackend<SimpleRecord> =
            JsonLinesBackend::new(dir.path().join("absent.jsonl"));
        assert!(backend.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proteins.jsonl");

        let mut backend = JsonLinesBackend::new(&path);
        let first = ProteinRecord::new(
            ProteinMetadata {
                accession: Some("P69905".to_string()),
                organism: Some("Homo sapiens".to_string()),
                ..Default::default()
            },
            "MVLSPADKTN",
            vec![0.5, 0.5],
        );
        let second = ProteinRecord::new(ProteinMetadata::default(), "MKV", vec![1.0, 0.0]);

        backend.insert_one(&first).unwrap();
        backend.insert_many(&[second.clone()]).unwrap();

        let reloaded = JsonLinesBackend::<ProteinRecord>::new(&path).load_all().unwrap();
        assert_eq!(reloaded, vec![first, second]);
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        std::fs::write(&path, "{\"sequence\":\"A\",\"embedding\":[1.0]}\nnot json\n").unwrap();

        let err = JsonLinesBackend::<SimpleRecord>::new(&path).load_all().unwrap_err();
        match err {
            ProteinDbError::Persistence(msg) => assert!(msg.contains(":2:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
