use protein_db::data::EmbeddingStore;
use protein_db::encoding::{CompositionEncoder, Encoder, TimeoutEncoder};
use protein_db::engines::query::ProteinQuery;
use protein_db::error::{ProteinDbError, Result};
use protein_db::types::{Embedding, ProteinMetadata, ProteinRecord, SequenceRecord, SimpleRecord};
use std::time::Duration;

/// Looks sequences up in a fixed table
struct TableEncoder;

impl Encoder for TableEncoder {
    fn dimension(&self) -> usize {
        3
    }

    fn encode(&self, sequence: &str) -> Result<Embedding> {
        let values = match sequence {
            "MKV" => vec![1.0, 0.0, 0.0],
            "GGA" => vec![0.0, 1.0, 0.0],
            other => {
                return Err(ProteinDbError::EncoderFailure(format!(
                    "no embedding for '{}'",
                    other
                )))
            }
        };
        Ok(Embedding::new(values))
    }
}

fn protein(accession: &str, organism: &str, description: &str, sequence: &str) -> ProteinRecord {
    let embedding = CompositionEncoder::default().encode(sequence).unwrap();
    ProteinRecord::new(
        ProteinMetadata {
            accession: Some(accession.to_string()),
            description: Some(description.to_string()),
            locus: Some(format!("{}_LOCUS", accession)),
            organism: Some(organism.to_string()),
        },
        sequence,
        embedding,
    )
}

#[test]
fn test_encoded_sequence_scenario() {
    let encoder = TableEncoder;
    let store = EmbeddingStore::from_records(vec![SimpleRecord::new(
        "MKV",
        encoder.encode("MKV").unwrap(),
    )])
    .unwrap();
    let query = ProteinQuery::new(&store, &encoder);

    let hits = query.similar_sequence("MKV", 1).unwrap();
    assert_eq!(hits[0].record.sequence(), "MKV");
    assert_eq!(hits[0].score, 0.0);

    assert_eq!(query.by_embedding("GGA", 1.5, "euclidean").unwrap().len(), 1);
    assert!(query.by_embedding("GGA", 1.0, "euclidean").unwrap().is_empty());
    assert_eq!(query.by_embedding("MKV", 0.99, "cosine").unwrap().len(), 1);
}

#[test]
fn test_encoder_failure_surfaces() {
    let store =
        EmbeddingStore::from_records(vec![SimpleRecord::new("MKV", vec![1.0, 0.0, 0.0])]).unwrap();
    let query = ProteinQuery::new(&store, TableEncoder);
    assert!(matches!(
        query.similar_sequence("WWW", 1),
        Err(ProteinDbError::EncoderFailure(_))
    ));
}

#[test]
fn test_metadata_and_similarity_over_full_records() {
    let store = EmbeddingStore::from_records(vec![
        protein("P69905", "Homo sapiens", "Hemoglobin subunit alpha", "MVLSPADKTNVKAAWGKVGA"),
        protein("P01942", "Mus musculus", "Hemoglobin subunit alpha", "MVLSGEDKSNIKAAWGKIGG"),
        protein("P02144", "Homo sapiens", "Myoglobin", "MGLSDGEWQLVLNVWGKVEA"),
    ])
    .unwrap();

    let encoder = TimeoutEncoder::new(CompositionEncoder::default(), Duration::from_secs(5));
    let query = ProteinQuery::new(&store, encoder);

    let human: Vec<&str> = query
        .by_organism("sapiens")
        .iter()
        .filter_map(|r| r.accession())
        .collect();
    assert_eq!(human, vec!["P69905", "P02144"]);

    assert_eq!(query.description_contains("subunit").len(), 2);
    assert_eq!(query.by_accession("P01942")[0].locus(), Some("P01942_LOCUS"));

    let hits = query.similar_sequence("MGLSDGEWQLVLNVWGKVEA", 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].record.description(), Some("Myoglobin"));
}
