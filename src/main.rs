use anyhow::{bail, Context, Result};
use protein_db::config::{AppConfig, ConfigManager, StoreMode};
use protein_db::data::{EmbeddingStore, SearchHit};
use protein_db::encoding::{CompositionEncoder, TimeoutEncoder};
use protein_db::engines::generation::{ConsoleProgressCallback, GenerationEngine};
use protein_db::types::{ProteinRecord, SequenceRecord, SimpleRecord};
use serde::Serialize;
use std::env;
use std::path::PathBuf;

const USAGE: &str = "\
Usage:
  protein-db [--config FILE] nearest  [records.jsonl] <v1,v2,...> [k]
  protein-db [--config FILE] within   [records.jsonl] <v1,v2,...> <threshold> <euclidean|cosine>
  protein-db [--config FILE] generate [records.jsonl] <v1,v2,...> [generations]

Without a record file the store comes from `store.path`, or starts empty.";

#[derive(Serialize)]
struct HitOutput<'a> {
    position: usize,
    score: f64,
    sequence: &'a str,
}

impl<'a, R: SequenceRecord> From<SearchHit<'a, R>> for HitOutput<'a> {
    fn from(hit: SearchHit<'a, R>) -> Self {
        Self {
            position: hit.position,
            score: hit.score,
            sequence: hit.record.sequence(),
        }
    }
}

#[derive(Serialize)]
struct GenerateOutput {
    sequences: Vec<String>,
    degraded: bool,
    generations_run: usize,
}

fn parse_vector(raw: &str) -> Result<Vec<f64>> {
    raw.split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid vector component '{}'", v))
        })
        .collect()
}

/// Split `[records.jsonl] <vector> rest...`. A first argument that parses as a
/// vector means the record file was left out.
fn split_store_args(args: &[String]) -> Result<(Option<PathBuf>, Vec<f64>, &[String])> {
    match args {
        [first, rest @ ..] if parse_vector(first).is_ok() => Ok((None, parse_vector(first)?, rest)),
        [path, vector, rest @ ..] => Ok((Some(PathBuf::from(path)), parse_vector(vector)?, rest)),
        _ => bail!("Missing arguments\n{}", USAGE),
    }
}

fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let manager = ConfigManager::new();
    match path {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => manager.load_from_env().context("Failed to read environment config")?,
    }
    Ok(manager.get()?)
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.logging.level_filter()?);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run<R: SequenceRecord>(config: &AppConfig, command: &str, args: &[String]) -> Result<()> {
    let (path, vector, args) = split_store_args(args)?;

    let mut store_config = config.store.clone();
    if path.is_some() {
        store_config.path = path;
    }
    let store: EmbeddingStore<R> = EmbeddingStore::from_config(&store_config)
        .with_context(|| format!("Failed to open store at {:?}", store_config.path))?;
    match &store_config.path {
        Some(path) => log::info!("Loaded {} records from {}", store.len(), path.display()),
        None => log::warn!("No record file given or configured; the store is empty"),
    }

    match command {
        "nearest" => {
            let k = match args.first() {
                Some(k) => k.parse().with_context(|| format!("Invalid k '{}'", k))?,
                None => config.store.default_k,
            };
            let hits: Vec<HitOutput> = store
                .nearest(&vector, k)?
                .into_iter()
                .map(HitOutput::from)
                .collect();
            print_json(&hits)
        }
        "within" => {
            let (threshold, metric) = match (args.first(), args.get(1)) {
                (Some(t), Some(m)) => (
                    t.parse::<f64>()
                        .with_context(|| format!("Invalid threshold '{}'", t))?,
                    m.as_str(),
                ),
                _ => bail!("within needs a threshold and a metric\n{}", USAGE),
            };
            let hits: Vec<HitOutput> = store
                .within_threshold(&vector, threshold, metric)?
                .into_iter()
                .map(HitOutput::from)
                .collect();
            print_json(&hits)
        }
        "generate" => {
            let mut generation = config.generation.clone();
            if let Some(g) = args.first() {
                generation.generations = g
                    .parse()
                    .with_context(|| format!("Invalid generation count '{}'", g))?;
            }

            let encoder =
                TimeoutEncoder::new(CompositionEncoder::default(), config.encoder.timeout());
            let mut engine = GenerationEngine::from_config(generation, encoder)?;
            let outcome = engine.run(&store, &vector, &mut ConsoleProgressCallback)?;
            if outcome.is_degraded() {
                log::warn!("Run stopped early; results may not meet the thresholds");
            }

            print_json(&GenerateOutput {
                sequences: outcome.sequences(),
                degraded: outcome.is_degraded(),
                generations_run: outcome.generations_run,
            })
        }
        other => bail!("Unknown command '{}'\n{}", other, USAGE),
    }
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            if i + 1 >= args.len() {
                bail!("--config needs a file\n{}", USAGE);
            }
            let path = args.remove(i + 1);
            args.remove(i);
            Some(path)
        }
        None => None,
    };

    let config = load_config(config_path.as_deref())?;
    init_logging(&config)?;

    let Some((command, rest)) = args.split_first() else {
        bail!("{}", USAGE);
    };

    match config.store.mode {
        StoreMode::Simple => run::<SimpleRecord>(&config, command, rest),
        StoreMode::Full => run::<ProteinRecord>(&config, command, rest),
    }
}
