use crate::config::GenerationConfig;
use crate::config::traits::ConfigSection;
use crate::data::EmbeddingStore;
use crate::encoding::Encoder;
use crate::engines::evaluation::{rank, Fitness, FitnessEvaluator, ScoredCandidate};
use crate::engines::generation::operators::{mutate, recombine};
use crate::engines::generation::progress::SilentProgressCallback;
use crate::error::{ProteinDbError, Result};
use crate::types::{Alphabet, SequenceRecord};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationPhase {
    Seeding,
    /// 1-based generation number
    Evolving { generation: usize },
    Finalizing,
    Done,
}

pub trait ProgressCallback: Send {
    fn on_phase_change(&mut self, phase: GenerationPhase);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
}

/// Per-generation statistics handed to progress callbacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: usize,
    /// Best member of the population that entered this generation
    pub best: Option<Fitness>,
    pub elites: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub population: usize,
}

/// Details of a generation that hit the retry cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub generation: usize,
    pub filled: usize,
    pub target: usize,
    pub attempts: usize,
}

impl ConvergenceReport {
    pub fn to_error(&self) -> ProteinDbError {
        ProteinDbError::ConvergenceFailure {
            generation: self.generation,
            filled: self.filled,
            target: self.target,
            attempts: self.attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenerationStatus {
    Converged,
    /// Evolution stopped early; the ranking covers the best candidates found
    Degraded(ConvergenceReport),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Best first, at most `result_count` entries
    pub ranked: Vec<ScoredCandidate>,
    pub status: GenerationStatus,
    pub generations_run: usize,
    /// Members left out of rankings over the whole run for a zero-norm embedding
    pub dropped: usize,
}

impl GenerationOutcome {
    pub fn sequences(&self) -> Vec<String> {
        self.ranked.iter().map(|c| c.sequence.clone()).collect()
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.status, GenerationStatus::Degraded(_))
    }
}

/// Produces offspring from the current population
struct Breeder<'a, R: Rng> {
    rng: &'a mut R,
    alphabet: &'a Alphabet,
    recombination_rate: f64,
}

impl<R: Rng> Breeder<'_, R> {
    /// Grow `population` to `size` with mutants of random members
    fn pad(&mut self, population: &mut Vec<String>, size: usize) {
        while population.len() < size {
            let parent = &population[self.rng.gen_range(0..population.len())];
            let child = mutate(parent, self.alphabet, &mut *self.rng);
            population.push(child);
        }
    }

    fn offspring(&mut self, population: &[String]) -> String {
        if population.len() >= 2 && self.rng.gen::<f64>() < self.recombination_rate {
            let picks = index::sample(&mut *self.rng, population.len(), 2);
            let (a, b) = (&population[picks.index(0)], &population[picks.index(1)]);
            match recombine(a, b, &mut *self.rng) {
                Some(child) => child,
                None => mutate(a, self.alphabet, &mut *self.rng),
            }
        } else {
            let parent = &population[self.rng.gen_range(0..population.len())];
            mutate(parent, self.alphabet, &mut *self.rng)
        }
    }
}

/// Generate-and-select search for sequences whose embeddings approach a target.
///
/// The engine keeps no state between runs apart from its random source, so a
/// seeded engine replays the same run for the same store and target.
pub struct GenerationEngine<E, R = StdRng> {
    config: GenerationConfig,
    encoder: E,
    alphabet: Alphabet,
    rng: R,
}

impl<E: Encoder> GenerationEngine<E, StdRng> {
    /// Seeded from `config.seed`, or from OS entropy when unset
    pub fn from_config(config: GenerationConfig, encoder: E) -> Result<Self> {
        let seed = config.seed;
        Self::from_seed(config, encoder, seed)
    }

    pub fn from_seed(config: GenerationConfig, encoder: E, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(config, encoder, rng)
    }
}

impl<E: Encoder, R: Rng> GenerationEngine<E, R> {
    pub fn new(config: GenerationConfig, encoder: E, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            encoder,
            alphabet: Alphabet::amino_acids(),
            rng,
        })
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Seed from `store`, evolve, and rank the final population.
    ///
    /// The store is only read. An empty store, a target that disagrees with the
    /// store or encoder dimension, and encoder failures abort the run.
    pub fn run<S, C>(
        &mut self,
        store: &EmbeddingStore<S>,
        target: &[f64],
        callback: &mut C,
    ) -> Result<GenerationOutcome>
    where
        S: SequenceRecord,
        C: ProgressCallback,
    {
        let config = &self.config;
        callback.on_phase_change(GenerationPhase::Seeding);

        let evaluator = FitnessEvaluator::new(&self.encoder, target.to_vec())?;
        let seeds = store.nearest_sequences(target, config.seed_count)?;

        let mut breeder = Breeder {
            rng: &mut self.rng,
            alphabet: &self.alphabet,
            recombination_rate: config.recombination_rate,
        };

        let mut population: Vec<String> = seeds.into_iter().map(str::to_string).collect();
        let seeded = population.len();
        breeder.pad(&mut population, config.population_size);
        log::info!(
            "Seeded population with {} stored sequences, padded to {}",
            seeded,
            population.len()
        );

        let mut status = GenerationStatus::Converged;
        let mut generations_run = 0;
        let mut dropped = 0;

        for generation in 1..=config.generations {
            callback.on_phase_change(GenerationPhase::Evolving { generation });

            let (ranked, unranked) =
                score_and_rank(&evaluator, &population, config.parallel_scoring)?;
            dropped += unranked;
            let mut next: Vec<String> = ranked
                .iter()
                .take(config.elite_count)
                .map(|c| c.sequence.clone())
                .collect();
            let elites = next.len();

            let mut accepted = 0;
            let mut rejected = 0;
            let mut consecutive = 0;
            let mut exhausted = None;

            while next.len() < config.population_size {
                let child = breeder.offspring(&population);
                match evaluator.score(&child) {
                    Ok(fitness)
                        if fitness.accepts(config.cos_threshold, config.rmse_threshold) =>
                    {
                        next.push(child);
                        accepted += 1;
                        consecutive = 0;
                    }
                    Ok(_) | Err(ProteinDbError::DegenerateVector) => {
                        rejected += 1;
                        consecutive += 1;
                    }
                    Err(e) => return Err(e),
                }

                if consecutive >= config.max_attempts_per_slot {
                    exhausted = Some(ConvergenceReport {
                        generation,
                        filled: next.len(),
                        target: config.population_size,
                        attempts: consecutive,
                    });
                    break;
                }
            }

            let summary = GenerationSummary {
                generation,
                best: ranked.first().map(|c| c.fitness),
                elites,
                accepted,
                rejected,
                population: next.len(),
            };
            log::debug!(
                "Generation {}: best {:?}, accepted {}, rejected {}",
                generation,
                summary.best,
                accepted,
                rejected
            );
            callback.on_generation_complete(&summary);

            population = next;
            generations_run = generation;

            if let Some(report) = exhausted {
                if config.strict_convergence {
                    return Err(report.to_error());
                }
                log::warn!("{}; returning best candidates found so far", report.to_error());
                status = GenerationStatus::Degraded(report);
                break;
            }
        }

        callback.on_phase_change(GenerationPhase::Finalizing);
        let (mut ranked, unranked) =
            score_and_rank(&evaluator, &population, config.parallel_scoring)?;
        dropped += unranked;
        ranked.truncate(config.result_count);
        if ranked.len() < config.result_count {
            log::warn!(
                "Only {} of {} requested results ({} members dropped for a zero-norm embedding)",
                ranked.len(),
                config.result_count,
                dropped
            );
        }

        callback.on_phase_change(GenerationPhase::Done);
        if let Some(best) = ranked.first() {
            log::info!(
                "Generation finished after {} generations: best cosine {:.4}, rmse {:.4}",
                generations_run,
                best.fitness.cosine,
                best.fitness.rmse
            );
        }

        Ok(GenerationOutcome {
            ranked,
            status,
            generations_run,
            dropped,
        })
    }
}

/// Score every member and sort best first. Members with a zero-norm embedding
/// cannot be ranked; they are left out and counted.
fn score_and_rank<E: Encoder>(
    evaluator: &FitnessEvaluator<E>,
    population: &[String],
    parallel: bool,
) -> Result<(Vec<ScoredCandidate>, usize)> {
    let scores = evaluator.score_all(population, parallel);
    let mut ranked = Vec::with_capacity(population.len());
    let mut dropped = 0;

    for (sequence, score) in population.iter().zip(scores) {
        match score {
            Ok(fitness) => ranked.push(ScoredCandidate {
                sequence: sequence.clone(),
                fitness,
            }),
            Err(ProteinDbError::DegenerateVector) => {
                log::debug!("Dropping '{}' from ranking: zero-norm embedding", sequence);
                dropped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    rank(&mut ranked);
    Ok((ranked, dropped))
}

/// Evolve sequences toward `target` with the default parameters and return up
/// to five of them, best first.
///
/// A run that hits the retry cap still returns its best candidates; the
/// condition is logged as a warning. Use `GenerationEngine` directly to inspect
/// the status or to supply a seeded random source.
pub fn generate<S, E>(
    store: &EmbeddingStore<S>,
    encoder: E,
    target: &[f64],
    cos_threshold: f64,
    rmse_threshold: f64,
    generations: usize,
) -> Result<Vec<String>>
where
    S: SequenceRecord,
    E: Encoder,
{
    let config = GenerationConfig {
        cos_threshold,
        rmse_threshold,
        generations,
        ..Default::default()
    };
    let mut engine = GenerationEngine::from_config(config, encoder)?;
    let outcome = engine.run(store, target, &mut SilentProgressCallback)?;
    Ok(outcome.sequences())
}
