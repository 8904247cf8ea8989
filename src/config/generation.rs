use super::traits::{invalid, ConfigSection};
use crate::error::ProteinDbError;
use serde::{Deserialize, Serialize};

/// Parameters of one generate-and-select run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Nearest stored sequences used as the initial population
    pub seed_count: usize,
    pub population_size: usize,
    /// Top-ranked members carried unchanged into the next generation
    pub elite_count: usize,
    /// Probability of recombining two members instead of mutating one
    pub recombination_rate: f64,
    pub generations: usize,
    /// Sequences returned after the final ranking
    pub result_count: usize,
    /// Offspring accepted only if `1 - cosine <= cos_threshold`
    pub cos_threshold: f64,
    /// Offspring accepted only if `rmse <= rmse_threshold`
    pub rmse_threshold: f64,
    /// Consecutive rejected offspring tolerated while filling one slot
    pub max_attempts_per_slot: usize,
    /// Fail the run instead of degrading when the retry cap is hit
    pub strict_convergence: bool,
    pub parallel_scoring: bool,
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed_count: 100,
            population_size: 200,
            elite_count: 50,
            recombination_rate: 0.25,
            generations: 10,
            result_count: 5,
            cos_threshold: 0.1,
            rmse_threshold: 0.1,
            max_attempts_per_slot: 1000,
            strict_convergence: false,
            parallel_scoring: true,
            seed: None,
        }
    }
}

impl ConfigSection for GenerationConfig {
    fn section_name() -> &'static str {
        "generation"
    }

    fn validate(&self) -> Result<(), ProteinDbError> {
        let section = Self::section_name();
        if self.population_size < 2 {
            return Err(invalid(section, "population_size must be at least 2"));
        }
        if self.seed_count == 0 {
            return Err(invalid(section, "seed_count must be at least 1"));
        }
        if self.elite_count > self.population_size {
            return Err(invalid(
                section,
                format!(
                    "elite_count ({}) cannot exceed population_size ({})",
                    self.elite_count, self.population_size
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.recombination_rate) {
            return Err(invalid(section, "recombination_rate must be between 0 and 1"));
        }
        if self.result_count == 0 {
            return Err(invalid(section, "result_count must be at least 1"));
        }
        if !self.cos_threshold.is_finite() || self.cos_threshold < 0.0 {
            return Err(invalid(section, "cos_threshold must be a non-negative number"));
        }
        if !self.rmse_threshold.is_finite() || self.rmse_threshold < 0.0 {
            return Err(invalid(section, "rmse_threshold must be a non-negative number"));
        }
        if self.max_attempts_per_slot == 0 {
            return Err(invalid(section, "max_attempts_per_slot must be at least 1"));
        }
        Ok(())
    }
}
