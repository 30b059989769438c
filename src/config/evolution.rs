use super::traits::ConfigSection;
use crate::error::{GpError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    /// Evaluation workers per generation.
    pub threads: usize,
    /// Fixed RNG seed, drawn from entropy when unset.
    pub seed: Option<u64>,
    pub max_generations: usize,
    pub target_fitness: f64,
    pub tournament_size: usize,
    pub crossover_prob: f64,
    pub mutation_prob: f64,
    pub init_method: InitMethod,
    pub init_min_depth: usize,
    pub init_max_depth: usize,
    /// Height range of subtrees grown by uniform mutation.
    pub mutation_min_depth: usize,
    pub mutation_max_depth: usize,
    /// Reject variations producing deeper trees.
    pub depth_limit: Option<usize>,
    /// Reject variations producing larger trees.
    pub size_limit: Option<usize>,
    /// Log every individual after each evaluation.
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitMethod {
    Full,
    Grow,
    Ramped,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seed: None,
            max_generations: 40,
            target_fitness: 0.9999,
            tournament_size: 7,
            crossover_prob: 0.5,
            mutation_prob: 0.2,
            init_method: InitMethod::Ramped,
            init_min_depth: 1,
            init_max_depth: 3,
            mutation_min_depth: 0,
            mutation_max_depth: 2,
            depth_limit: None,
            size_limit: None,
            verbose: false,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(GpError::Configuration(
                "Population size must be at least 2".to_string()
            ));
        }
        if self.threads == 0 {
            return Err(GpError::Configuration(
                "At least one evaluation thread is required".to_string()
            ));
        }
        if self.tournament_size == 0 {
            return Err(GpError::Configuration(
                "Tournament size must be at least 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_prob) {
            return Err(GpError::Configuration(
                "Crossover probability must be between 0 and 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_prob) {
            return Err(GpError::Configuration(
                "Mutation probability must be between 0 and 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.target_fitness) {
            return Err(GpError::Configuration(
                "Target fitness must be between 0 and 1".to_string()
            ));
        }
        if self.init_min_depth > self.init_max_depth {
            return Err(GpError::Configuration(format!(
                "Initial depth range {}..={} is empty",
                self.init_min_depth, self.init_max_depth
            )));
        }
        if self.mutation_min_depth > self.mutation_max_depth {
            return Err(GpError::Configuration(format!(
                "Mutation depth range {}..={} is empty",
                self.mutation_min_depth, self.mutation_max_depth
            )));
        }
        if self.size_limit == Some(0) {
            return Err(GpError::Configuration(
                "Size limit must allow at least one opcode".to_string()
            ));
        }
        Ok(())
    }
}
