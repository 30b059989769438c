use crate::engines::generation::population::Population;
use crate::error::{GpError, Result};
use crate::types::Value;
use rand::{Rng, RngCore};

/// Draws individuals from a population to breed the next generation.
///
/// Selected individuals are copies; the source population is untouched.
pub trait Selector<V>: Send + Sync {
    fn select(&self, population: &Population<V>, num: usize, rng: &mut dyn RngCore) -> Result<Population<V>>;
}

/// Uniform draws with replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelection;

impl<V: Value> Selector<V> for RandomSelection {
    fn select(&self, population: &Population<V>, num: usize, rng: &mut dyn RngCore) -> Result<Population<V>> {
        if population.is_empty() {
            return Err(GpError::EmptyPopulation);
        }
        Ok((0..num)
            .map(|_| population[rng.gen_range(0..population.len())].clone())
            .collect())
    }
}

/// Tournament selection: each pick is the fittest of `size` random draws.
#[derive(Debug, Clone, Copy)]
pub struct Tournament {
    pub size: usize,
}

impl Tournament {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl<V: Value> Selector<V> for Tournament {
    fn select(&self, population: &Population<V>, num: usize, rng: &mut dyn RngCore) -> Result<Population<V>> {
        let mut chosen = Population::default();
        for _ in 0..num {
            let group = RandomSelection.select(population, self.size.max(1), rng)?;
            // an entrant without a valid fitness means the population was never evaluated
            let winner = group.best()?;
            chosen.push(winner.clone());
        }
        Ok(chosen)
    }
}
