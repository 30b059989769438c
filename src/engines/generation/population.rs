use crate::engines::evaluation::{evaluate, Evaluator};
use crate::engines::generation::generator::Generator;
use crate::engines::generation::individual::Individual;
use crate::error::{GpError, Result};
use crate::types::Value;
use log::trace;
use rand::RngCore;
use std::ops::Index;

/// The individuals of one generation.
///
/// A population owns its individuals outright; cloning one copies every
/// individual so the next generation can be edited freely.
#[derive(Clone, Debug)]
pub struct Population<V> {
    individuals: Vec<Individual<V>>,
}

impl<V: Value> Population<V> {
    pub fn new(individuals: Vec<Individual<V>>) -> Self {
        Self { individuals }
    }

    /// Create `size` random individuals. They are not evaluated.
    pub fn generate(size: usize, generator: &dyn Generator<V>, rng: &mut dyn RngCore) -> Self {
        let individuals = (0..size).map(|_| generator.generate(rng)).collect();
        Self { individuals }
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Individual<V>> {
        self.individuals.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual<V>> {
        self.individuals.iter()
    }

    pub fn individuals(&self) -> &[Individual<V>] {
        &self.individuals
    }

    pub fn individuals_mut(&mut self) -> &mut [Individual<V>] {
        &mut self.individuals
    }

    pub fn push(&mut self, individual: Individual<V>) {
        self.individuals.push(individual);
    }

    pub fn into_individuals(self) -> Vec<Individual<V>> {
        self.individuals
    }

    /// The fittest individual among those with a valid fitness.
    ///
    /// Ties keep the earliest individual.
    pub fn best(&self) -> Result<&Individual<V>> {
        if self.individuals.is_empty() {
            return Err(GpError::EmptyPopulation);
        }

        let mut best: Option<&Individual<V>> = None;
        for ind in self.individuals.iter().filter(|ind| ind.fitness_valid()) {
            match best {
                Some(current) if ind.fitness() <= current.fitness() => {}
                _ => best = Some(ind),
            }
        }
        best.ok_or(GpError::NoValidIndividual)
    }

    /// Evaluate every individual lacking a valid fitness using `threads`
    /// workers. Returns the number of evaluations made.
    pub fn evaluate(&mut self, evaluator: &dyn Evaluator<V>, threads: usize) -> Result<usize> {
        evaluate(&mut self.individuals, evaluator, threads)
    }

    /// Dump every individual at trace level.
    pub fn log_individuals(&self) {
        for (i, ind) in self.individuals.iter().enumerate() {
            trace!("{:4}: {}", i, ind);
        }
    }
}

impl<V> Default for Population<V> {
    fn default() -> Self {
        Self { individuals: Vec::new() }
    }
}

impl<V> Index<usize> for Population<V> {
    type Output = Individual<V>;

    fn index(&self, index: usize) -> &Individual<V> {
        &self.individuals[index]
    }
}

impl<V> FromIterator<Individual<V>> for Population<V> {
    fn from_iter<I: IntoIterator<Item = Individual<V>>>(iter: I) -> Self {
        Self { individuals: iter.into_iter().collect() }
    }
}

impl<V> IntoIterator for Population<V> {
    type Item = Individual<V>;
    type IntoIter = std::vec::IntoIter<Individual<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Population<V> {
    type Item = &'a Individual<V>;
    type IntoIter = std::slice::Iter<'a, Individual<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}
