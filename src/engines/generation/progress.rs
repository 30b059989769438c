use crate::engines::generation::population::Population;
use crate::types::Value;
use log::{info, warn};

/// Called after the initial population and after every generation.
///
/// Returning true ends the run.
pub trait GenerationLogger<V> {
    fn on_generation(&mut self, population: &Population<V>, generation: usize, evals: usize) -> bool;
}

impl<V, F> GenerationLogger<V> for F
where
    F: FnMut(&Population<V>, usize, usize) -> bool,
{
    fn on_generation(&mut self, population: &Population<V>, generation: usize, evals: usize) -> bool {
        self(population, generation, evals)
    }
}

/// Logs the best individual of each generation and stops at a generation
/// cap or once the target fitness is reached.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    pub max_generations: usize,
    pub target_fitness: f64,
}

impl ConsoleLogger {
    pub fn new(max_generations: usize, target_fitness: f64) -> Self {
        Self {
            max_generations,
            target_fitness,
        }
    }
}

impl<V: Value> GenerationLogger<V> for ConsoleLogger {
    fn on_generation(&mut self, population: &Population<V>, generation: usize, evals: usize) -> bool {
        let solved = match population.best() {
            Ok(best) => {
                info!("gen {:4}  evals {:6}  best {}", generation, evals, best);
                best.fitness() >= self.target_fitness
            }
            Err(e) => {
                warn!("gen {:4}  evals {:6}  {}", generation, evals, e);
                false
            }
        };
        solved || generation >= self.max_generations
    }
}
