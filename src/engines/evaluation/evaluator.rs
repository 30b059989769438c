//! Parallel fitness evaluation.
//!
//! Each call builds its own worker pool, hands every worker a disjoint slice of
//! the individuals still lacking a valid fitness, and blocks until all of them
//! are done. Nothing outlives the call.

use crate::engines::evaluation::expression::Expr;
use crate::engines::generation::individual::Individual;
use crate::error::Result;
use crate::types::{Fitness, Value};
use log::debug;
use rayon::ThreadPoolBuilder;
use std::ops::Range;

/// Fitness function supplied by the problem being solved.
pub trait Evaluator<V>: Send + Sync {
    /// Score `code` in [0, 1]. The flag is false when no meaningful fitness
    /// could be computed.
    fn get_fitness(&self, code: &Expr<V>) -> (Fitness, bool);
}

impl<V, F> Evaluator<V> for F
where
    F: Fn(&Expr<V>) -> (Fitness, bool) + Send + Sync,
{
    fn get_fitness(&self, code: &Expr<V>) -> (Fitness, bool) {
        self(code)
    }
}

/// Split `n` items into contiguous ranges, one per worker.
///
/// Every range but the last holds `n / workers` items, the last one absorbs
/// the remainder. With fewer items than workers each item gets its own range.
pub fn partition_chunks(n: usize, workers: usize) -> Vec<Range<usize>> {
    if n == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, n);
    let chunk_size = n / workers;
    (0..workers)
        .map(|chunk| {
            let start = chunk * chunk_size;
            let end = if chunk == workers - 1 { n } else { start + chunk_size };
            start..end
        })
        .collect()
}

/// Compute the fitness of every individual whose fitness is not yet valid.
///
/// Returns the number of evaluator calls made.
pub fn evaluate<V: Value>(
    individuals: &mut [Individual<V>],
    evaluator: &dyn Evaluator<V>,
    workers: usize,
) -> Result<usize> {
    let mut todo: Vec<&mut Individual<V>> = individuals
        .iter_mut()
        .filter(|ind| !ind.fitness_valid())
        .collect();

    let evals = todo.len();
    let chunks = partition_chunks(evals, workers);
    if chunks.is_empty() {
        return Ok(0);
    }
    debug!("evaluating {} individuals in {} chunks: {:?}", evals, chunks.len(), chunks);

    let pool = ThreadPoolBuilder::new().num_threads(chunks.len()).build()?;
    pool.scope(|scope| {
        let mut rest: &mut [&mut Individual<V>] = &mut todo;
        for range in &chunks {
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
            rest = tail;
            scope.spawn(move |_| {
                for ind in chunk.iter_mut() {
                    let (fitness, ok) = evaluator.get_fitness(ind.code());
                    ind.set_fitness(fitness, ok);
                }
            });
        }
    });

    Ok(evals)
}
