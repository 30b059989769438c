//! Random tree generators.
//!
//! All strategies share one loop: pick a target height in `[min, max]`, then
//! expand a stack of pending node depths, emitting a terminal whenever the
//! strategy says the branch should stop and a primitive otherwise.

use crate::engines::evaluation::Expr;
use crate::engines::generation::individual::Individual;
use crate::error::{GpError, Result};
use crate::functions::registry::PrimitiveSet;
use crate::functions::traits::Op;
use crate::types::Value;
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Source of new random individuals.
pub trait Generator<V>: Send + Sync {
    fn generate(&self, rng: &mut dyn RngCore) -> Individual<V>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Every leaf sits exactly at the target height.
    Full,
    /// Branches may stop early once past the minimum depth.
    Grow,
    /// Full or Grow with equal probability per tree.
    Ramped,
}

pub struct TreeGenerator<V> {
    pset: Arc<PrimitiveSet<V>>,
    min: usize,
    max: usize,
    strategy: Strategy,
}

impl<V: Value> TreeGenerator<V> {
    pub fn new(pset: Arc<PrimitiveSet<V>>, strategy: Strategy, min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(GpError::Generation(format!(
                "minimum height {} exceeds maximum {}",
                min, max
            )));
        }
        if pset.terminals().is_empty() {
            return Err(GpError::Generation(
                "primitive set has no terminals to build leaves from".to_string(),
            ));
        }
        Ok(Self { pset, min, max, strategy })
    }

    pub fn full(pset: Arc<PrimitiveSet<V>>, min: usize, max: usize) -> Result<Self> {
        Self::new(pset, Strategy::Full, min, max)
    }

    pub fn grow(pset: Arc<PrimitiveSet<V>>, min: usize, max: usize) -> Result<Self> {
        Self::new(pset, Strategy::Grow, min, max)
    }

    pub fn ramped(pset: Arc<PrimitiveSet<V>>, min: usize, max: usize) -> Result<Self> {
        Self::new(pset, Strategy::Ramped, min, max)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Generate just the code of a new tree.
    pub fn generate_expr(&self, rng: &mut dyn RngCore) -> Expr<V> {
        let grow = match self.strategy {
            Strategy::Full => false,
            Strategy::Grow => true,
            Strategy::Ramped => rng.gen_bool(0.5),
        };
        let terminal_ratio = self.pset.terminal_ratio();
        let no_primitives = self.pset.primitives().is_empty();

        let height = rng.gen_range(self.min..=self.max);
        let mut code = Vec::new();
        let mut stack = vec![0usize];
        while let Some(depth) = stack.pop() {
            let leaf = no_primitives
                || depth >= height
                || (grow && depth >= self.min && rng.gen_bool(terminal_ratio));

            if leaf {
                code.push(self.random_terminal(rng));
            } else {
                let op = pick(self.pset.primitives(), rng);
                stack.extend(std::iter::repeat(depth + 1).take(op.arity()));
                code.push(op);
            }
        }
        Expr::new(code)
    }

    fn random_terminal(&self, rng: &mut dyn RngCore) -> Op<V> {
        let op = pick(self.pset.terminals(), rng);
        match op.init(rng) {
            Some(realised) => realised,
            None => op,
        }
    }
}

impl<V: Value> Generator<V> for TreeGenerator<V> {
    fn generate(&self, rng: &mut dyn RngCore) -> Individual<V> {
        Individual::new(self.generate_expr(rng))
    }
}

fn pick<V>(ops: &[Op<V>], rng: &mut dyn RngCore) -> Op<V> {
    Arc::clone(&ops[rng.gen_range(0..ops.len())])
}
