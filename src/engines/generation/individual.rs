use crate::engines::evaluation::Expr;
use crate::types::{Fitness, Value};
use std::fmt;
use std::sync::OnceLock;

/// One candidate program together with its fitness.
#[derive(Clone)]
pub struct Individual<V> {
    code: Expr<V>,
    fitness: Fitness,
    fitness_valid: bool,
    depth: OnceLock<usize>,
}

impl<V: Value> Individual<V> {
    /// Wrap `code` in a new individual which still needs evaluating.
    pub fn new(code: Expr<V>) -> Self {
        Self {
            code,
            fitness: 0.0,
            fitness_valid: false,
            depth: OnceLock::new(),
        }
    }

    pub fn code(&self) -> &Expr<V> {
        &self.code
    }

    pub fn into_code(self) -> Expr<V> {
        self.code
    }

    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    pub fn fitness_valid(&self) -> bool {
        self.fitness_valid
    }

    /// Record the result of an evaluation.
    pub fn set_fitness(&mut self, fitness: Fitness, valid: bool) {
        self.fitness = fitness;
        self.fitness_valid = valid;
    }

    /// Number of opcodes in the code.
    pub fn size(&self) -> usize {
        self.code.len()
    }

    /// Tree depth, computed on first use.
    pub fn depth(&self) -> usize {
        if self.code.is_empty() {
            return 0;
        }
        *self.depth.get_or_init(|| self.code.depth())
    }

    /// True if both individuals print the same program.
    pub fn same_code(&self, other: &Individual<V>) -> bool {
        self.code.format() == other.code.format()
    }
}

impl<V: Value> fmt::Display for Individual<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fitness_valid {
            write!(f, "{:6.3}  {}", self.fitness, self.code)
        } else {
            write!(f, "{:>6}  {}", "????", self.code)
        }
    }
}

impl<V> fmt::Debug for Individual<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Individual")
            .field("code", &self.code)
            .field("fitness", &self.fitness)
            .field("fitness_valid", &self.fitness_valid)
            .finish()
    }
}
