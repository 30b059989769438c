use std::fmt::Debug;

/// Bound for the value type flowing through a run's expression trees.
///
/// A single value type is used by every opcode in one run; it only needs to be
/// cheap to clone and shareable with the evaluation workers.
pub trait Value: Clone + Debug + Send + Sync + 'static {}

impl<T> Value for T where T: Clone + Debug + Send + Sync + 'static {}

/// Normalised fitness score in [0, 1], 1 being a perfect solution.
pub type Fitness = f64;
