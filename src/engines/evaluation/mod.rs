pub mod evaluator;
pub mod expression;

pub use evaluator::{evaluate, partition_chunks, Evaluator};
pub use expression::{Expr, Visitor};
