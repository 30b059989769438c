//! Tree based genetic programming.
//!
//! Programs are expression trees stored as flat prefix lists of opcodes. A
//! run registers opcodes in a [`PrimitiveSet`], supplies a fitness function
//! and lets an [`EvolutionEngine`] breed generations until a
//! [`GenerationLogger`] asks it to stop.

pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use config::{AppConfig, ConfigManager, EvolutionConfig, InitMethod};
pub use engines::evaluation::{Evaluator, Expr};
pub use engines::generation::{
    ConsoleLogger, CxOnePoint, Decorator, DepthLimit, EvolutionEngine, GenerationLogger, Generator,
    Individual, MutUniform, Population, RandomSelection, Selector, SizeLimit, Tournament,
    TreeGenerator, Variation,
};
pub use error::{GpError, Result};
pub use functions::{Op, Opcode, PrimitiveSet};
pub use types::{Fitness, Value};
