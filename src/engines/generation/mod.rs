pub mod individual;
pub mod population;
pub mod generator;
pub mod operators;
pub mod selection;
pub mod evolution_engine;
pub mod progress;

pub use individual::Individual;
pub use population::Population;
pub use generator::{Generator, Strategy, TreeGenerator};
pub use operators::{var_and, CxOnePoint, Decorator, DepthLimit, MutUniform, SizeLimit, Variation};
pub use selection::{RandomSelection, Selector, Tournament};
pub use evolution_engine::EvolutionEngine;
pub use progress::{ConsoleLogger, GenerationLogger};
