pub mod traits;
pub mod primitives;
pub mod registry;
pub mod boolean;
pub mod numeric;

pub use primitives::{Constant, Ephemeral, Function, Operator, Terminal, Variable};
pub use registry::PrimitiveSet;
pub use traits::{Op, Opcode};
