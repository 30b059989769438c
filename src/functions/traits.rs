use rand::RngCore;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an opcode. Opcodes are immutable, so expressions and
/// their clones share them freely.
pub type Op<V> = Arc<dyn Opcode<V>>;

/// Base trait for every node type that can appear in an expression tree
pub trait Opcode<V>: Send + Sync + fmt::Debug {
    /// Bare name of the opcode
    fn name(&self) -> &str;

    /// Number of child subtrees consumed, 0 for leaves
    fn arity(&self) -> usize;

    /// Evaluate the opcode.
    ///
    /// Internal nodes receive exactly `arity` already evaluated child values.
    /// Leaves receive the input values of the current fitness case.
    fn eval(&self, args: &[V]) -> V;

    /// Render the node given its already formatted children
    fn format(&self, args: &[String]) -> String {
        if args.is_empty() {
            self.name().to_string()
        } else {
            format!("{}({})", self.name(), args.join(", "))
        }
    }

    /// Input slot bound by this opcode, if it is a variable
    fn variable_index(&self) -> Option<usize> {
        None
    }

    /// Realise a per-individual instance of this opcode.
    ///
    /// Returns `None` for ordinary opcodes which are used as is. Ephemeral
    /// constants return a fresh opcode with its value fixed.
    fn init(&self, _rng: &mut dyn RngCore) -> Option<Op<V>> {
        None
    }
}

/// Panic unless `args` holds exactly `arity` values.
pub(crate) fn check_arity<V>(name: &str, arity: usize, args: &[V]) {
    assert_eq!(
        args.len(),
        arity,
        "opcode {name} expects {arity} arguments, got {}",
        args.len()
    );
}
