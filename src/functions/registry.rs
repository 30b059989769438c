use crate::error::{GpError, Result};
use crate::functions::primitives::Variable;
use crate::functions::traits::Op;
use crate::types::Value;
use std::fmt;
use std::sync::Arc;

/// The set of opcodes available to one run.
///
/// Opcodes are split by arity: leaves (input variables, constants, ephemeral
/// constants) go to the terminals, everything else to the primitives.
pub struct PrimitiveSet<V> {
    num_vars: usize,
    terminals: Vec<Op<V>>,
    primitives: Vec<Op<V>>,
}

impl<V: Value> PrimitiveSet<V> {
    /// Create a primitive set with `num_vars` input variables.
    ///
    /// Variables take their names from `names` where given, else `in0`, `in1`, ...
    pub fn new(num_vars: usize, names: &[&str]) -> Self {
        let terminals = (0..num_vars)
            .map(|i| {
                let name = names
                    .get(i)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("in{}", i));
                Variable::op(name, i)
            })
            .collect();

        Self {
            num_vars,
            terminals,
            primitives: Vec::new(),
        }
    }

    /// Register an opcode, routing it by arity.
    pub fn add(&mut self, op: Op<V>) -> Result<()> {
        if let Some(index) = op.variable_index() {
            if index >= self.num_vars {
                return Err(GpError::VariableOutOfRange {
                    index,
                    num_vars: self.num_vars,
                });
            }
        }

        if op.arity() > 0 {
            self.primitives.push(op);
        } else {
            self.terminals.push(op);
        }
        Ok(())
    }

    pub fn add_all<I>(&mut self, ops: I) -> Result<()>
    where
        I: IntoIterator<Item = Op<V>>,
    {
        for op in ops {
            self.add(op)?;
        }
        Ok(())
    }

    /// The variable bound to input slot `n`.
    pub fn var(&self, n: usize) -> Result<Op<V>> {
        if n >= self.num_vars {
            return Err(GpError::VariableOutOfRange {
                index: n,
                num_vars: self.num_vars,
            });
        }
        Ok(Arc::clone(&self.terminals[n]))
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn terminals(&self) -> &[Op<V>] {
        &self.terminals
    }

    pub fn primitives(&self) -> &[Op<V>] {
        &self.primitives
    }

    /// Fraction of opcodes which are leaves, used by the grow generator.
    pub fn terminal_ratio(&self) -> f64 {
        let terms = self.terminals.len() as f64;
        let total = (self.terminals.len() + self.primitives.len()) as f64;
        if total == 0.0 {
            return 1.0;
        }
        terms / total
    }
}

impl<V> fmt::Display for PrimitiveSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .terminals
            .iter()
            .chain(self.primitives.iter())
            .map(|op| op.name())
            .collect();
        write!(f, "[{}]", names.join(" "))
    }
}

impl<V> fmt::Debug for PrimitiveSet<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveSet")
            .field("num_vars", &self.num_vars)
            .field("terminals", &self.terminals.len())
            .field("primitives", &self.primitives.len())
            .finish()
    }
}
