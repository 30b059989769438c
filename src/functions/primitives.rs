//! Generic opcode building blocks.
//!
//! Domain libraries (see [`crate::functions::boolean`] and
//! [`crate::functions::numeric`]) are assembled from these types rather than
//! implementing [`Opcode`] from scratch.

use crate::functions::traits::{check_arity, Op, Opcode};
use crate::types::Value;
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

type EvalFn<V> = Box<dyn Fn(&[V]) -> V + Send + Sync>;
type BinaryFn<V> = Box<dyn Fn(&V, &V) -> V + Send + Sync>;
type GenFn<V> = Arc<dyn Fn(&mut dyn RngCore) -> V + Send + Sync>;

// --- Constant ---
/// Leaf holding a fixed value, formatted by its name.
pub struct Constant<V> {
    name: String,
    value: V,
}

impl<V: Value> Constant<V> {
    pub fn new(name: impl Into<String>, value: V) -> Self {
        Self { name: name.into(), value }
    }

    pub fn op(name: impl Into<String>, value: V) -> Op<V> {
        Arc::new(Self::new(name, value))
    }
}

impl<V: Value> Opcode<V> for Constant<V> {
    fn name(&self) -> &str { &self.name }
    fn arity(&self) -> usize { 0 }
    fn eval(&self, _inputs: &[V]) -> V {
        self.value.clone()
    }
}

impl<V: fmt::Debug> fmt::Debug for Constant<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constant")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

// --- Terminal ---
/// Leaf whose value comes from a closure, e.g. a sensor reading of a
/// simulated agent.
pub struct Terminal<V> {
    name: String,
    fun: Box<dyn Fn() -> V + Send + Sync>,
}

impl<V: Value> Terminal<V> {
    pub fn op<F>(name: impl Into<String>, fun: F) -> Op<V>
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        Arc::new(Self { name: name.into(), fun: Box::new(fun) })
    }
}

impl<V: Value> Opcode<V> for Terminal<V> {
    fn name(&self) -> &str { &self.name }
    fn arity(&self) -> usize { 0 }
    fn eval(&self, _inputs: &[V]) -> V {
        (self.fun)()
    }
}

impl<V> fmt::Debug for Terminal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal").field("name", &self.name).finish_non_exhaustive()
    }
}

// --- Function ---
/// Internal node with any positive arity, formatted as `name(a, b, ...)`.
pub struct Function<V> {
    name: String,
    arity: usize,
    fun: EvalFn<V>,
}

impl<V: Value> Function<V> {
    pub fn op<F>(name: impl Into<String>, arity: usize, fun: F) -> Op<V>
    where
        F: Fn(&[V]) -> V + Send + Sync + 'static,
    {
        assert!(arity > 0, "a function needs at least one argument");
        Arc::new(Self { name: name.into(), arity, fun: Box::new(fun) })
    }
}

impl<V: Value> Opcode<V> for Function<V> {
    fn name(&self) -> &str { &self.name }
    fn arity(&self) -> usize { self.arity }
    fn eval(&self, args: &[V]) -> V {
        check_arity(&self.name, self.arity, args);
        (self.fun)(args)
    }
}

impl<V> fmt::Debug for Function<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

// --- Binary operator ---
/// Binary internal node formatted infix as `(a OP b)`.
pub struct Operator<V> {
    name: String,
    fun: BinaryFn<V>,
}

impl<V: Value> Operator<V> {
    pub fn op<F>(name: impl Into<String>, fun: F) -> Op<V>
    where
        F: Fn(&V, &V) -> V + Send + Sync + 'static,
    {
        Arc::new(Self { name: name.into(), fun: Box::new(fun) })
    }
}

impl<V: Value> Opcode<V> for Operator<V> {
    fn name(&self) -> &str { &self.name }
    fn arity(&self) -> usize { 2 }
    fn eval(&self, args: &[V]) -> V {
        check_arity(&self.name, 2, args);
        (self.fun)(&args[0], &args[1])
    }
    fn format(&self, args: &[String]) -> String {
        format!("({} {} {})", args[0], self.name, args[1])
    }
}

impl<V> fmt::Debug for Operator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator").field("name", &self.name).finish_non_exhaustive()
    }
}

// --- Input variable ---
/// Leaf bound to one slot of the input values.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    index: usize,
}

impl Variable {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self { name: name.into(), index }
    }

    pub fn op<V: Value>(name: impl Into<String>, index: usize) -> Op<V> {
        Arc::new(Self::new(name, index))
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl<V: Value> Opcode<V> for Variable {
    fn name(&self) -> &str { &self.name }
    fn arity(&self) -> usize { 0 }
    fn eval(&self, inputs: &[V]) -> V {
        match inputs.get(self.index) {
            Some(value) => value.clone(),
            None => panic!(
                "variable {} bound to input {} but only {} inputs supplied",
                self.name,
                self.index,
                inputs.len()
            ),
        }
    }
    fn variable_index(&self) -> Option<usize> {
        Some(self.index)
    }
}

// --- Ephemeral random constant ---
/// Terminal whose value is drawn once, when an individual is generated, and
/// fixed for that individual's lifetime.
///
/// The instance registered in a primitive set is a template without a value;
/// generators call [`Opcode::init`] to realise a copy with its value set.
pub struct Ephemeral<V> {
    name: String,
    gen: GenFn<V>,
    value: Option<V>,
}

impl<V: Value + fmt::Display> Ephemeral<V> {
    pub fn op<F>(name: impl Into<String>, gen: F) -> Op<V>
    where
        F: Fn(&mut dyn RngCore) -> V + Send + Sync + 'static,
    {
        Arc::new(Self { name: name.into(), gen: Arc::new(gen), value: None })
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }
}

impl<V: Value + fmt::Display> Opcode<V> for Ephemeral<V> {
    fn name(&self) -> &str { &self.name }
    fn arity(&self) -> usize { 0 }
    fn eval(&self, _inputs: &[V]) -> V {
        match &self.value {
            Some(value) => value.clone(),
            None => panic!("ephemeral constant {} evaluated before init", self.name),
        }
    }
    fn format(&self, _args: &[String]) -> String {
        match &self.value {
            Some(value) => value.to_string(),
            None => self.name.clone(),
        }
    }
    fn init(&self, rng: &mut dyn RngCore) -> Option<Op<V>> {
        let value = (self.gen)(rng);
        Some(Arc::new(Self {
            name: self.name.clone(),
            gen: Arc::clone(&self.gen),
            value: Some(value),
        }))
    }
}

impl<V: fmt::Debug> fmt::Debug for Ephemeral<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ephemeral")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_operator_formats_infix() {
        let add = Operator::op("+", |a: &f64, b: &f64| a + b);
        assert_eq!(add.format(&["x".to_string(), "1".to_string()]), "(x + 1)");
        assert_eq!(add.eval(&[2.0, 3.0]), 5.0);
    }

    #[test]
    fn test_function_formats_call() {
        let max = Function::op("max", 3, |a: &[f64]| a.iter().cloned().fold(f64::MIN, f64::max));
        let args: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(max.format(&args), "max(a, b, c)");
        assert_eq!(max.eval(&[1.0, 7.0, 3.0]), 7.0);
    }

    #[test]
    #[should_panic(expected = "expects 2 arguments")]
    fn test_wrong_child_count_panics() {
        let add = Operator::op("+", |a: &f64, b: &f64| a + b);
        add.eval(&[1.0]);
    }

    #[test]
    fn test_variable_reads_bound_input() {
        let y: Op<f64> = Variable::op("y", 1);
        assert_eq!(y.eval(&[1.0, 2.0]), 2.0);
        assert_eq!(y.variable_index(), Some(1));
        assert_eq!(y.format(&[]), "y");
    }

    #[test]
    #[should_panic(expected = "bound to input 3")]
    fn test_variable_out_of_range_panics() {
        let v: Op<f64> = Variable::op("in3", 3);
        v.eval(&[0.0]);
    }

    #[test]
    fn test_ephemeral_value_fixed_on_init() {
        let mut rng = StdRng::seed_from_u64(7);
        let erc = Ephemeral::op("ERC", |rng: &mut dyn RngCore| f64::from(rng.gen_range(-5_i32..=5)));
        let realised = erc.init(&mut rng).unwrap();
        let first = realised.eval(&[]);
        for _ in 0..10 {
            assert_eq!(realised.eval(&[]), first);
        }
        assert_eq!(realised.format(&[]), first.to_string());
        assert_eq!(realised.name(), "ERC");
    }

    #[test]
    #[should_panic(expected = "before init")]
    fn test_uninitialised_ephemeral_panics() {
        let erc = Ephemeral::op("ERC", |_: &mut dyn RngCore| 1.0_f64);
        erc.eval(&[]);
    }

    #[test]
    fn test_terminal_calls_closure() {
        let t = Terminal::op("seven", || 7_i64);
        assert_eq!(t.eval(&[]), 7);
        assert_eq!(t.arity(), 0);
    }
}
