//! Expression trees stored as flat prefix lists of opcodes.
//!
//! Each node is followed by its children, so a node's arity alone determines
//! how many of the following elements belong to it. A list is well formed when
//! one pre-order walk from index 0 consumes every element exactly once.

use crate::functions::traits::Op;
use crate::types::Value;
use rand::{Rng, RngCore};
use std::fmt;
use std::sync::Arc;

pub struct Expr<V> {
    code: Vec<Op<V>>,
}

impl<V: Value> Expr<V> {
    pub fn new(code: Vec<Op<V>>) -> Self {
        Self { code }
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn ops(&self) -> &[Op<V>] {
        &self.code
    }

    pub fn get(&self, pos: usize) -> Option<&Op<V>> {
        self.code.get(pos)
    }

    /// Walk the subtree rooted at `pos` depth first.
    ///
    /// Children are visited before their parent: `visitor.leaf` fires for
    /// arity-0 opcodes and `visitor.node` for the rest once all their children
    /// are done. Returns the index of the last element of the subtree.
    pub fn traverse<T: Visitor<V>>(&self, pos: usize, visitor: &mut T) -> usize {
        let op = match self.code.get(pos) {
            Some(op) => op,
            None => panic!(
                "malformed expression: subtree needs element {} of {}",
                pos,
                self.code.len()
            ),
        };

        let arity = op.arity();
        if arity == 0 {
            visitor.leaf(op);
            return pos;
        }

        let mut end = pos;
        for _ in 0..arity {
            end = self.traverse(end + 1, visitor);
        }
        visitor.node(op);
        end
    }

    /// Index of the last element of the subtree rooted at `pos`.
    pub fn subtree_end(&self, pos: usize) -> usize {
        self.traverse(pos, &mut ())
    }

    /// Evaluate the tree for one set of input values.
    pub fn eval(&self, inputs: &[V]) -> V {
        let mut visitor = EvalVisitor {
            stack: Vec::with_capacity(self.code.len()),
            inputs,
        };
        let end = self.traverse(0, &mut visitor);
        self.assert_consumed(end);
        visitor.finish()
    }

    /// Human readable rendering, infix for operators.
    pub fn format(&self) -> String {
        if self.code.is_empty() {
            return String::new();
        }

        let mut visitor = FormatVisitor {
            stack: Vec::with_capacity(self.code.len()),
        };
        let end = self.traverse(0, &mut visitor);
        self.assert_consumed(end);
        visitor.stack.pop().unwrap_or_default()
    }

    /// Height of the tree, a lone root being depth 0.
    pub fn depth(&self) -> usize {
        let mut stack = vec![0usize];
        let mut max_depth = 0;
        for op in &self.code {
            let depth = match stack.pop() {
                Some(depth) => depth,
                None => panic!("malformed expression: more opcodes than child slots"),
            };
            max_depth = max_depth.max(depth);
            stack.extend(std::iter::repeat(depth + 1).take(op.arity()));
        }
        max_depth
    }

    /// True if a single pre-order walk from the root consumes the whole list.
    pub fn is_well_formed(&self) -> bool {
        let mut open = 1usize;
        for op in &self.code {
            if open == 0 {
                return false;
            }
            open = open - 1 + op.arity();
        }
        open == 0
    }

    /// Copy of the subtree rooted at `pos`.
    pub fn subtree(&self, pos: usize) -> Expr<V> {
        let end = self.subtree_end(pos);
        Expr::new(self.code[pos..=end].to_vec())
    }

    /// Pick a uniformly random node and return its position with a copy of
    /// the subtree below it.
    pub fn random_subtree(&self, rng: &mut dyn RngCore) -> (usize, Expr<V>) {
        let pos = rng.gen_range(0..self.code.len());
        (pos, self.subtree(pos))
    }

    /// New expression with the subtree at `pos` swapped for `replacement`.
    ///
    /// Neither `self` nor `replacement` is modified.
    pub fn replace_subtree(&self, pos: usize, replacement: &Expr<V>) -> Expr<V> {
        let end = self.subtree_end(pos);
        let mut code = Vec::with_capacity(self.code.len() - (end + 1 - pos) + replacement.len());
        code.extend_from_slice(&self.code[..pos]);
        code.extend_from_slice(&replacement.code);
        code.extend_from_slice(&self.code[end + 1..]);
        Expr::new(code)
    }

    fn assert_consumed(&self, end: usize) {
        assert_eq!(
            end + 1,
            self.code.len(),
            "malformed expression: root subtree ends at {} of {} opcodes",
            end,
            self.code.len()
        );
    }
}

/// Callbacks for [`Expr::traverse`].
pub trait Visitor<V> {
    fn node(&mut self, op: &Op<V>);
    fn leaf(&mut self, op: &Op<V>);
}

/// Visits nothing, used to find subtree boundaries.
impl<V> Visitor<V> for () {
    fn node(&mut self, _op: &Op<V>) {}
    fn leaf(&mut self, _op: &Op<V>) {}
}

/// A pair of closures: `(node, leaf)`.
impl<V, N, L> Visitor<V> for (N, L)
where
    N: FnMut(&Op<V>),
    L: FnMut(&Op<V>),
{
    fn node(&mut self, op: &Op<V>) {
        (self.0)(op)
    }
    fn leaf(&mut self, op: &Op<V>) {
        (self.1)(op)
    }
}

struct EvalVisitor<'a, V> {
    stack: Vec<V>,
    inputs: &'a [V],
}

impl<V> EvalVisitor<'_, V> {
    fn finish(mut self) -> V {
        match self.stack.pop() {
            Some(value) if self.stack.is_empty() => value,
            _ => panic!("malformed expression: evaluation did not reduce to one value"),
        }
    }
}

impl<V> Visitor<V> for EvalVisitor<'_, V> {
    fn node(&mut self, op: &Op<V>) {
        let split = self.stack.len() - op.arity();
        let args = self.stack.split_off(split);
        self.stack.push(op.eval(&args));
    }
    fn leaf(&mut self, op: &Op<V>) {
        self.stack.push(op.eval(self.inputs));
    }
}

struct FormatVisitor {
    stack: Vec<String>,
}

impl<V> Visitor<V> for FormatVisitor {
    fn node(&mut self, op: &Op<V>) {
        let split = self.stack.len() - op.arity();
        let args = self.stack.split_off(split);
        self.stack.push(op.format(&args));
    }
    fn leaf(&mut self, op: &Op<V>) {
        self.stack.push(op.format(&[]));
    }
}

impl<V> Clone for Expr<V> {
    fn clone(&self) -> Self {
        Self {
            code: self.code.iter().map(Arc::clone).collect(),
        }
    }
}

impl<V> From<Vec<Op<V>>> for Expr<V> {
    fn from(code: Vec<Op<V>>) -> Self {
        Self { code }
    }
}

impl<V: Value> fmt::Display for Expr<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl<V> fmt::Debug for Expr<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.code.iter().map(|op| op.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::primitives::Variable;
    use crate::functions::{boolean, numeric};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn x() -> Op<f64> {
        Variable::op("x", 0)
    }

    fn y() -> Op<f64> {
        Variable::op("y", 1)
    }

    // (x + (y * 2))
    fn sample() -> Expr<f64> {
        Expr::new(vec![numeric::add(), x(), numeric::mul(), y(), numeric::constant(2.0)])
    }

    #[test]
    fn test_boolean_and_eval_and_format() {
        let code = Expr::new(vec![boolean::and(), boolean::constant(true), boolean::constant(false)]);
        assert!(!code.eval(&[]));
        assert_eq!(code.format(), "(True and False)");
    }

    #[test]
    fn test_depth_and_size() {
        let code = Expr::new(vec![numeric::add(), x(), y()]);
        assert_eq!(code.depth(), 1);
        assert_eq!(code.len(), 3);

        assert_eq!(sample().depth(), 2);
        assert_eq!(Expr::new(vec![x()]).depth(), 0);
    }

    #[test]
    fn test_eval_uses_inputs() {
        assert_eq!(sample().eval(&[1.0, 3.0]), 7.0);
        assert_eq!(sample().format(), "(x + (y * 2))");
    }

    #[test]
    fn test_unary_function_format() {
        let code = Expr::new(vec![numeric::neg(), numeric::add(), x(), numeric::constant(1.0)]);
        assert_eq!(code.format(), "-((x + 1))");
        assert_eq!(code.eval(&[2.0]), -3.0);
    }

    #[test]
    fn test_traverse_visits_children_first() {
        let code = sample();
        let mut order = Vec::new();
        let mut leaves = Vec::new();
        let mut visitor = (
            |op: &Op<f64>| order.push(op.name().to_string()),
            |op: &Op<f64>| leaves.push(op.name().to_string()),
        );
        let end = code.traverse(0, &mut visitor);
        assert_eq!(end, 4);
        assert_eq!(order, vec!["*", "+"]);
        assert_eq!(leaves, vec!["x", "y", "2"]);
    }

    #[test]
    fn test_subtree_end() {
        let code = sample();
        assert_eq!(code.subtree_end(0), 4);
        assert_eq!(code.subtree_end(1), 1);
        assert_eq!(code.subtree_end(2), 4);
        assert_eq!(code.subtree(2).format(), "(y * 2)");
    }

    #[test]
    fn test_replace_root_with_leaf() {
        let code = sample();
        let leaf = Expr::new(vec![numeric::constant(5.0)]);
        let replaced = code.replace_subtree(0, &leaf);
        let original_len = code.subtree_end(0) + 1;
        assert_eq!(replaced.len(), code.len() - original_len + 1);
        assert!(replaced.is_well_formed());
        assert_eq!(replaced.format(), "5");
        // source untouched
        assert_eq!(code.format(), "(x + (y * 2))");
    }

    #[test]
    fn test_replace_inner_subtree() {
        let code = sample();
        let replacement = Expr::new(vec![numeric::sub(), x(), y()]);
        let replaced = code.replace_subtree(2, &replacement);
        assert_eq!(replaced.format(), "(x + (x - y))");
        assert!(replaced.is_well_formed());
        assert_eq!(code.len(), 5);
    }

    #[test]
    fn test_well_formed_detection() {
        assert!(sample().is_well_formed());
        assert!(!Expr::new(vec![numeric::add(), x()]).is_well_formed());
        assert!(!Expr::new(vec![x(), y()]).is_well_formed());
        assert!(!Expr::<f64>::new(Vec::new()).is_well_formed());
    }

    #[test]
    #[should_panic(expected = "malformed expression")]
    fn test_eval_underflow_panics() {
        Expr::new(vec![numeric::add(), x()]).eval(&[1.0]);
    }

    #[test]
    #[should_panic(expected = "malformed expression")]
    fn test_eval_leftover_panics() {
        Expr::new(vec![x(), y()]).eval(&[1.0, 2.0]);
    }

    #[test]
    fn test_random_subtree_is_closed() {
        let mut rng = StdRng::seed_from_u64(11);
        let code = sample();
        for _ in 0..50 {
            let (pos, sub) = code.random_subtree(&mut rng);
            assert!(pos < code.len());
            assert!(sub.is_well_formed());
            assert_eq!(sub.len(), code.subtree_end(pos) + 1 - pos);
        }
    }

    #[test]
    fn test_clone_shares_nothing_mutable() {
        let code = sample();
        let copy = code.clone();
        let edited = copy.replace_subtree(1, &Expr::new(vec![y()]));
        assert_eq!(code.format(), "(x + (y * 2))");
        assert_eq!(copy.format(), "(x + (y * 2))");
        assert_eq!(edited.format(), "(y + (y * 2))");
    }
}
