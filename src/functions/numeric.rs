//! Floating point arithmetic opcodes for symbolic regression.

use crate::functions::primitives::{Constant, Ephemeral, Function, Operator};
use crate::functions::traits::Op;
use rand::RngCore;

/// Divisors closer to zero than this make division return 0.
pub const DIVIDE_PROTECT: f64 = 1e-10;

pub fn add() -> Op<f64> {
    Operator::op("+", |a: &f64, b: &f64| a + b)
}

pub fn sub() -> Op<f64> {
    Operator::op("-", |a: &f64, b: &f64| a - b)
}

pub fn mul() -> Op<f64> {
    Operator::op("*", |a: &f64, b: &f64| a * b)
}

pub fn div() -> Op<f64> {
    Operator::op("/", protected_divide)
}

pub fn neg() -> Op<f64> {
    Function::op("-", 1, |args: &[f64]| -args[0])
}

pub fn constant(value: f64) -> Op<f64> {
    Constant::op(value.to_string(), value)
}

/// Ephemeral random constant drawing its value from `gen`.
pub fn ephemeral<F>(name: &str, gen: F) -> Op<f64>
where
    F: Fn(&mut dyn RngCore) -> f64 + Send + Sync + 'static,
{
    Ephemeral::op(name, gen)
}

fn protected_divide(a: &f64, b: &f64) -> f64 {
    if b.abs() < DIVIDE_PROTECT {
        return 0.0;
    }
    a / b
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_protected_division() {
        assert_eq!(div().eval(&[1.0, 0.0]), 0.0);
        assert_eq!(div().eval(&[1.0, 1e-12]), 0.0);
        assert_eq!(div().eval(&[3.0, 2.0]), 1.5);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(add().eval(&[1.0, 2.0]), 3.0);
        assert_eq!(sub().eval(&[1.0, 2.0]), -1.0);
        assert_eq!(mul().eval(&[4.0, 2.5]), 10.0);
        assert_eq!(neg().eval(&[4.0]), -4.0);
        assert_eq!(neg().format(&["x".to_string()]), "-(x)");
    }

    #[test]
    fn test_ephemeral_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let erc = ephemeral("ERC", |rng: &mut dyn RngCore| f64::from(rng.gen_range(-1_i32..=1)));
        for _ in 0..50 {
            let value = erc.init(&mut rng).unwrap().eval(&[]);
            assert!((-1.0..=1.0).contains(&value));
        }
    }
}
