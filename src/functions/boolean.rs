//! Boolean logic opcodes, e.g. for evolving parity or multiplexer circuits.

use crate::functions::primitives::{Constant, Function, Operator};
use crate::functions::traits::Op;

// --- Constants ---
pub fn constant(value: bool) -> Op<bool> {
    let name = if value { "True" } else { "False" };
    Constant::op(name, value)
}

// --- Logical operators ---
pub fn and() -> Op<bool> {
    Operator::op("and", |a: &bool, b: &bool| *a && *b)
}

pub fn or() -> Op<bool> {
    Operator::op("or", |a: &bool, b: &bool| *a || *b)
}

pub fn xor() -> Op<bool> {
    Operator::op("xor", |a: &bool, b: &bool| *a != *b)
}

pub fn not() -> Op<bool> {
    Function::op("not", 1, |args: &[bool]| !args[0])
}
