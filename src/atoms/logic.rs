//! # Logic and Predicates
//!
//! Boolean negation, the two equality flavours, and type predicates.
//!
//! - `eq?` is identity: atoms compare by value, strings, lists and closures
//!   by reference (the empty list is unique).
//! - `equal?` is structural.

use crate::ast::Value;
use crate::atoms::helpers::{binary, unary, AtomResult};
use crate::atoms::AtomRegistry;
use crate::runtime::EvalContext;

/// Logical negation under the language's truthiness rules.
///
/// Usage: (not <value>)
///
/// Example:
///   (not 0)   ; => #t
///   (not '(1)) ; => #f
pub fn atom_not(args: &[Value], _: &EvalContext) -> AtomResult {
    Ok(Value::Bool(!unary(args)?.is_truthy()))
}

/// Usage: (eq? <a> <b>)
pub fn atom_eq(args: &[Value], _: &EvalContext) -> AtomResult {
    let (a, b) = binary(args)?;
    Ok(Value::Bool(a.is_identical(b)))
}

/// Usage: (equal? <a> <b>)
pub fn atom_equal(args: &[Value], _: &EvalContext) -> AtomResult {
    let (a, b) = binary(args)?;
    Ok(Value::Bool(a == b))
}

fn predicate(args: &[Value], test: fn(&Value) -> bool) -> AtomResult {
    Ok(Value::Bool(test(unary(args)?)))
}

pub fn atom_is_symbol(args: &[Value], _: &EvalContext) -> AtomResult {
    predicate(args, |v| matches!(v, Value::Symbol(_)))
}

pub fn atom_is_procedure(args: &[Value], _: &EvalContext) -> AtomResult {
    predicate(args, Value::is_callable)
}

pub fn atom_is_boolean(args: &[Value], _: &EvalContext) -> AtomResult {
    predicate(args, |v| matches!(v, Value::Bool(_)))
}

pub fn atom_is_string(args: &[Value], _: &EvalContext) -> AtomResult {
    predicate(args, |v| matches!(v, Value::Str(_)))
}

pub fn register_logic_atoms(registry: &mut AtomRegistry) {
    registry.register("not", atom_not);
    registry.register("eq?", atom_eq);
    registry.register("equal?", atom_equal);
    registry.register("symbol?", atom_is_symbol);
    registry.register("procedure?", atom_is_procedure);
    registry.register("boolean?", atom_is_boolean);
    registry.register("string?", atom_is_string);
}
