//! Shared infrastructure for atom implementations: arity checks, typed
//! argument extraction, and error construction under the builtin phase.

use crate::ast::{Number, Value};
use crate::errors::{ErrorKind, ErrorReporting, Phase, SprigError, SprigResult};

/// Convenient alias for atom return values.
pub type AtomResult = SprigResult<Value>;

// ============================================================================
// ARITY CHECKS
// ============================================================================

pub fn require_arity(args: &[Value], expected: usize) -> SprigResult<()> {
    if args.len() != expected {
        return Err(Phase::Builtin.arity_mismatch(expected, args.len()));
    }
    Ok(())
}

pub fn require_min_arity(args: &[Value], min: usize) -> SprigResult<()> {
    if args.len() < min {
        return Err(Phase::Builtin.arity_mismatch(format!("at least {min}"), args.len()));
    }
    Ok(())
}

/// Destructures exactly one argument.
pub fn unary<'a>(args: &'a [Value]) -> SprigResult<&'a Value> {
    match args {
        [value] => Ok(value),
        _ => Err(Phase::Builtin.arity_mismatch(1, args.len())),
    }
}

/// Destructures exactly two arguments.
pub fn binary<'a>(args: &'a [Value]) -> SprigResult<(&'a Value, &'a Value)> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(Phase::Builtin.arity_mismatch(2, args.len())),
    }
}

// ============================================================================
// TYPE EXTRACTION
// ============================================================================

pub fn extract_number(value: &Value, name: &str) -> SprigResult<Number> {
    value
        .as_number()
        .ok_or_else(|| Phase::Builtin.type_mismatch(name, "number", value))
}

/// A number on the real line; complex values are rejected.
pub fn extract_real(value: &Value, name: &str) -> SprigResult<Number> {
    match value.as_number() {
        Some(Number::Complex(_)) | None => Err(Phase::Builtin.type_mismatch(name, "real number", value)),
        Some(n) => Ok(n),
    }
}

pub fn extract_list<'a>(value: &'a Value, name: &str) -> SprigResult<&'a [Value]> {
    value
        .as_list()
        .ok_or_else(|| Phase::Builtin.type_mismatch(name, "list", value))
}

pub fn extract_procedure<'a>(value: &'a Value, name: &str) -> SprigResult<&'a Value> {
    if value.is_callable() {
        Ok(value)
    } else {
        Err(Phase::Builtin.type_mismatch(name, "procedure", value))
    }
}

// ============================================================================
// ERROR CONSTRUCTION
// ============================================================================

/// Lifts a numeric failure (overflow, division by zero) into a builtin error.
pub fn numeric_error(kind: ErrorKind) -> SprigError {
    Phase::Builtin.report(kind)
}
