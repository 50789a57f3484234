//! # Mathematical Operations
//!
//! The numeric tower: integers promote to floats, floats to complex numbers.
//! Integer arithmetic is checked; overflow is an error rather than a wrap.
//!
//! ## Atoms Provided
//!
//! - **Arithmetic**: `+`, `-`, `*`, `/`
//! - **Comparison**: `=`, `<`, `>`, `<=`, `>=`
//! - **Math Functions**: `abs`, `max`, `min`, `round`, `sqrt`, `expt`
//! - **Predicates**: `number?`

use std::cmp::Ordering;

use crate::ast::{Complex, Number, Value};
use crate::atoms::helpers::{
    binary, extract_number, extract_real, numeric_error, require_min_arity, unary, AtomResult,
};
use crate::atoms::AtomRegistry;
use crate::errors::{ErrorKind, SprigResult};
use crate::runtime::EvalContext;

// ============================================================================
// ARITHMETIC OPERATIONS
// ============================================================================

fn fold_numbers(
    args: &[Value],
    name: &str,
    init: Number,
    op: fn(Number, Number) -> Result<Number, ErrorKind>,
) -> SprigResult<Number> {
    args.iter().try_fold(init, |acc, arg| {
        op(acc, extract_number(arg, name)?).map_err(numeric_error)
    })
}

/// Adds numbers.
///
/// Usage: (+ <a> <b> ...)
///
/// Example:
///   (+ 1 2 3) ; => 6
pub fn atom_add(args: &[Value], _: &EvalContext) -> AtomResult {
    fold_numbers(args, "+", Number::Int(0), Number::add).map(Value::from)
}

/// Subtracts the rest from the first, or negates a single operand.
///
/// Usage: (- <a> <b> ...)
///
/// Example:
///   (- 5 2) ; => 3
///   (- 5)   ; => -5
pub fn atom_sub(args: &[Value], _: &EvalContext) -> AtomResult {
    require_min_arity(args, 1)?;
    let first = extract_number(&args[0], "-")?;
    if args.len() == 1 {
        return first.neg().map(Value::from).map_err(numeric_error);
    }
    fold_numbers(&args[1..], "-", first, Number::sub).map(Value::from)
}

/// Multiplies numbers.
///
/// Usage: (* <a> <b> ...)
///
/// Example:
///   (* 2 3 4) ; => 24
pub fn atom_mul(args: &[Value], _: &EvalContext) -> AtomResult {
    fold_numbers(args, "*", Number::Int(1), Number::mul).map(Value::from)
}

/// True division. Two integers divide to a float.
///
/// Usage: (/ <a> <b> ...)
///
/// Example:
///   (/ 6 4) ; => 1.5
///   (/ 4)   ; => 0.25
///
/// Note: Errors on division by zero.
pub fn atom_div(args: &[Value], _: &EvalContext) -> AtomResult {
    require_min_arity(args, 1)?;
    let first = extract_number(&args[0], "/")?;
    if args.len() == 1 {
        return Number::Int(1).div(first).map(Value::from).map_err(numeric_error);
    }
    fold_numbers(&args[1..], "/", first, Number::div).map(Value::from)
}

// ============================================================================
// COMPARISON OPERATIONS
// ============================================================================

/// Numeric equality across the tower.
///
/// Usage: (= <a> <b> ...)
///
/// Example:
///   (= 1 1.0) ; => #t
pub fn atom_num_eq(args: &[Value], _: &EvalContext) -> AtomResult {
    require_min_arity(args, 1)?;
    let numbers = args
        .iter()
        .map(|arg| extract_number(arg, "="))
        .collect::<SprigResult<Vec<_>>>()?;
    Ok(Value::Bool(numbers.windows(2).all(|w| w[0].num_eq(w[1]))))
}

/// Checks each adjacent pair of real operands against `accept`.
fn compare_chain(args: &[Value], name: &str, accept: fn(Ordering) -> bool) -> AtomResult {
    require_min_arity(args, 1)?;
    let numbers = args
        .iter()
        .map(|arg| extract_real(arg, name))
        .collect::<SprigResult<Vec<_>>>()?;
    let holds = numbers
        .windows(2)
        .all(|w| w[0].compare(w[1]).is_some_and(accept));
    Ok(Value::Bool(holds))
}

/// Usage: (< <a> <b> ...)
pub fn atom_lt(args: &[Value], _: &EvalContext) -> AtomResult {
    compare_chain(args, "<", Ordering::is_lt)
}

/// Usage: (> <a> <b> ...)
pub fn atom_gt(args: &[Value], _: &EvalContext) -> AtomResult {
    compare_chain(args, ">", Ordering::is_gt)
}

/// Usage: (<= <a> <b> ...)
pub fn atom_le(args: &[Value], _: &EvalContext) -> AtomResult {
    compare_chain(args, "<=", Ordering::is_le)
}

/// Usage: (>= <a> <b> ...)
pub fn atom_ge(args: &[Value], _: &EvalContext) -> AtomResult {
    compare_chain(args, ">=", Ordering::is_ge)
}

// ============================================================================
// MATH FUNCTIONS
// ============================================================================

/// Absolute value; the magnitude for complex numbers.
///
/// Usage: (abs <n>)
///
/// Example:
///   (abs -3)   ; => 3
///   (abs 3+4i) ; => 5.0
pub fn atom_abs(args: &[Value], _: &EvalContext) -> AtomResult {
    let n = extract_number(unary(args)?, "abs")?;
    Ok(match n {
        Number::Int(i) => Value::Int(i.checked_abs().ok_or_else(|| {
            numeric_error(ErrorKind::IntegerOverflow {
                operation: "abs".into(),
            })
        })?),
        Number::Float(x) => Value::Float(x.abs()),
        Number::Complex(c) => Value::Float(c.norm()),
    })
}

/// Picks the operand for which `wanted` holds against every other one.
/// The winning operand is returned unchanged.
fn extremum(args: &[Value], name: &str, wanted: Ordering) -> AtomResult {
    require_min_arity(args, 1)?;
    let mut best = &args[0];
    let mut best_n = extract_real(best, name)?;
    for arg in &args[1..] {
        let n = extract_real(arg, name)?;
        if n.compare(best_n) == Some(wanted) {
            best = arg;
            best_n = n;
        }
    }
    Ok(best.clone())
}

/// Usage: (max <a> <b> ...)
pub fn atom_max(args: &[Value], _: &EvalContext) -> AtomResult {
    extremum(args, "max", Ordering::Greater)
}

/// Usage: (min <a> <b> ...)
pub fn atom_min(args: &[Value], _: &EvalContext) -> AtomResult {
    extremum(args, "min", Ordering::Less)
}

/// Rounds to the nearest integer, ties to even.
///
/// Usage: (round <n>)
///
/// Example:
///   (round 2.5) ; => 2
///   (round 3.7) ; => 4
pub fn atom_round(args: &[Value], _: &EvalContext) -> AtomResult {
    match extract_real(unary(args)?, "round")? {
        Number::Float(x) => {
            let rounded = x.round_ties_even();
            if rounded.is_finite() && rounded.abs() < i64::MAX as f64 {
                Ok(Value::Int(rounded as i64))
            } else {
                Ok(Value::Float(rounded))
            }
        }
        other => Ok(Value::from(other)),
    }
}

/// Square root. Negative reals yield a complex result.
///
/// Usage: (sqrt <n>)
///
/// Example:
///   (sqrt 16) ; => 4.0
///   (sqrt -4) ; => 2i
pub fn atom_sqrt(args: &[Value], _: &EvalContext) -> AtomResult {
    Ok(match extract_number(unary(args)?, "sqrt")? {
        Number::Complex(c) => Value::Complex(c.sqrt()),
        real => {
            let x = real.to_f64();
            if x < 0.0 {
                Value::Complex(Complex::new(0.0, (-x).sqrt()))
            } else {
                Value::Float(x.sqrt())
            }
        }
    })
}

/// Raises `base` to `power`. Integer powers of integers stay exact.
///
/// Usage: (expt <base> <power>)
///
/// Example:
///   (expt 2 10)  ; => 1024
///   (expt 4 0.5) ; => 2.0
pub fn atom_expt(args: &[Value], _: &EvalContext) -> AtomResult {
    let (base, power) = binary(args)?;
    let base = extract_number(base, "expt")?;
    let power = extract_number(power, "expt")?;
    match (base, power) {
        (Number::Int(b), Number::Int(p)) if p >= 0 => {
            let exact = u32::try_from(p).ok().and_then(|p| b.checked_pow(p));
            exact.map(Value::Int).ok_or_else(|| {
                numeric_error(ErrorKind::IntegerOverflow {
                    operation: "expt".into(),
                })
            })
        }
        (Number::Complex(_), _) | (_, Number::Complex(_)) => {
            Ok(Value::Complex(complex_pow(base.to_complex(), power.to_complex())))
        }
        _ => {
            let (b, p) = (base.to_f64(), power.to_f64());
            if b < 0.0 && p.fract() != 0.0 {
                Ok(Value::Complex(complex_pow(base.to_complex(), power.to_complex())))
            } else {
                Ok(Value::Float(b.powf(p)))
            }
        }
    }
}

/// `z^w = exp(w * ln z)` on the principal branch.
fn complex_pow(z: Complex, w: Complex) -> Complex {
    if z.re == 0.0 && z.im == 0.0 {
        return Complex::new(0.0, 0.0);
    }
    let ln = Complex::new(z.norm().ln(), z.im.atan2(z.re));
    let e = w * ln;
    let magnitude = e.re.exp();
    Complex::new(magnitude * e.im.cos(), magnitude * e.im.sin())
}

// ============================================================================
// PREDICATES
// ============================================================================

/// Usage: (number? <value>)
pub fn atom_is_number(args: &[Value], _: &EvalContext) -> AtomResult {
    Ok(Value::Bool(unary(args)?.as_number().is_some()))
}

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

pub fn register_math_atoms(registry: &mut AtomRegistry) {
    registry.register("+", atom_add);
    registry.register("-", atom_sub);
    registry.register("*", atom_mul);
    registry.register("/", atom_div);
    registry.register("=", atom_num_eq);
    registry.register("<", atom_lt);
    registry.register(">", atom_gt);
    registry.register("<=", atom_le);
    registry.register(">=", atom_ge);
    registry.register("abs", atom_abs);
    registry.register("max", atom_max);
    registry.register("min", atom_min);
    registry.register("round", atom_round);
    registry.register("sqrt", atom_sqrt);
    registry.register("expt", atom_expt);
    registry.register("number?", atom_is_number);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::{NullSink, SharedOutput};
    use crate::syntax::{Keywords, SymbolTable};

    fn ctx() -> EvalContext {
        let mut symbols = SymbolTable::new();
        EvalContext::new(Keywords::new(&mut symbols), SharedOutput::new(NullSink), 100)
    }

    #[test]
    fn arithmetic_follows_the_tower() {
        let c = ctx();
        assert_eq!(atom_add(&[Value::Int(1), Value::Int(2)], &c).unwrap(), Value::Int(3));
        assert_eq!(atom_add(&[Value::Int(1), Value::Float(0.5)], &c).unwrap(), Value::Float(1.5));
        assert_eq!(atom_add(&[], &c).unwrap(), Value::Int(0));
        assert_eq!(atom_mul(&[], &c).unwrap(), Value::Int(1));
        assert_eq!(atom_sub(&[Value::Int(5)], &c).unwrap(), Value::Int(-5));
        assert_eq!(atom_div(&[Value::Int(6), Value::Int(4)], &c).unwrap(), Value::Float(1.5));
        assert_eq!(atom_div(&[Value::Int(4)], &c).unwrap(), Value::Float(0.25));
    }

    #[test]
    fn numeric_failures_are_builtin_errors() {
        let c = ctx();
        let err = atom_div(&[Value::Int(1), Value::Int(0)], &c).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        assert_eq!(err.code(), "sprig::builtin::division_by_zero");

        let err = atom_add(&[Value::Int(i64::MAX), Value::Int(1)], &c).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IntegerOverflow { .. }));

        let err = atom_add(&[Value::Int(1), Value::string("a")], &c).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch { ref operation, .. } if operation == "+"));
    }

    #[test]
    fn comparisons_chain() {
        let c = ctx();
        let asc = [Value::Int(1), Value::Float(2.0), Value::Int(3)];
        assert_eq!(atom_lt(&asc, &c).unwrap(), Value::Bool(true));
        assert_eq!(atom_gt(&asc, &c).unwrap(), Value::Bool(false));
        assert_eq!(atom_le(&[Value::Int(2), Value::Int(2)], &c).unwrap(), Value::Bool(true));
        assert_eq!(atom_num_eq(&[Value::Int(1), Value::Float(1.0)], &c).unwrap(), Value::Bool(true));
    }

    #[test]
    fn math_functions() {
        let c = ctx();
        assert_eq!(atom_abs(&[Value::Int(-3)], &c).unwrap(), Value::Int(3));
        assert_eq!(atom_abs(&[Value::Complex(Complex::new(3.0, 4.0))], &c).unwrap(), Value::Float(5.0));
        assert_eq!(atom_max(&[Value::Int(1), Value::Float(2.5), Value::Int(2)], &c).unwrap(), Value::Float(2.5));
        assert_eq!(atom_min(&[Value::Int(1), Value::Float(2.5)], &c).unwrap(), Value::Int(1));
        assert_eq!(atom_round(&[Value::Float(2.5)], &c).unwrap(), Value::Int(2));
        assert_eq!(atom_round(&[Value::Float(3.7)], &c).unwrap(), Value::Int(4));
        assert_eq!(atom_sqrt(&[Value::Int(16)], &c).unwrap(), Value::Float(4.0));
        assert_eq!(atom_sqrt(&[Value::Int(-4)], &c).unwrap(), Value::Complex(Complex::new(0.0, 2.0)));
        assert_eq!(atom_expt(&[Value::Int(2), Value::Int(10)], &c).unwrap(), Value::Int(1024));
        assert_eq!(atom_expt(&[Value::Int(4), Value::Float(0.5)], &c).unwrap(), Value::Float(2.0));
        assert_eq!(atom_is_number(&[Value::string("1")], &c).unwrap(), Value::Bool(false));
    }
}
