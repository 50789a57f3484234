//! # Collection Operations
//!
//! Lists are immutable sequences, not cons pairs: `cdr` returns a fresh
//! shorter list and `cons` requires a list as its second argument.
//!
//! ## Atoms Provided
//!
//! - **Construction**: `list`, `cons`, `append`
//! - **Access**: `car`, `cdr`, `length`
//! - **Predicates**: `list?`, `null?`
//! - **Higher-order**: `map`, `apply`

use crate::ast::Value;
use crate::atoms::helpers::{binary, extract_list, extract_procedure, unary, AtomResult};
use crate::atoms::AtomRegistry;
use crate::errors::{ErrorReporting, Phase, SprigResult};
use crate::runtime::{apply, EvalContext};

/// Usage: (list <a> <b> ...)
pub fn atom_list(args: &[Value], _: &EvalContext) -> AtomResult {
    Ok(Value::list(args.to_vec()))
}

/// Prepends an element to a list.
///
/// Usage: (cons <head> <list>)
///
/// Example:
///   (cons 1 '(2 3)) ; => (1 2 3)
pub fn atom_cons(args: &[Value], _: &EvalContext) -> AtomResult {
    let (head, tail) = binary(args)?;
    let tail = extract_list(tail, "cons")?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(head.clone());
    items.extend_from_slice(tail);
    Ok(Value::list(items))
}

/// Concatenates any number of lists.
///
/// Usage: (append <list> ...)
///
/// Example:
///   (append '(1) '() '(2 3)) ; => (1 2 3)
pub fn atom_append(args: &[Value], _: &EvalContext) -> AtomResult {
    let mut items = Vec::new();
    for arg in args {
        items.extend_from_slice(extract_list(arg, "append")?);
    }
    Ok(Value::list(items))
}

/// First element of a non-empty list.
///
/// Usage: (car <list>)
pub fn atom_car(args: &[Value], _: &EvalContext) -> AtomResult {
    let arg = unary(args)?;
    extract_list(arg, "car")?
        .first()
        .cloned()
        .ok_or_else(|| Phase::Builtin.type_mismatch("car", "non-empty list", arg))
}

/// Everything after the first element.
///
/// Usage: (cdr <list>)
pub fn atom_cdr(args: &[Value], _: &EvalContext) -> AtomResult {
    let arg = unary(args)?;
    match extract_list(arg, "cdr")? {
        [_, rest @ ..] => Ok(Value::list(rest.to_vec())),
        [] => Err(Phase::Builtin.type_mismatch("cdr", "non-empty list", arg)),
    }
}

/// Usage: (length <list>)
pub fn atom_length(args: &[Value], _: &EvalContext) -> AtomResult {
    let items = extract_list(unary(args)?, "length")?;
    Ok(Value::Int(items.len() as i64))
}

/// Usage: (list? <value>)
pub fn atom_is_list(args: &[Value], _: &EvalContext) -> AtomResult {
    Ok(Value::Bool(matches!(unary(args)?, Value::List(_))))
}

/// True only for the empty list.
///
/// Usage: (null? <value>)
pub fn atom_is_null(args: &[Value], _: &EvalContext) -> AtomResult {
    Ok(Value::Bool(matches!(unary(args)?.as_list(), Some([]))))
}

/// Applies a procedure to each element, collecting the results.
///
/// Usage: (map <procedure> <list>)
///
/// Example:
///   (map (lambda (x) (* x x)) '(1 2 3)) ; => (1 4 9)
pub fn atom_map(args: &[Value], context: &EvalContext) -> AtomResult {
    let (procedure, items) = binary(args)?;
    let procedure = extract_procedure(procedure, "map")?;
    let results = extract_list(items, "map")?
        .iter()
        .map(|item| apply(procedure, vec![item.clone()], context))
        .collect::<SprigResult<Vec<_>>>()?;
    Ok(Value::list(results))
}

/// Calls a procedure with arguments taken from a list. Leading arguments
/// before the final list are prepended.
///
/// Usage: (apply <procedure> <arg> ... <list>)
///
/// Example:
///   (apply + 1 '(2 3)) ; => 6
pub fn atom_apply(args: &[Value], context: &EvalContext) -> AtomResult {
    let [procedure, leading @ .., last] = args else {
        return Err(Phase::Builtin.arity_mismatch("at least 2", args.len()));
    };
    let procedure = extract_procedure(procedure, "apply")?;
    let mut call_args = leading.to_vec();
    call_args.extend_from_slice(extract_list(last, "apply")?);
    apply(procedure, call_args, context)
}

pub fn register_collection_atoms(registry: &mut AtomRegistry) {
    registry.register("list", atom_list);
    registry.register("cons", atom_cons);
    registry.register("append", atom_append);
    registry.register("car", atom_car);
    registry.register("cdr", atom_cdr);
    registry.register("length", atom_length);
    registry.register("list?", atom_is_list);
    registry.register("null?", atom_is_null);
    registry.register("map", atom_map);
    registry.register("apply", atom_apply);
}
