use std::fmt;

use crate::ast::Value;
use crate::errors::SprigResult;
use crate::runtime::{Env, EvalContext};
use crate::syntax::Symbol;

/// Signature shared by every built-in primitive. Arguments arrive evaluated.
pub type NativeFnPtr = fn(args: &[Value], context: &EvalContext) -> SprigResult<Value>;

/// A named built-in primitive.
#[derive(Clone, Copy)]
pub struct NativeFn {
    pub name: &'static str,
    pub func: NativeFnPtr,
}

impl NativeFn {
    pub const fn new(name: &'static str, func: NativeFnPtr) -> Self {
        Self { name, func }
    }
}

/// Builtins are registered once under unique names.
impl PartialEq for NativeFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

/// Parameter shape of a lambda.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// `(lambda (a b) ...)`: exactly this many arguments.
    Fixed(Vec<Symbol>),
    /// `(lambda args ...)`: every argument, collected into one list.
    Rest(Symbol),
}

impl Params {
    /// Accepts a symbol or a list made only of symbols.
    pub fn from_value(value: &Value) -> Option<Params> {
        match value {
            Value::Symbol(rest) => Some(Params::Rest(rest.clone())),
            Value::List(items) => items
                .iter()
                .map(|item| item.as_symbol().cloned())
                .collect::<Option<Vec<_>>>()
                .map(Params::Fixed),
            _ => None,
        }
    }

    pub fn arity(&self) -> Option<usize> {
        match self {
            Params::Fixed(names) => Some(names.len()),
            Params::Rest(_) => None,
        }
    }
}

/// A closure: parameters, a canonical body, and the frame it was created in.
pub struct Procedure {
    pub params: Params,
    pub body: Value,
    pub env: Env,
}

// The captured frame may hold this very procedure, so it is left out.
impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Procedure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}
