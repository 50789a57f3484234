use std::fmt;
use std::rc::Rc;

use crate::ast::number::{Complex, Number};
use crate::runtime::{NativeFn, Procedure};
use crate::syntax::reader::escape;
use crate::syntax::Symbol;

/// A Sprig value. Code is data: the reader produces these, the expander
/// rewrites them, and the evaluator both consumes and returns them.
///
/// # Examples
///
/// ```rust
/// use sprig::ast::Value;
/// let list = Value::list(vec![Value::Int(1), Value::Float(2.0), Value::string("s")]);
/// assert_eq!(list.to_string(), "(1 2.0 \"s\")");
/// assert!(!Value::list(vec![]).is_truthy());
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// No value: the result of `define`, `set!`, and a missing `if` branch.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex(Complex),
    Str(Rc<str>),
    Symbol(Symbol),
    /// A form or list datum. Immutable once built.
    List(Rc<[Value]>),
    /// User-defined closure.
    Procedure(Rc<Procedure>),
    /// Built-in primitive.
    Native(NativeFn),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }

    pub fn string(text: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(text.as_ref()))
    }

    /// Returns the type name of the value (for diagnostics).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Procedure(_) => "procedure",
            Value::Native(_) => "builtin",
        }
    }

    /// `#f`, nil, numeric zero, the empty list and the empty string are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(x) => *x != 0.0,
            Value::Complex(c) => c.re != 0.0 || c.im != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            _ => true,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// A non-empty list.
    pub fn is_pair(&self) -> bool {
        matches!(self, Value::List(items) if !items.is_empty())
    }

    /// True when the head of this form is exactly `keyword`.
    pub fn is_form(&self, keyword: &Symbol) -> bool {
        matches!(self.as_list(), Some([Value::Symbol(head), ..]) if head == keyword)
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(x) => Some(Number::Float(*x)),
            Value::Complex(c) => Some(Number::Complex(*c)),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Procedure(_) | Value::Native(_))
    }

    /// Identity comparison for `eq?`: atoms by value, lists and procedures by reference.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => {
                (a.is_empty() && b.is_empty()) || Rc::ptr_eq(a, b)
            }
            (Value::Str(a), Value::Str(b)) => Rc::ptr_eq(a, b),
            (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
            _ => self == other,
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Int(i),
            Number::Float(x) => Value::Float(x),
            Number::Complex(c) => Value::Complex(c),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Structural equality (`equal?`). Procedures compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Complex(a), Value::Complex(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Procedure(a), Value::Procedure(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the decimal point so floats read back as floats.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Complex(c) => write!(f, "{c}"),
            Value::Str(s) => write!(f, "\"{}\"", escape(s)),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Procedure(_) => write!(f, "#<procedure>"),
            Value::Native(native) => write!(f, "#<builtin {}>", native.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SymbolTable;

    #[test]
    fn display_round_trips_atoms() {
        let mut symbols = SymbolTable::new();
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Complex(Complex::new(1.0, 2.0)).to_string(), "1+2i");
        assert_eq!(Value::string("a\"b").to_string(), r#""a\"b""#);
        assert_eq!(Value::Symbol(symbols.intern("set!")).to_string(), "set!");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(!Value::list(vec![]).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(7).is_truthy());
        assert!(Value::list(vec![Value::Nil]).is_truthy());
    }

    #[test]
    fn equality_is_structural_identity_is_not() {
        let a = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::list(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(a, b);
        assert!(!a.is_identical(&b));
        assert!(a.is_identical(&a.clone()));
        assert!(Value::Int(3).is_identical(&Value::Int(3)));
    }

    #[test]
    fn form_heads() {
        let mut symbols = SymbolTable::new();
        let quote = symbols.intern("quote");
        let form = Value::list(vec![Value::Symbol(quote.clone()), Value::Int(1)]);
        assert!(form.is_form(&quote));
        assert!(form.is_pair());
        assert!(!Value::list(vec![]).is_pair());
        assert!(!Value::Int(1).is_form(&quote));
    }
}
