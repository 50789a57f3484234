//! Symbols, the intern table, and the front end (token stream + reader).
//!
//! A [`Symbol`] is a handle to an interned name. Two reads of the same
//! spelling through the same [`SymbolTable`] yield handles that compare equal
//! by identity, which is what special-form and macro dispatch rely on.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

pub mod reader;
pub mod tokens;

// ============================================================================
// SYMBOLS
// ============================================================================

/// Interned symbol handle. Equality and hashing use the identity of the
/// shared name, never its spelling.
#[derive(Clone)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const u8 as usize).hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", &self.0)
    }
}

/// Intern table owned by the interpreter session. One handle per distinct
/// spelling for the lifetime of the table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    table: HashMap<Box<str>, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or create the unique symbol for `name`.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(symbol) = self.table.get(name) {
            return symbol.clone();
        }
        let symbol = Symbol(Rc::from(name));
        self.table.insert(name.into(), symbol.clone());
        symbol
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.table.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// ============================================================================
// KEYWORDS
// ============================================================================

/// Pre-interned handles for the special forms and the names the expander
/// emits. Keywords are never shadowable: dispatch compares against these
/// handles before any environment lookup.
#[derive(Debug, Clone)]
pub struct Keywords {
    pub quote: Symbol,
    pub if_: Symbol,
    pub set: Symbol,
    pub define: Symbol,
    pub lambda: Symbol,
    pub begin: Symbol,
    pub define_macro: Symbol,
    pub quasiquote: Symbol,
    pub unquote: Symbol,
    pub unquote_splicing: Symbol,
    pub append: Symbol,
    pub cons: Symbol,
    pub let_: Symbol,
}

impl Keywords {
    pub fn new(symbols: &mut SymbolTable) -> Self {
        Self {
            quote: symbols.intern("quote"),
            if_: symbols.intern("if"),
            set: symbols.intern("set!"),
            define: symbols.intern("define"),
            lambda: symbols.intern("lambda"),
            begin: symbols.intern("begin"),
            define_macro: symbols.intern("define-macro"),
            quasiquote: symbols.intern("quasiquote"),
            unquote: symbols.intern("unquote"),
            unquote_splicing: symbols.intern("unquote-splicing"),
            append: symbols.intern("append"),
            cons: symbols.intern("cons"),
            let_: symbols.intern("let"),
        }
    }

    /// The keyword a quote-family reader marker expands to.
    pub fn for_quote_marker(&self, token: &str) -> Option<&Symbol> {
        match token {
            "'" => Some(&self.quote),
            "`" => Some(&self.quasiquote),
            "," => Some(&self.unquote),
            ",@" => Some(&self.unquote_splicing),
            _ => None,
        }
    }
}
