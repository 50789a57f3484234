//! # Sprig Macro Expansion System
//!
//! Expansion is the stage between the reader and the evaluator. It rewrites
//! surface syntax into the canonical core forms (`quote`, `if`, `set!`,
//! `define`, `lambda`, `begin`, and calls), and it is the only place macros
//! exist: the evaluator never consults the macro table.
//!
//! ## Macro kinds
//!
//! - **Builtin**: a native rewrite function. `let` is the only one.
//! - **Procedure**: a Sprig procedure registered by a top-level
//!   `define-macro`. It receives the unevaluated operands and returns the
//!   replacement form.
//!
//! Either way the replacement is itself fully expanded again, so a macro may
//! expand into uses of other macros.

use ::std::collections::HashMap;

use crate::ast::Value;
use crate::errors::SprigResult;
use crate::syntax::{Keywords, Symbol};

pub mod expander;
pub mod quasiquote;
pub mod std;

pub use expander::Expander;
pub use quasiquote::expand_quasiquote;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A native macro: receives the whole form (head included) and returns its
/// replacement.
pub type MacroFn = fn(form: &Value, keywords: &Keywords) -> SprigResult<Value>;

#[derive(Debug, Clone)]
pub enum MacroDef {
    Builtin(MacroFn),
    Procedure(Value),
}

/// A single macro expansion step, recorded when tracing is enabled.
#[derive(Debug, Clone)]
pub struct MacroExpansionStep {
    pub macro_name: String,
    pub input: Value,
    pub output: Value,
}

/// Session-wide macro table, keyed by interned symbol.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: HashMap<Symbol, MacroDef>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a native macro. Returns the definition it replaced, if any.
    pub fn register(&mut self, name: Symbol, func: MacroFn) -> Option<MacroDef> {
        self.macros.insert(name, MacroDef::Builtin(func))
    }

    /// Registers a procedure macro. A later definition under the same name
    /// replaces the earlier one.
    pub fn define(&mut self, name: Symbol, procedure: Value) -> Option<MacroDef> {
        self.macros.insert(name, MacroDef::Procedure(procedure))
    }

    pub fn lookup(&self, name: &Symbol) -> Option<&MacroDef> {
        self.macros.get(name)
    }

    pub fn contains(&self, name: &Symbol) -> bool {
        self.macros.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Macro names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.macros.keys().map(|s| s.name().to_string()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SymbolTable;

    #[test]
    fn redefinition_replaces() {
        let mut symbols = SymbolTable::new();
        let name = symbols.intern("m");
        let mut table = MacroTable::new();
        assert!(table.define(name.clone(), Value::Int(1)).is_none());
        assert!(matches!(table.define(name.clone(), Value::Int(2)), Some(MacroDef::Procedure(Value::Int(1)))));
        assert!(matches!(table.lookup(&name), Some(MacroDef::Procedure(Value::Int(2)))));
        assert_eq!(table.names(), vec!["m".to_string()]);
    }
}
