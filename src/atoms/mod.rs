//! # Sprig Atom System
//!
//! Atoms are the built-in primitives bound in the global environment at
//! startup. Each one is a [`NativeFn`]: it receives already-evaluated
//! arguments and returns a value directly, outside the evaluator's trampoline.
//!
//! ## Module Structure
//!
//! - **`helpers`**: arity checks and argument extraction shared by all atoms
//! - **`math`**: the numeric tower (`+`, `-`, `*`, `/`, comparisons, `sqrt`, ...)
//! - **`logic`**: predicates and equality (`not`, `eq?`, `equal?`, ...)
//! - **`collections`**: list operations (`car`, `cons`, `append`, `map`, `apply`, ...)
//! - **`external`**: output through the session's sink (`display`, `newline`)

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Value;
use crate::runtime::{Env, NativeFn};
use crate::syntax::SymbolTable;

pub mod collections;
pub mod external;
pub mod helpers;
pub mod logic;
pub mod math;

// ============================================================================
// OUTPUT SINKS
// ============================================================================

/// Destination for program output such as `display`. Text arrives exactly as
/// the program produced it; sinks add no separators of their own.
pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// Discards everything. Used when a session has nowhere to write.
pub struct NullSink;

impl OutputSink for NullSink {
    fn emit(&mut self, _text: &str) {}
}

/// Shared, mutable handle to the session's output sink.
#[derive(Clone)]
pub struct SharedOutput(pub Rc<RefCell<dyn OutputSink>>);

impl SharedOutput {
    pub fn new<T: OutputSink + 'static>(sink: T) -> Self {
        SharedOutput(Rc::new(RefCell::new(sink)))
    }

    pub fn emit(&self, text: &str) {
        self.0.borrow_mut().emit(text);
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// The primitive set, inspectable before it is installed into an environment.
#[derive(Default)]
pub struct AtomRegistry {
    atoms: HashMap<&'static str, NativeFn>,
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, func: crate::runtime::NativeFnPtr) {
        self.atoms.insert(name, NativeFn::new(name, func));
    }

    pub fn get(&self, name: &str) -> Option<&NativeFn> {
        self.atoms.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.atoms.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.atoms.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Binds every registered atom in `env` under its interned name.
    pub fn install(&self, env: &Env, symbols: &mut SymbolTable) {
        for (name, native) in &self.atoms {
            env.define(symbols.intern(name), Value::Native(*native));
        }
    }
}

/// Registers the complete primitive set.
pub fn register_all_atoms(registry: &mut AtomRegistry) {
    math::register_math_atoms(registry);
    logic::register_logic_atoms(registry);
    collections::register_collection_atoms(registry);
    external::register_external_atoms(registry);
}

/// Builds the full registry and installs it into `env`.
pub fn install_standard_atoms(env: &Env, symbols: &mut SymbolTable) {
    let mut registry = AtomRegistry::new();
    register_all_atoms(&mut registry);
    registry.install(env, symbols);
}
