//! Environment frames.
//!
//! Frames form a tree linked towards the global frame. A frame is shared by
//! every closure and every in-flight evaluation that references it, so it
//! lives behind an `Rc` and is reclaimed when the last reference goes away.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Value;
use crate::errors::{ErrorReporting, Phase, SprigResult};
use crate::runtime::Params;
use crate::syntax::Symbol;

/// Shared handle to one environment frame.
#[derive(Clone)]
pub struct Env(Rc<Frame>);

struct Frame {
    bindings: RefCell<HashMap<Symbol, Value>>,
    outer: Option<Env>,
}

impl Env {
    /// A frame with no outer link. Only the global frame is built this way.
    pub fn global() -> Self {
        Env(Rc::new(Frame {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
        }))
    }

    /// A child of `outer` binding `params` to `args`. Fixed parameter lists
    /// must match the argument count exactly.
    pub fn extend(params: &Params, args: Vec<Value>, outer: &Env) -> SprigResult<Env> {
        let bindings: HashMap<Symbol, Value> = match params {
            Params::Fixed(names) => {
                if names.len() != args.len() {
                    return Err(Phase::Eval.arity_mismatch(names.len(), args.len()));
                }
                names.iter().cloned().zip(args).collect()
            }
            Params::Rest(name) => HashMap::from([(name.clone(), Value::list(args))]),
        };
        Ok(Env(Rc::new(Frame {
            bindings: RefCell::new(bindings),
            outer: Some(outer.clone()),
        })))
    }

    /// The innermost frame, starting at `self`, that binds `name`.
    pub fn find(&self, name: &Symbol) -> Option<Env> {
        let mut current = self;
        loop {
            if current.0.bindings.borrow().contains_key(name) {
                return Some(current.clone());
            }
            current = current.0.outer.as_ref()?;
        }
    }

    pub fn lookup(&self, name: &Symbol) -> Option<Value> {
        let mut current = self;
        loop {
            if let Some(value) = current.0.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            current = current.0.outer.as_ref()?;
        }
    }

    /// Binds `name` in this frame, replacing any existing binding here.
    pub fn define(&self, name: Symbol, value: Value) {
        self.0.bindings.borrow_mut().insert(name, value);
    }

    /// The frame `set!` writes to: the owner of `name`, or this frame when
    /// no frame in the chain binds it yet.
    pub fn assignment_target(&self, name: &Symbol) -> Env {
        self.find(name).unwrap_or_else(|| self.clone())
    }

    pub fn contains_local(&self, name: &Symbol) -> bool {
        self.0.bindings.borrow().contains_key(name)
    }

    pub fn outer(&self) -> Option<&Env> {
        self.0.outer.as_ref()
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Names bound directly in this frame, sorted for stable output.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .0
            .bindings
            .borrow()
            .keys()
            .map(|s| s.name().to_string())
            .collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("bindings", &self.0.bindings.borrow().len())
            .field("global", &self.0.outer.is_none())
            .finish()
    }
}
