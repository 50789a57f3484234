//! Runtime: environments, procedures, and the trampolined evaluator.
//!
//! The evaluator runs canonical forms only. Everything it sees has already
//! been through the expander, so the special-form set is fixed: `quote`,
//! `if`, `define`, `set!`, `lambda`, `begin`, plus procedure calls.

pub mod context;
pub mod env;
pub mod eval;
pub mod procedure;

pub use context::EvalContext;
pub use env::Env;
pub use eval::{apply, eval};
pub use procedure::{NativeFn, NativeFnPtr, Params, Procedure};
