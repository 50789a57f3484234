//! Sprig: a small Lisp with a streaming reader, a user-extensible macro
//! expander, quasiquotation and a trampolined evaluator with proper tail
//! calls.
//!
//! ```rust
//! use sprig::prelude::*;
//!
//! let output = OutputBuffer::new();
//! let mut engine = Engine::new(SharedOutput::new(output.clone()));
//! let value = engine
//!     .run_str("doc", "(define (sq x) (* x x)) (display (sq 4)) (sq 5)")
//!     .unwrap();
//! assert_eq!(value.to_string(), "25");
//! assert_eq!(output.contents(), "16");
//! ```

pub use crate::errors::{SprigError, SprigResult};

pub mod ast;
pub mod atoms;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod macros;
pub mod repl;
pub mod runtime;
pub mod syntax;

pub mod prelude {
    pub use crate::ast::{Complex, Number, Value};
    pub use crate::atoms::{NullSink, OutputSink, SharedOutput};
    pub use crate::cli::output::{OutputBuffer, StdoutSink};
    pub use crate::config::EngineConfig;
    pub use crate::engine::{run_on_session_stack, Engine, Parsed};
    pub use crate::errors::{ErrorCategory, ErrorKind, SprigError, SprigResult};
    pub use crate::runtime::Env;
    pub use crate::syntax::tokens::TokenStream;
}
