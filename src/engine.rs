//! The interpreter session.
//!
//! An [`Engine`] owns everything that lives for the whole session: the
//! symbol table, the macro table, the global environment and the evaluation
//! context. Reader, expander and evaluator are constructed per call against
//! borrowed pieces of it, so there is no ambient global state.
//!
//! Non-tail recursion uses native stack in proportion to `max_depth`. Hosts
//! that allow the default depth or more should drive the session through
//! [`run_on_session_stack`], which provides a stack sized for the limit.

use std::fs::File;
use std::io::BufReader;
use std::panic;
use std::path::Path;
use std::thread;

use crate::ast::Value;
use crate::atoms::{install_standard_atoms, SharedOutput};
use crate::config::EngineConfig;
use crate::errors::{ErrorKind, ErrorReporting, Phase, SprigResult};
use crate::macros::std::register_std_macros;
use crate::macros::{Expander, MacroExpansionStep, MacroTable};
use crate::runtime::{eval, Env, EvalContext};
use crate::syntax::reader::Reader;
use crate::syntax::tokens::TokenStream;
use crate::syntax::{Keywords, Symbol, SymbolTable};

/// Smallest stack a session thread is given.
pub const MIN_SESSION_STACK: usize = 64 * 1024 * 1024;

/// Native stack reserved per level of `max_depth`.
pub const STACK_PER_LEVEL: usize = 64 * 1024;

/// Stack size that lets `max_depth` levels of nesting run in an
/// unoptimized build.
pub fn session_stack_size(max_depth: usize) -> usize {
    max_depth.saturating_mul(STACK_PER_LEVEL).max(MIN_SESSION_STACK)
}

/// Runs `f` on a dedicated thread whose stack fits `max_depth` levels, and
/// returns its result. A panic inside `f` is resumed on the caller.
pub fn run_on_session_stack<F, T>(max_depth: usize, f: F) -> SprigResult<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("sprig-session".into())
            .stack_size(session_stack_size(max_depth))
            .spawn_scoped(scope, f)
            .map_err(|e| {
                Phase::Io.report(ErrorKind::Io {
                    message: format!("failed to start session thread: {e}"),
                })
            })?;
        match handle.join() {
            Ok(value) => Ok(value),
            Err(payload) => panic::resume_unwind(payload),
        }
    })
}

/// Outcome of [`Engine::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// A canonical form, ready for evaluation.
    Expr(Value),
    /// The form declared something (`define-macro`, `(begin)`) and has
    /// nothing to evaluate.
    Empty,
    /// The source is exhausted.
    Eof,
}

pub struct Engine {
    symbols: SymbolTable,
    macros: MacroTable,
    global: Env,
    context: EvalContext,
}

impl Engine {
    pub fn new(output: SharedOutput) -> Self {
        Self::with_config(output, &EngineConfig::default())
    }

    pub fn with_config(output: SharedOutput, config: &EngineConfig) -> Self {
        let mut symbols = SymbolTable::new();
        let keywords = Keywords::new(&mut symbols);
        let mut macros = MacroTable::new();
        register_std_macros(&mut macros, &keywords);
        let global = Env::global();
        install_standard_atoms(&global, &mut symbols);
        Self {
            symbols,
            macros,
            global,
            context: EvalContext::new(keywords, output, config.max_depth),
        }
    }

    // ------------------------------------------------------------------
    // Pipeline stages
    // ------------------------------------------------------------------

    /// One raw expression, or `None` at end of input.
    pub fn read(&mut self, stream: &mut TokenStream<'_>) -> SprigResult<Option<Value>> {
        Reader::new(&mut self.symbols, &self.context.keywords)
            .with_max_depth(self.context.max_depth)
            .read(stream)
    }

    /// Reads one expression and expands it at top level.
    pub fn parse(&mut self, stream: &mut TokenStream<'_>) -> SprigResult<Parsed> {
        let Some(raw) = self.read(stream)? else {
            return Ok(Parsed::Eof);
        };
        Ok(match self.expand(&raw)? {
            Some(canonical) => Parsed::Expr(canonical),
            None => Parsed::Empty,
        })
    }

    /// Expands a raw top-level expression. Top-level `define-macro` forms
    /// register their macro here and yield `None`.
    pub fn expand(&mut self, raw: &Value) -> SprigResult<Option<Value>> {
        Expander::new(&mut self.symbols, &mut self.macros, &self.global, &self.context).expand(raw, true)
    }

    /// Evaluates a canonical expression in the global environment.
    pub fn eval(&self, expr: &Value) -> SprigResult<Value> {
        eval(expr, &self.global, &self.context)
    }

    pub fn eval_in(&self, expr: &Value, env: &Env) -> SprigResult<Value> {
        eval(expr, env, &self.context)
    }

    // ------------------------------------------------------------------
    // Whole-source drivers
    // ------------------------------------------------------------------

    /// Parses and evaluates every top-level form of `text`, returning the
    /// value of the last one (nil when there is none).
    pub fn run_str(&mut self, name: &str, text: &str) -> SprigResult<Value> {
        let mut stream = TokenStream::from_str(name, text);
        self.run_stream(&mut stream)
    }

    /// Evaluates every form in a file, printing nothing per form.
    pub fn load_file(&mut self, path: &Path) -> SprigResult<()> {
        let file = File::open(path).map_err(|e| {
            Phase::Io.report(ErrorKind::Io {
                message: format!("failed to open {}: {e}", path.display()),
            })
        })?;
        let mut stream = TokenStream::from_reader(path.display().to_string(), BufReader::new(file));
        self.run_stream(&mut stream).map(|_| ())
    }

    pub fn run_stream(&mut self, stream: &mut TokenStream<'_>) -> SprigResult<Value> {
        let mut last = Value::Nil;
        loop {
            match self.parse(stream)? {
                Parsed::Eof => return Ok(last),
                Parsed::Empty => {}
                Parsed::Expr(expr) => last = self.eval(&expr)?,
            }
        }
    }

    /// Canonical forms of every top-level form in `text`. Nothing is
    /// evaluated except the procedures of `define-macro` forms.
    pub fn expand_str(&mut self, name: &str, text: &str) -> SprigResult<Vec<Value>> {
        let mut stream = TokenStream::from_str(name, text);
        let mut forms = Vec::new();
        loop {
            match self.parse(&mut stream)? {
                Parsed::Eof => return Ok(forms),
                Parsed::Empty => {}
                Parsed::Expr(expr) => forms.push(expr),
            }
        }
    }

    /// Like [`expand_str`](Self::expand_str), also returning each macro
    /// invocation in the order it happened.
    pub fn trace_str(
        &mut self,
        name: &str,
        text: &str,
    ) -> SprigResult<(Vec<Value>, Vec<MacroExpansionStep>)> {
        let mut stream = TokenStream::from_str(name, text);
        let mut forms = Vec::new();
        let mut trace = Vec::new();
        while let Some(raw) = self.read(&mut stream)? {
            let expanded =
                Expander::new(&mut self.symbols, &mut self.macros, &self.global, &self.context)
                    .with_trace(&mut trace)
                    .expand(&raw, true)?;
            forms.extend(expanded);
        }
        Ok((forms, trace))
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn define_global(&mut self, name: &str, value: Value) {
        let symbol = self.symbols.intern(name);
        self.global.define(symbol, value);
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        self.symbols.intern(name)
    }

    pub fn global(&self) -> &Env {
        &self.global
    }

    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    pub fn context(&self) -> &EvalContext {
        &self.context
    }

    pub fn output(&self) -> &SharedOutput {
        &self.context.output
    }
}
