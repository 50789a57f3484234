//! Sprig Error Handling
//!
//! Every stage of the pipeline (reader, expander, evaluator, primitives)
//! reports failures through the single [`SprigError`] type. Errors are
//! constructed through the [`ErrorReporting`] trait, which each phase context
//! implements, so the diagnostic code and source attachment stay consistent.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::ast::Value;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Source text attached to an error, with the span of the offending token.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

impl SourceInfo {
    pub fn new(name: impl AsRef<str>, content: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            source: Arc::new(NamedSource::new(name, content.into())),
            primary_span: span,
        }
    }
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

// ============================================================================
// ERROR TYPES
// ============================================================================

/// The pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Read,
    Expand,
    Eval,
    Builtin,
    Io,
}

impl Phase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Phase::Read => "read",
            Phase::Expand => "expand",
            Phase::Eval => "eval",
            Phase::Builtin => "builtin",
            Phase::Io => "io",
        }
    }
}

/// The single error type for the interpreter.
#[derive(Debug, Error)]
#[error("{} error: {kind}", .kind.category())]
pub struct SprigError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it happened, when the failing token is known
    pub source_info: Option<SourceInfo>,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

/// All error kinds. `category()` splits them into syntax and evaluation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Reader
    #[error("unexpected ')'")]
    UnexpectedCloseParen,
    #[error("unexpected end of input inside list")]
    UnexpectedEof,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid escape sequence '\\{escape}' in string literal")]
    InvalidEscape { escape: char },

    // Expander
    #[error("() is not a valid expression")]
    EmptyForm,
    #[error("{form}: {reason}")]
    MalformedForm { form: String, reason: String },
    #[error("{form}: illegal lambda argument list")]
    IllegalParameterList { form: String },
    #[error("{form}: illegal binding list")]
    IllegalBindingList { form: String },
    #[error("{form}: can't splice here")]
    IllegalSplice { form: String },
    #[error("{form}: macros may only be defined at the top level")]
    MacroOutsideTopLevel { form: String },
    #[error("{form}: macro must be a procedure")]
    MacroNotProcedure { form: String },

    // Evaluator, environment and primitives
    #[error("unbound variable '{symbol}'")]
    UnboundVariable { symbol: String },
    #[error("expected {expected} argument(s), given {actual}")]
    ArityMismatch { expected: String, actual: usize },
    #[error("{value} is not callable")]
    NotCallable { value: String },
    #[error("{operation}: expected {expected}, got {actual}")]
    TypeMismatch {
        operation: String,
        expected: String,
        actual: String,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{operation}: integer overflow")]
    IntegerOverflow { operation: String },
    #[error("recursion limit of {limit} exceeded")]
    RecursionLimit { limit: usize },

    #[error("{message}")]
    Io { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Eval,
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "Syntax"),
            ErrorCategory::Eval => write!(f, "Evaluation"),
            ErrorCategory::Io => write!(f, "I/O"),
        }
    }
}

impl ErrorKind {
    /// Get the error category for reporting and test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedCloseParen
            | Self::UnexpectedEof
            | Self::UnterminatedString
            | Self::InvalidEscape { .. }
            | Self::EmptyForm
            | Self::MalformedForm { .. }
            | Self::IllegalParameterList { .. }
            | Self::IllegalBindingList { .. }
            | Self::IllegalSplice { .. }
            | Self::MacroOutsideTopLevel { .. }
            | Self::MacroNotProcedure { .. } => ErrorCategory::Syntax,

            Self::UnboundVariable { .. }
            | Self::ArityMismatch { .. }
            | Self::NotCallable { .. }
            | Self::TypeMismatch { .. }
            | Self::DivisionByZero
            | Self::IntegerOverflow { .. }
            | Self::RecursionLimit { .. } => ErrorCategory::Eval,

            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedCloseParen => "unexpected_close_paren",
            Self::UnexpectedEof => "unexpected_eof",
            Self::UnterminatedString => "unterminated_string",
            Self::InvalidEscape { .. } => "invalid_escape",
            Self::EmptyForm => "empty_form",
            Self::MalformedForm { .. } => "malformed_form",
            Self::IllegalParameterList { .. } => "illegal_parameter_list",
            Self::IllegalBindingList { .. } => "illegal_binding_list",
            Self::IllegalSplice { .. } => "illegal_splice",
            Self::MacroOutsideTopLevel { .. } => "macro_outside_top_level",
            Self::MacroNotProcedure { .. } => "macro_not_procedure",
            Self::UnboundVariable { .. } => "unbound_variable",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::NotCallable { .. } => "not_callable",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::DivisionByZero => "division_by_zero",
            Self::IntegerOverflow { .. } => "integer_overflow",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::Io { .. } => "io",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Syntax => "syntax error here",
            ErrorCategory::Eval => "evaluation failed here",
            ErrorCategory::Io => "i/o failure",
        }
    }
}

impl SprigError {
    pub fn new(kind: ErrorKind, phase: Phase) -> Self {
        let error_code = format!("sprig::{}::{}", phase.as_str(), kind.code_suffix());
        Self {
            kind,
            source_info: None,
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic_info.help = Some(help.into());
        self
    }

    pub fn with_source(mut self, source_info: SourceInfo) -> Self {
        self.source_info = Some(source_info);
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn is_syntax(&self) -> bool {
        self.category() == ErrorCategory::Syntax
    }

    pub fn code(&self) -> &str {
        &self.diagnostic_info.error_code
    }
}

impl From<std::io::Error> for SprigError {
    fn from(err: std::io::Error) -> Self {
        SprigError::new(
            ErrorKind::Io {
                message: err.to_string(),
            },
            Phase::Io,
        )
    }
}

impl Diagnostic for SprigError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let info = self.source_info.as_ref()?;
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .as_ref()
            .map(|info| &*info.source as &dyn miette::SourceCode)
    }
}

// ============================================================================
// CONTEXT-AWARE CONSTRUCTION
// ============================================================================

/// Context-aware error creation. Each phase context knows its phase and,
/// where it has one, the source location to attach.
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind) -> SprigError;

    fn malformed(&self, form: &Value, reason: &str) -> SprigError {
        self.report(ErrorKind::MalformedForm {
            form: form.to_string(),
            reason: reason.into(),
        })
    }

    fn type_mismatch(&self, operation: &str, expected: &str, actual: &Value) -> SprigError {
        self.report(ErrorKind::TypeMismatch {
            operation: operation.into(),
            expected: expected.into(),
            actual: format!("{} {}", actual.type_name(), actual),
        })
    }

    fn arity_mismatch(&self, expected: impl fmt::Display, actual: usize) -> SprigError {
        self.report(ErrorKind::ArityMismatch {
            expected: expected.to_string(),
            actual,
        })
    }

    fn unbound_variable(&self, symbol: &str) -> SprigError {
        self.report(ErrorKind::UnboundVariable {
            symbol: symbol.into(),
        })
    }
}

/// Reporting context for code that has no richer context of its own.
impl ErrorReporting for Phase {
    fn report(&self, kind: ErrorKind) -> SprigError {
        SprigError::new(kind, *self)
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a SprigError with full miette diagnostics to stderr.
pub fn print_error(error: SprigError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}

pub type SprigResult<T> = Result<T, SprigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    #[test]
    fn error_code_includes_phase_and_kind() {
        let err = Phase::Eval.unbound_variable("x");
        assert_eq!(err.code(), "sprig::eval::unbound_variable");
        assert_eq!(err.category(), ErrorCategory::Eval);
        assert_eq!(err.to_string(), "Evaluation error: unbound variable 'x'");
    }

    #[test]
    fn syntax_errors_render_with_source_label() {
        let err = Phase::Read
            .report(ErrorKind::UnexpectedCloseParen)
            .with_source(SourceInfo::new("<input>:1", "(+ 1 2))", (7..8).into()))
            .with_help("remove the extra ')'");
        assert!(err.is_syntax());
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("unexpected ')'"));
        assert!(output.contains("remove the extra"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.scm");
        let err: SprigError = io.into();
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("missing.scm"));
    }
}
