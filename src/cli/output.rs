//! Handles all user-facing output for the CLI: the output sinks program
//! text is written through, colourised results, and expansion traces.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Value;
use crate::atoms::OutputSink;
use crate::macros::MacroExpansionStep;

// ============================================================================
// OUTPUT SINKS: OutputBuffer and StdoutSink implementations
// ============================================================================

/// Collects output into a shared string. Clones share one buffer, so a test
/// can hand a clone to the engine and read the text back afterwards.
#[derive(Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<String>>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str) {
        self.0.borrow_mut().push_str(text);
    }
}

/// Writes program output to stdout as it is produced.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Colour only when stdout is a terminal.
fn color_choice() -> ColorChoice {
    if atty::is(atty::Stream::Stdout) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Prints the value of a REPL form on its own line.
pub fn print_value(value: &Value) {
    let mut stdout = StandardStream::stdout(color_choice());
    let color = match value {
        Value::Str(_) => Color::Green,
        Value::Int(_) | Value::Float(_) | Value::Complex(_) => Color::Cyan,
        Value::Bool(_) => Color::Magenta,
        Value::Procedure(_) | Value::Native(_) => Color::Blue,
        _ => Color::White,
    };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = write!(stdout, "{value}");
    let _ = stdout.reset();
    let _ = writeln!(stdout);
}

/// Prints canonical forms, one per line.
pub fn print_forms(forms: &[Value]) {
    let mut stdout = io::stdout().lock();
    for form in forms {
        let _ = writeln!(stdout, "{form}");
    }
}

/// Prints each macro invocation as a before/after pair.
pub fn print_trace(trace: &[MacroExpansionStep]) {
    let mut stdout = StandardStream::stdout(color_choice());
    for (i, step) in trace.iter().enumerate() {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = writeln!(stdout, "--- Step {}: {} ---", i + 1, step.macro_name);
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
        let _ = writeln!(stdout, "- {}", step.input);
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
        let _ = writeln!(stdout, "+ {}", step.output);
        let _ = stdout.reset();
    }
}

/// Prints a bold heading line.
pub fn print_heading(text: &str) {
    let mut stdout = StandardStream::stdout(color_choice());
    let _ = stdout.set_color(ColorSpec::new().set_bold(true));
    let _ = writeln!(stdout, "{text}");
    let _ = stdout.reset();
}
