//! # External Interface
//!
//! Atoms with side effects. All output goes through the session's
//! [`OutputSink`](crate::atoms::OutputSink), never straight to stdout.

use crate::ast::Value;
use crate::atoms::helpers::{require_arity, unary, AtomResult};
use crate::atoms::AtomRegistry;
use crate::runtime::EvalContext;

/// Writes a value without a trailing newline. Strings are written raw,
/// everything else in its printed form.
///
/// Usage: (display <value>)
///
/// Example:
///   (display "hi") ; prints hi
pub fn atom_display(args: &[Value], context: &EvalContext) -> AtomResult {
    match unary(args)? {
        Value::Str(text) => context.output.emit(text),
        other => context.output.emit(&other.to_string()),
    }
    Ok(Value::Nil)
}

/// Usage: (newline)
pub fn atom_newline(args: &[Value], context: &EvalContext) -> AtomResult {
    require_arity(args, 0)?;
    context.output.emit("\n");
    Ok(Value::Nil)
}

pub fn register_external_atoms(registry: &mut AtomRegistry) {
    registry.register("display", atom_display);
    registry.register("newline", atom_newline);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::atoms::{OutputSink, SharedOutput};
    use crate::syntax::{Keywords, SymbolTable};

    struct Capture(Rc<RefCell<String>>);

    impl OutputSink for Capture {
        fn emit(&mut self, text: &str) {
            self.0.borrow_mut().push_str(text);
        }
    }

    #[test]
    fn display_writes_through_the_sink() {
        let captured = Rc::new(RefCell::new(String::new()));
        let mut symbols = SymbolTable::new();
        let ctx = EvalContext::new(
            Keywords::new(&mut symbols),
            SharedOutput::new(Capture(Rc::clone(&captured))),
            100,
        );
        atom_display(&[Value::string("hi")], &ctx).unwrap();
        atom_display(&[Value::list(vec![Value::Int(1), Value::string("s")])], &ctx).unwrap();
        atom_newline(&[], &ctx).unwrap();
        assert_eq!(captured.borrow().as_str(), "hi(1 \"s\")\n");
        assert!(atom_newline(&[Value::Nil], &ctx).is_err());
    }
}
