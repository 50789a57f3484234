//! Standard macros registered in every session.

use crate::ast::Value;
use crate::errors::{ErrorKind, ErrorReporting, Phase, SprigResult};
use crate::macros::MacroTable;
use crate::syntax::{Keywords, Symbol};

pub fn register_std_macros(table: &mut MacroTable, keywords: &Keywords) {
    table.register(keywords.let_.clone(), expand_let);
}

/// `(let ((v1 e1) (v2 e2) ...) body...)` => `((lambda (v1 v2 ...) body...) e1 e2 ...)`
pub fn expand_let(form: &Value, keywords: &Keywords) -> SprigResult<Value> {
    let Some([_, bindings, body @ ..]) = form.as_list() else {
        return Err(Phase::Expand.malformed(form, "let requires a binding list and a body"));
    };
    if body.is_empty() {
        return Err(Phase::Expand.malformed(form, "let requires a body"));
    }
    let illegal = || {
        Phase::Expand.report(ErrorKind::IllegalBindingList {
            form: form.to_string(),
        })
    };

    let pairs = match bindings.as_list() {
        Some(pairs) if !pairs.is_empty() => pairs,
        _ => return Err(illegal()),
    };
    let mut names = Vec::with_capacity(pairs.len());
    let mut inits = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let Some([Value::Symbol(name), init]) = pair.as_list() else {
            return Err(illegal());
        };
        names.push(Value::Symbol(Symbol::clone(name)));
        inits.push(init.clone());
    }

    let mut lambda = vec![Value::Symbol(keywords.lambda.clone()), Value::list(names)];
    lambda.extend_from_slice(body);

    let mut call = vec![Value::list(lambda)];
    call.extend(inits);
    Ok(Value::list(call))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::reader::Reader;
    use crate::syntax::tokens::TokenStream;
    use crate::syntax::SymbolTable;

    fn rewrite(text: &str) -> SprigResult<String> {
        let mut symbols = SymbolTable::new();
        let keywords = Keywords::new(&mut symbols);
        let mut stream = TokenStream::from_str("test", text);
        let form = Reader::new(&mut symbols, &keywords).read(&mut stream)?.unwrap_or_default();
        expand_let(&form, &keywords).map(|v| v.to_string())
    }

    #[test]
    fn let_becomes_an_immediate_lambda() {
        assert_eq!(
            rewrite("(let ((x 1) (y 2)) (display x) (+ x y))").unwrap(),
            "((lambda (x y) (display x) (+ x y)) 1 2)"
        );
    }

    #[test]
    fn let_rejects_bad_bindings() {
        for text in ["(let () 1)", "(let x 1)", "(let ((1 2)) 1)", "(let ((x)) x)", "(let ((x 1 2)) x)"] {
            let err = rewrite(text).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::IllegalBindingList { .. }), "{text}");
        }
        let err = rewrite("(let ((x 1)))").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedForm { .. }));
    }
}
