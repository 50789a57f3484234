//! Quasiquote templates become ordinary code that builds the list at
//! evaluation time out of `quote`, `cons`, and `append` calls.
//!
//! ```text
//! `(a ,x ,@ys b)  =>  (cons (quote a) (cons x (append ys (cons (quote b) (quote ())))))
//! ```

use crate::ast::Value;
use crate::errors::{ErrorKind, ErrorReporting, Phase, SprigResult};
use crate::syntax::Keywords;

/// Rewrites the operand of a `quasiquote` form.
pub fn expand_quasiquote(template: &Value, keywords: &Keywords) -> SprigResult<Value> {
    let items = match template.as_list() {
        Some(items) if !items.is_empty() => items,
        _ => return Ok(quoted(template.clone(), keywords)),
    };
    let head = &items[0];

    if head.as_symbol() == Some(&keywords.unquote_splicing) {
        return Err(Phase::Expand.report(ErrorKind::IllegalSplice {
            form: template.to_string(),
        }));
    }

    if head.as_symbol() == Some(&keywords.unquote) {
        let [_, expr] = items else {
            return Err(Phase::Expand.malformed(template, "unquote takes exactly one operand"));
        };
        return Ok(expr.clone());
    }

    let tail = expand_quasiquote(&Value::list(items[1..].to_vec()), keywords)?;

    if head.is_form(&keywords.unquote_splicing) {
        let Some([_, spliced]) = head.as_list() else {
            return Err(Phase::Expand.malformed(head, "unquote-splicing takes exactly one operand"));
        };
        return Ok(Value::list(vec![
            Value::Symbol(keywords.append.clone()),
            spliced.clone(),
            tail,
        ]));
    }

    Ok(Value::list(vec![
        Value::Symbol(keywords.cons.clone()),
        expand_quasiquote(head, keywords)?,
        tail,
    ]))
}

fn quoted(datum: Value, keywords: &Keywords) -> Value {
    Value::list(vec![Value::Symbol(keywords.quote.clone()), datum])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::reader::Reader;
    use crate::syntax::tokens::TokenStream;
    use crate::syntax::SymbolTable;

    fn expand(text: &str) -> SprigResult<String> {
        let mut symbols = SymbolTable::new();
        let keywords = Keywords::new(&mut symbols);
        let mut stream = TokenStream::from_str("test", text);
        let form = Reader::new(&mut symbols, &keywords).read(&mut stream)?.unwrap_or_default();
        // Strip the outer (quasiquote x).
        let template = form.as_list().map(|items| items[1].clone()).unwrap_or_default();
        expand_quasiquote(&template, &keywords).map(|v| v.to_string())
    }

    #[test]
    fn atoms_are_quoted() {
        assert_eq!(expand("`a").unwrap(), "(quote a)");
        assert_eq!(expand("`()").unwrap(), "(quote ())");
    }

    #[test]
    fn unquote_and_splice() {
        assert_eq!(expand("`,x").unwrap(), "x");
        assert_eq!(
            expand("`(a ,x ,@ys)").unwrap(),
            "(cons (quote a) (cons x (append ys (quote ()))))"
        );
    }

    #[test]
    fn splice_at_template_top_is_illegal() {
        let err = expand("`,@xs").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IllegalSplice { .. }));
        assert!(err.is_syntax());
    }

    #[test]
    fn unquote_arity_is_checked() {
        let err = expand("`(a (unquote x y))").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedForm { .. }));
    }
}
