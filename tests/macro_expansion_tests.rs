mod common;

use common::{engine, engine_with_depth, eval_ok, expand, expand_err};
use sprig::prelude::*;

// ---
// Canonicalization of core forms
// ---

#[test]
fn two_armed_if_gains_a_nil_alternative() {
    assert_eq!(expand("(if x 1)"), vec!["(if x 1 nil)"]);
    assert_eq!(expand("(if x 1 2)"), vec!["(if x 1 2)"]);
}

#[test]
fn canonical_output_reads_back() {
    let printed = expand("(if x 1)");
    assert_eq!(expand(&printed[0]), printed);
    assert_eq!(eval_ok("(if #f 1 nil)"), "nil");
}

#[test]
fn procedure_shorthand_becomes_lambda() {
    assert_eq!(
        expand("(define (f x) (g x) x)"),
        vec!["(define f (lambda (x) (begin (g x) x)))"]
    );
    assert_eq!(expand("(define (thunk) 1)"), vec!["(define thunk (lambda () 1))"]);
}

#[test]
fn lambda_with_several_body_forms_gets_a_begin() {
    assert_eq!(
        expand("(lambda args (display args) args)"),
        vec!["(lambda args (begin (display args) args))"]
    );
}

#[test]
fn set_target_string_is_coerced_to_symbol() {
    assert_eq!(expand(r#"(set! "x" 1)"#), vec!["(set! x 1)"]);
}

#[test]
fn quote_is_left_untouched() {
    assert_eq!(expand("'(if (let) `x)"), vec!["(quote (if (let) (quasiquote x)))"]);
}

#[test]
fn empty_begin_expands_to_nothing() {
    assert!(expand("(begin)").is_empty());
    assert_eq!(expand("(if #t (begin) 1)"), vec!["(if #t nil 1)"]);
}

#[test]
fn quasiquote_builds_lists_at_runtime() {
    assert_eq!(expand("`(a ,b)"), vec!["(cons (quote a) (cons b (quote ())))"]);
    assert_eq!(expand("`(,@xs)"), vec!["(append xs (quote ()))"]);
}

#[test]
fn let_is_a_builtin_macro() {
    assert_eq!(expand("(let ((x 1) (y 2)) (+ x y))"), vec!["((lambda (x y) (+ x y)) 1 2)"]);
    assert_eq!(
        expand("(let ((x 1)) (display x) x)"),
        vec!["((lambda (x) (begin (display x) x)) 1)"]
    );
}

// ---
// User macros
// ---

#[test]
fn macro_results_are_expanded_again() {
    let src = "(define-macro unless (lambda (c x) `(if ,c #f ,x)))
               (unless #f (let ((y 5)) y))";
    assert_eq!(expand(src), vec!["(if #f #f ((lambda (y) y) 5))"]);
    assert_eq!(eval_ok(src), "5");
}

#[test]
fn macros_may_be_defined_inside_top_level_begin() {
    assert_eq!(
        eval_ok("(begin (define-macro one (lambda () 1))) (one)"),
        "1"
    );
}

#[test]
fn redefining_a_macro_replaces_it() {
    let src = "(define-macro m (lambda () 1))
               (define-macro m (lambda () 2))
               (m)";
    assert_eq!(eval_ok(src), "2");
}

#[test]
fn trace_records_each_invocation() {
    let (mut engine, _) = engine();
    let (forms, trace) = engine
        .trace_str("test", "(define-macro twice (lambda (x) `(begin ,x ,x))) (twice (let ((a 1)) a))")
        .unwrap();
    assert_eq!(forms.len(), 1);
    let names: Vec<_> = trace.iter().map(|s| s.macro_name.as_str()).collect();
    assert_eq!(names, vec!["twice", "let", "let"]);
    assert_eq!(trace[0].output.to_string(), "(begin (let ((a 1)) a) (let ((a 1)) a))");
}

// ---
// Syntax errors
// ---

fn assert_malformed(src: &str) {
    let err = expand_err(src);
    assert!(matches!(err.kind, ErrorKind::MalformedForm { .. }), "{src}: {:?}", err.kind);
    assert!(err.is_syntax());
}

#[test]
fn special_form_shapes_are_checked() {
    for src in [
        "(quote)",
        "(quote 1 2)",
        "(if 1)",
        "(if 1 2 3 4)",
        "(set! x)",
        "(set! 1 2)",
        "(define x)",
        "(define 1 2)",
        "(define x 1 2)",
        "(lambda (x))",
        "(quasiquote)",
    ] {
        assert_malformed(src);
    }
}

#[test]
fn empty_form_is_rejected() {
    assert_eq!(expand_err("()").kind, ErrorKind::EmptyForm);
    assert_eq!(expand_err("(f ())").kind, ErrorKind::EmptyForm);
}

#[test]
fn bad_parameter_lists_are_rejected() {
    let err = expand_err("(lambda (x 1) x)");
    assert!(matches!(err.kind, ErrorKind::IllegalParameterList { .. }));
    assert_eq!(err.code(), "sprig::expand::illegal_parameter_list");
    assert!(matches!(expand_err("(lambda 5 x)").kind, ErrorKind::IllegalParameterList { .. }));
}

#[test]
fn macro_must_be_a_procedure() {
    let err = expand_err("(define-macro m 5)");
    assert!(matches!(err.kind, ErrorKind::MacroNotProcedure { .. }));
}

#[test]
fn macro_outside_top_level_is_rejected_before_evaluation() {
    let (mut engine, output) = engine();
    let err = engine
        .run_str(
            "test",
            "(define f (lambda () (display \"ran\") (define-macro m (lambda () 1)) 1))",
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MacroOutsideTopLevel { .. }));
    assert!(err.is_syntax());
    assert_eq!(output.contents(), "");

    let f = engine.intern("f");
    let m = engine.intern("m");
    assert!(engine.global().lookup(&f).is_none());
    assert!(!engine.macros().contains(&m));
}

#[test]
fn splice_outside_a_list_is_rejected() {
    let err = expand_err("`,@xs");
    assert!(matches!(err.kind, ErrorKind::IllegalSplice { .. }));
}

#[test]
fn self_expanding_macro_hits_the_depth_limit() {
    let mut engine = engine_with_depth(64);
    let err = engine
        .run_str("test", "(define-macro forever (lambda () '(forever))) (forever)")
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecursionLimit { limit: 64 });
    assert_eq!(err.code(), "sprig::expand::recursion_limit");
}
