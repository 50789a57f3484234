//! The syntax expander: raw reader output in, canonical core forms out.
//!
//! `expand` returns `None` for forms that declare rather than compute (a
//! top-level `define-macro`, an empty `begin`). Wherever such a form sits in
//! a value position it is replaced by nil.

use crate::ast::Value;
use crate::errors::{ErrorKind, ErrorReporting, Phase, SprigError, SprigResult};
use crate::macros::{expand_quasiquote, MacroDef, MacroExpansionStep, MacroTable};
use crate::runtime::{apply, eval, Env, EvalContext, Params};
use crate::syntax::{Keywords, Symbol, SymbolTable};

pub struct Expander<'a> {
    symbols: &'a mut SymbolTable,
    macros: &'a mut MacroTable,
    global: &'a Env,
    context: &'a EvalContext,
    trace: Option<&'a mut Vec<MacroExpansionStep>>,
    depth: usize,
}

impl ErrorReporting for Expander<'_> {
    fn report(&self, kind: ErrorKind) -> SprigError {
        SprigError::new(kind, Phase::Expand)
    }
}

impl<'a> Expander<'a> {
    pub fn new(
        symbols: &'a mut SymbolTable,
        macros: &'a mut MacroTable,
        global: &'a Env,
        context: &'a EvalContext,
    ) -> Self {
        Self {
            symbols,
            macros,
            global,
            context,
            trace: None,
            depth: 0,
        }
    }

    /// Records every macro invocation into `trace`.
    pub fn with_trace(mut self, trace: &'a mut Vec<MacroExpansionStep>) -> Self {
        self.trace = Some(trace);
        self
    }

    /// Expands one form. `at_top_level` is true for forms read directly from
    /// the input and for the operands of a top-level `begin`.
    pub fn expand(&mut self, form: &Value, at_top_level: bool) -> SprigResult<Option<Value>> {
        if self.depth >= self.context.max_depth {
            return Err(self
                .report(ErrorKind::RecursionLimit {
                    limit: self.context.max_depth,
                })
                .with_help("a macro may be expanding into itself"));
        }
        self.depth += 1;
        let result = self.expand_form(form, at_top_level);
        self.depth -= 1;
        result
    }

    /// Expands a form in a value position, where "nothing" reads as nil.
    fn expand_value(&mut self, form: &Value) -> SprigResult<Value> {
        Ok(self.expand(form, false)?.unwrap_or_default())
    }

    fn expand_all(&mut self, forms: &[Value]) -> SprigResult<Vec<Value>> {
        forms.iter().map(|form| self.expand_value(form)).collect()
    }

    fn expand_form(&mut self, x: &Value, top: bool) -> SprigResult<Option<Value>> {
        let Value::List(items) = x else {
            return Ok(Some(x.clone()));
        };
        let Some(Value::Symbol(op)) = items.first() else {
            if items.is_empty() {
                return Err(self.report(ErrorKind::EmptyForm));
            }
            return self.expand_all(items).map(|v| Some(Value::list(v)));
        };
        let context = self.context;
        let kw: &Keywords = &context.keywords;

        if *op == kw.quote {
            if items.len() != 2 {
                return Err(self.malformed(x, "quote takes exactly one operand"));
            }
            return Ok(Some(x.clone()));
        }

        if *op == kw.if_ {
            let mut parts = items.to_vec();
            if parts.len() == 3 {
                parts.push(Value::Nil);
            }
            if parts.len() != 4 {
                return Err(self.malformed(x, "if takes a test and one or two branches"));
            }
            let mut expanded = vec![parts[0].clone()];
            expanded.extend(self.expand_all(&parts[1..])?);
            return Ok(Some(Value::list(expanded)));
        }

        if *op == kw.set {
            let [head, target, value] = &items[..] else {
                return Err(self.malformed(x, "set! takes a target and a value"));
            };
            let target = match target {
                Value::Symbol(name) => name.clone(),
                Value::Str(name) => self.symbols.intern(name),
                _ => return Err(self.malformed(x, "can set! only a symbol")),
            };
            let value = self.expand_value(value)?;
            return Ok(Some(Value::list(vec![head.clone(), Value::Symbol(target), value])));
        }

        if *op == kw.define || *op == kw.define_macro {
            return self.expand_definition(x, items, top);
        }

        if *op == kw.begin {
            if items.len() == 1 {
                return Ok(None);
            }
            let mut expanded = vec![items[0].clone()];
            for step in &items[1..] {
                expanded.push(self.expand(step, top)?.unwrap_or_default());
            }
            return Ok(Some(Value::list(expanded)));
        }

        if *op == kw.lambda {
            let [head, params, body @ ..] = &items[..] else {
                return Err(self.malformed(x, "lambda takes a parameter list and a body"));
            };
            if body.is_empty() {
                return Err(self.malformed(x, "lambda takes a parameter list and a body"));
            }
            if Params::from_value(params).is_none() {
                return Err(self.report(ErrorKind::IllegalParameterList {
                    form: x.to_string(),
                }));
            }
            let body = match body {
                [single] => single.clone(),
                many => {
                    let mut wrapped = vec![Value::Symbol(kw.begin.clone())];
                    wrapped.extend_from_slice(many);
                    Value::list(wrapped)
                }
            };
            let body = self.expand_value(&body)?;
            return Ok(Some(Value::list(vec![head.clone(), params.clone(), body])));
        }

        if *op == kw.quasiquote {
            let [_, template] = &items[..] else {
                return Err(self.malformed(x, "quasiquote takes exactly one operand"));
            };
            let code = expand_quasiquote(template, kw)?;
            return self.expand(&code, false);
        }

        if let Some(def) = self.macros.lookup(op).cloned() {
            let output = match def {
                MacroDef::Builtin(rewrite) => rewrite(x, kw)?,
                MacroDef::Procedure(procedure) => {
                    apply(&procedure, items[1..].to_vec(), self.context)?
                }
            };
            if let Some(trace) = self.trace.as_deref_mut() {
                trace.push(MacroExpansionStep {
                    macro_name: op.name().to_string(),
                    input: x.clone(),
                    output: output.clone(),
                });
            }
            return self.expand(&output, top);
        }

        self.expand_all(items).map(|v| Some(Value::list(v)))
    }

    /// `define` and `define-macro`, including the `(define (f args...) body...)`
    /// shorthand.
    fn expand_definition(&mut self, x: &Value, items: &[Value], top: bool) -> SprigResult<Option<Value>> {
        let context = self.context;
        let kw = &context.keywords;
        let [head, target, rest @ ..] = items else {
            return Err(self.malformed(x, "definition requires a target and a value"));
        };
        if rest.is_empty() {
            return Err(self.malformed(x, "definition requires a target and a value"));
        }

        if let Some([name, params @ ..]) = target.as_list() {
            let mut lambda = vec![Value::Symbol(kw.lambda.clone()), Value::list(params.to_vec())];
            lambda.extend_from_slice(rest);
            let rewritten = Value::list(vec![head.clone(), name.clone(), Value::list(lambda)]);
            return self.expand(&rewritten, top);
        }

        let [value] = rest else {
            return Err(self.malformed(x, "definition takes exactly one value"));
        };
        let Value::Symbol(name) = target else {
            return Err(self.malformed(x, "can define only a symbol"));
        };
        let is_macro = head.as_symbol() == Some(&kw.define_macro);
        let value = self.expand_value(value)?;

        if !is_macro {
            return Ok(Some(Value::list(vec![head.clone(), target.clone(), value])));
        }
        if !top {
            return Err(self
                .report(ErrorKind::MacroOutsideTopLevel {
                    form: x.to_string(),
                })
                .with_help("macros may only be defined at the top level"));
        }
        self.register_macro(x, name, &value)?;
        Ok(None)
    }

    fn register_macro(&mut self, x: &Value, name: &Symbol, code: &Value) -> SprigResult<()> {
        let procedure = eval(code, self.global, self.context)?;
        if !procedure.is_callable() {
            return Err(self.report(ErrorKind::MacroNotProcedure {
                form: x.to_string(),
            }));
        }
        self.macros.define(name.clone(), procedure);
        Ok(())
    }
}
