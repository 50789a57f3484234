//! The trampolined evaluator.
//!
//! `eval` runs an explicit loop over a reassignable (expression, environment)
//! pair. The three tail positions (the chosen `if` branch, the last form of a
//! `begin`, and the body of an applied closure) reassign that pair and loop,
//! so a tail-recursive program runs in constant native stack. Everything else
//! (tests, operands, definitions) recurses and counts against the depth
//! budget of the [`EvalContext`].

use std::rc::Rc;

use crate::ast::Value;
use crate::errors::{ErrorKind, ErrorReporting, SprigResult};
use crate::runtime::{Env, EvalContext, Params, Procedure};

/// Evaluates a canonical expression in `env`.
pub fn eval(expr: &Value, env: &Env, ctx: &EvalContext) -> SprigResult<Value> {
    let _depth = ctx.enter()?;
    let kw = &ctx.keywords;
    let mut x = expr.clone();
    let mut env = env.clone();

    loop {
        let form = match &x {
            Value::Symbol(name) => {
                return env
                    .lookup(name)
                    .ok_or_else(|| ctx.unbound_variable(name.name()))
            }
            Value::List(items) => Rc::clone(items),
            _ => return Ok(x),
        };
        let Some((head, rest)) = form.split_first() else {
            return Err(ctx.report(ErrorKind::EmptyForm));
        };

        if let Value::Symbol(op) = head {
            if *op == kw.quote {
                let [datum] = rest else {
                    return Err(ctx.malformed(&x, "quote takes exactly one operand"));
                };
                return Ok(datum.clone());
            }

            if *op == kw.if_ {
                let [test, consequent, alternative] = rest else {
                    return Err(ctx.malformed(&x, "if takes a test and two branches"));
                };
                let branch = if eval(test, &env, ctx)?.is_truthy() {
                    consequent
                } else {
                    alternative
                };
                x = branch.clone();
                continue;
            }

            if *op == kw.define {
                let [Value::Symbol(name), value] = rest else {
                    return Err(ctx.malformed(&x, "can define only a symbol"));
                };
                let value = eval(value, &env, ctx)?;
                env.define(name.clone(), value);
                return Ok(Value::Nil);
            }

            if *op == kw.set {
                let [Value::Symbol(name), value] = rest else {
                    return Err(ctx.malformed(&x, "can set! only a symbol"));
                };
                let target = env.assignment_target(name);
                let value = eval(value, &env, ctx)?;
                target.define(name.clone(), value);
                return Ok(Value::Nil);
            }

            if *op == kw.lambda {
                let [params, body] = rest else {
                    return Err(ctx.malformed(&x, "lambda takes a parameter list and one body"));
                };
                let params = Params::from_value(params).ok_or_else(|| {
                    ctx.report(ErrorKind::IllegalParameterList {
                        form: x.to_string(),
                    })
                })?;
                return Ok(Value::Procedure(Rc::new(Procedure {
                    params,
                    body: body.clone(),
                    env,
                })));
            }

            if *op == kw.begin {
                let Some((last, init)) = rest.split_last() else {
                    return Ok(Value::Nil);
                };
                for step in init {
                    eval(step, &env, ctx)?;
                }
                x = last.clone();
                continue;
            }
        }

        let mut values = Vec::with_capacity(form.len());
        for item in form.iter() {
            values.push(eval(item, &env, ctx)?);
        }
        let mut values = values.into_iter();
        let operator = values.next().unwrap_or_default();
        let args: Vec<Value> = values.collect();

        match operator {
            Value::Procedure(procedure) => {
                env = Env::extend(&procedure.params, args, &procedure.env)?;
                x = procedure.body.clone();
            }
            Value::Native(native) => return (native.func)(&args, ctx),
            other => {
                return Err(ctx.report(ErrorKind::NotCallable {
                    value: other.to_string(),
                }))
            }
        }
    }
}

/// Calls `procedure` with already-evaluated arguments. Used for macro
/// expansion and by primitives that take procedures (`map`, `apply`).
pub fn apply(procedure: &Value, args: Vec<Value>, ctx: &EvalContext) -> SprigResult<Value> {
    match procedure {
        Value::Procedure(closure) => {
            let env = Env::extend(&closure.params, args, &closure.env)?;
            eval(&closure.body, &env, ctx)
        }
        Value::Native(native) => (native.func)(&args, ctx),
        other => Err(ctx.report(ErrorKind::NotCallable {
            value: other.to_string(),
        })),
    }
}
