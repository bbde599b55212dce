//! The tree-walking evaluator (§4.F) and exception stack (§4.G).
//!
//! Dispatch on a list form checks, in order: is the head a reserved
//! special-form symbol (pointer equality against `seq_core::symbol::
//! Reserved`, never string comparison); otherwise it is a general
//! application, where the evaluated head is either a keyword (`:k
//! coll`), a map (`m k`), or an actual function.
//!
//! `recur` is implemented without growing the Rust call stack: a
//! dedicated `eval_tail` entry point threads a `Tail` result through
//! every special form whose *last* sub-form is in tail position
//! (`if`/`do`/`let`/`when`/`when-not`/`cond`/`and`/`or`); only `(recur
//! ...)` itself produces `Tail::Recur`, and only the two frames that
//! can legally catch it — a `fn` application and a `loop` — do, each via
//! its own `loop { ... }` that rebinds and restarts instead of
//! recursing. Every other call site (arguments, test expressions, `try`
//! bodies) goes through plain `eval`, which turns a `Tail::Recur`
//! reaching it into the `SyntaxError` a stray `recur` should be.

use std::rc::Rc;

use seq_core::collections::map_get;
use seq_core::error::{ErrorKind, EvalError, EvalResult};
use seq_core::namespace::Namespace;
use seq_core::pool::{autorelease, pool_depth, pool_pop, pool_push, pool_unwind_to};
use seq_core::seq;
use seq_core::symbol::{intern_unqualified, with_reserved, Symbol};
use seq_core::value::{Env, FunctionData, ListNode, Value};

use crate::exceptions::{catch_matches, error_value_to_eval_error, kind_from_keyword};

/// Result of evaluating a form that may be in tail position.
enum Tail {
    Value(Value),
    Recur(Vec<Value>),
}

/// Evaluate `form` for its value. A `recur` reaching here (i.e. not
/// caught by an enclosing `fn`/`loop`) is a syntax error.
pub fn eval(form: &Value, ns: &Namespace, env: &Env) -> EvalResult<Value> {
    match eval_tail(form, ns, env)? {
        Tail::Value(v) => Ok(v),
        Tail::Recur(_) => Err(EvalError::new(
            ErrorKind::SyntaxError,
            "can only recur from the tail position of a fn or loop",
        )),
    }
}

fn eval_tail(form: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    match form {
        Value::Symbol(sym) => Ok(Tail::Value(resolve_symbol(sym, ns, env)?)),
        Value::Vector(items) => {
            let mut evaluated = Vec::with_capacity(items.len());
            for item in items.iter() {
                evaluated.push(eval(item, ns, env)?);
            }
            Ok(Tail::Value(autorelease(Value::vector(evaluated))))
        }
        Value::Map(pairs) => {
            let mut evaluated = Vec::with_capacity(pairs.len());
            for (k, v) in pairs.iter() {
                evaluated.push((eval(k, ns, env)?, eval(v, ns, env)?));
            }
            Ok(Tail::Value(autorelease(Value::map(evaluated))))
        }
        Value::List(node) => eval_list(node, ns, env),
        // Immediates, strings, keywords, functions, seqs, and errors
        // evaluate to themselves (§4.F "self-evaluating forms").
        _ => Ok(Tail::Value(form.clone())),
    }
}

fn resolve_symbol(sym: &Symbol, ns: &Namespace, env: &Env) -> EvalResult<Value> {
    if let Some(v) = env.get(sym) {
        return Ok(v);
    }
    if let Some(v) = ns.resolve(sym) {
        return Ok(v);
    }
    Err(EvalError::symbol_unresolved(&sym.to_string()))
}

fn as_symbol(v: &Value) -> EvalResult<Symbol> {
    match v {
        Value::Symbol(s) => Ok(s.clone()),
        other => Err(EvalError::type_error("Symbol", other.type_name())),
    }
}

fn eval_list(node: &ListNode, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    if let Value::Symbol(sym) = &node.first {
        if let Some(tail) = dispatch_special_form(sym, &node.rest, ns, env)? {
            return Ok(tail);
        }
    }
    let f = eval(&node.first, ns, env)?;
    let args = eval_args(&node.rest, ns, env)?;
    Ok(Tail::Value(autorelease(apply(&f, &args, ns)?)))
}

fn eval_args(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Vec<Value>> {
    let forms = seq::collect(rest)?;
    let mut args = Vec::with_capacity(forms.len());
    for f in &forms {
        args.push(eval(f, ns, env)?);
    }
    Ok(args)
}

/// Evaluate a body (a `fn`/`let`/`loop` form's trailing forms): every
/// form but the last for effect, the last in tail position.
fn eval_body_tail(body: &[Value], ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    match body.split_last() {
        None => Ok(Tail::Value(Value::Nil)),
        Some((last, init)) => {
            for f in init {
                eval(f, ns, env)?;
            }
            eval_tail(last, ns, env)
        }
    }
}

/// Invoke `f` on already-evaluated `args`. Shared by general
/// application, `apply`, and every higher-order builtin through the
/// `Applier` callback.
pub fn apply(f: &Value, args: &[Value], ns: &Namespace) -> EvalResult<Value> {
    match f {
        Value::Keyword(_) => call_as_get(f, args),
        Value::Map(_) => call_as_get(f, args),
        Value::Native(native) => {
            check_arity(native.name, native.min_arity, native.max_arity, args.len())?;
            let ns_for_applier = ns.clone();
            let applier = move |callee: &Value, callee_args: &[Value]| apply(callee, callee_args, &ns_for_applier);
            (native.func)(args, &applier)
        }
        Value::Function(func) => apply_closure(func, args.to_vec()),
        other => Err(EvalError::not_a_function(other.type_name())),
    }
}

/// `(:k coll)` / `(:k coll default)` and `(m k)` / `(m k default)` —
/// keyword-as-function and map-as-function sugar (§4.F).
fn call_as_get(head: &Value, args: &[Value]) -> EvalResult<Value> {
    let (coll, key) = match head {
        Value::Keyword(_) => match args {
            [coll] | [coll, _] => (coll, head),
            _ => return Err(EvalError::arity("keyword-as-fn", "1 or 2", args.len())),
        },
        Value::Map(_) => match args {
            [key] | [key, _] => (head, key),
            _ => return Err(EvalError::arity("map-as-fn", "1 or 2", args.len())),
        },
        _ => unreachable!("call_as_get only called with Keyword or Map heads"),
    };
    let found = map_get(coll, key)?;
    match (found.is_nil(), args.get(1)) {
        (true, Some(default)) => Ok(default.clone()),
        _ => Ok(found),
    }
}

fn check_arity(name: &str, min: usize, max: Option<usize>, got: usize) -> EvalResult<()> {
    let ok = got >= min && max.is_none_or(|m| got <= m);
    if ok {
        return Ok(());
    }
    let expected = match max {
        Some(m) if m == min => format!("{min}"),
        Some(m) => format!("{min}..={m}"),
        None => format!("at least {min}"),
    };
    Err(EvalError::arity(name, &expected, got))
}

/// Apply a user closure, restarting in place on `recur` instead of
/// recursing (§4.F TCO, §3 "Lifecycle" pool bracketing per invocation).
fn apply_closure(func: &Rc<FunctionData>, mut args: Vec<Value>) -> EvalResult<Value> {
    loop {
        check_arity(
            func.name.as_ref().map(Symbol::name).unwrap_or("fn"),
            func.arity(),
            Some(func.arity()),
            args.len(),
        )?;
        let bindings: Vec<(Symbol, Value)> = func.params.iter().cloned().zip(args.iter().cloned()).collect();
        let call_env = func.env.extend(bindings);
        pool_push();
        let result = eval_body_tail(&func.body, &func.defining_ns, &call_env);
        match result {
            Ok(Tail::Value(v)) => {
                pool_pop();
                return Ok(v);
            }
            Ok(Tail::Recur(new_args)) => {
                pool_pop();
                args = new_args;
                continue;
            }
            Err(e) => {
                pool_pop();
                return Err(e);
            }
        }
    }
}

fn dispatch_special_form(sym: &Symbol, rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Option<Tail>> {
    with_reserved(|r| -> EvalResult<Option<Tail>> {
        if Symbol::ptr_eq(sym, &r.quote) {
            let forms = seq::collect(rest)?;
            return match forms.as_slice() {
                [x] => Ok(Some(Tail::Value(x.clone()))),
                _ => Err(EvalError::arity("quote", "1", forms.len())),
            };
        }
        if Symbol::ptr_eq(sym, &r.if_) {
            return eval_if(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.do_) {
            let forms = seq::collect(rest)?;
            return eval_body_tail(&forms, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.def) {
            return eval_def(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.fn_) {
            return eval_fn(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.let_) {
            return eval_let(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.loop_) {
            return eval_loop(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.recur) {
            let args = eval_args(rest, ns, env)?;
            return Ok(Some(Tail::Recur(args)));
        }
        if Symbol::ptr_eq(sym, &r.try_) {
            return eval_try(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.throw) {
            return eval_throw(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.and) {
            return eval_and(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.or) {
            return eval_or(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.ns) {
            return eval_ns(rest).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.when) {
            return eval_when(rest, ns, env, true).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.when_not) {
            return eval_when(rest, ns, env, false).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.cond) {
            return eval_cond(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.doseq) {
            return eval_doseq(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.dotimes) {
            return eval_dotimes(rest, ns, env).map(Some);
        }
        if Symbol::ptr_eq(sym, &r.for_) {
            return eval_for(rest, ns, env).map(Some);
        }
        // `catch`/`finally` are only meaningful as clauses parsed by
        // `eval_try`; seeing one as a standalone form is a syntax error.
        if Symbol::ptr_eq(sym, &r.catch) || Symbol::ptr_eq(sym, &r.finally) {
            return Err(EvalError::new(
                ErrorKind::SyntaxError,
                format!("{sym} can only appear inside try"),
            ));
        }
        Ok(None)
    })
}

fn eval_if(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let (test, then, els) = match forms.as_slice() {
        [test, then] => (test, then, None),
        [test, then, els] => (test, then, Some(els)),
        _ => return Err(EvalError::arity("if", "2 or 3", forms.len())),
    };
    if eval(test, ns, env)?.is_truthy() {
        eval_tail(then, ns, env)
    } else {
        match els {
            Some(els) => eval_tail(els, ns, env),
            None => Ok(Tail::Value(Value::Nil)),
        }
    }
}

fn eval_def(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let (name_form, value_form) = match forms.as_slice() {
        [name] => (name, None),
        [name, value] => (name, Some(value)),
        _ => return Err(EvalError::arity("def", "1 or 2", forms.len())),
    };
    let sym = as_symbol(name_form)?;
    if seq_core::symbol::is_reserved_name(sym.name()) {
        return Err(EvalError::new(
            ErrorKind::SyntaxError,
            format!("{} is a reserved name and cannot be redefined", sym.name()),
        ));
    }
    let value = match value_form {
        Some(f) => eval(f, ns, env)?,
        None => Value::Nil,
    };
    ns.define(sym.clone(), value);
    Ok(Tail::Value(Value::Symbol(sym)))
}

fn params_from_vector(v: &Value) -> EvalResult<Vec<Symbol>> {
    match v {
        Value::Vector(items) => items.iter().map(as_symbol).collect(),
        other => Err(EvalError::type_error("parameter Vector", other.type_name())),
    }
}

fn eval_fn(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let (name, params_form, body) = match forms.split_first() {
        Some((Value::Symbol(s), tail)) => match tail.split_first() {
            Some((params, body)) => (Some(s.clone()), params, body),
            None => return Err(EvalError::arity("fn", "at least 2", forms.len())),
        },
        Some((params, body)) => (None, params, body),
        None => return Err(EvalError::arity("fn", "at least 1", 0)),
    };
    let params = params_from_vector(params_form)?;
    Ok(Tail::Value(Value::Function(Rc::new(FunctionData {
        name,
        params,
        body: Rc::from(body),
        env: env.clone(),
        defining_ns: ns.clone(),
    }))))
}

fn eval_let(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let (bindings_form, body) = forms
        .split_first()
        .ok_or_else(|| EvalError::arity("let", "at least 1", 0))?;
    let new_env = bind_pairs(bindings_form, ns, env)?;
    eval_body_tail(body, ns, &new_env)
}

/// Evaluate a `[sym1 val1 sym2 val2 ...]` binding vector sequentially,
/// each binding visible to the next (§4.F "let" semantics).
fn bind_pairs(bindings_form: &Value, ns: &Namespace, env: &Env) -> EvalResult<Env> {
    let items = match bindings_form {
        Value::Vector(items) => items,
        other => return Err(EvalError::type_error("binding Vector", other.type_name())),
    };
    if items.len() % 2 != 0 {
        return Err(EvalError::new(
            ErrorKind::SyntaxError,
            "binding vector requires an even number of forms",
        ));
    }
    let mut current = env.clone();
    for pair in items.chunks_exact(2) {
        let sym = as_symbol(&pair[0])?;
        let value = eval(&pair[1], ns, &current)?;
        current = current.extend(vec![(sym, value)]);
    }
    Ok(current)
}

fn eval_loop(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let (bindings_form, body) = forms
        .split_first()
        .ok_or_else(|| EvalError::arity("loop", "at least 1", 0))?;
    let items = match bindings_form {
        Value::Vector(items) => items,
        other => return Err(EvalError::type_error("binding Vector", other.type_name())),
    };
    if items.len() % 2 != 0 {
        return Err(EvalError::new(
            ErrorKind::SyntaxError,
            "binding vector requires an even number of forms",
        ));
    }
    let mut params = Vec::with_capacity(items.len() / 2);
    let mut vals = Vec::with_capacity(items.len() / 2);
    let mut seed_env = env.clone();
    for pair in items.chunks_exact(2) {
        let sym = as_symbol(&pair[0])?;
        let value = eval(&pair[1], ns, &seed_env)?;
        seed_env = seed_env.extend(vec![(sym.clone(), value.clone())]);
        params.push(sym);
        vals.push(value);
    }
    loop {
        let call_env = env.extend(params.iter().cloned().zip(vals.iter().cloned()).collect());
        match eval_body_tail(body, ns, &call_env)? {
            Tail::Value(v) => return Ok(Tail::Value(v)),
            Tail::Recur(new_vals) => {
                if new_vals.len() != params.len() {
                    return Err(EvalError::arity("recur", &params.len().to_string(), new_vals.len()));
                }
                vals = new_vals;
            }
        }
    }
}

/// Parse the `[sym coll-expr]` single-binding vector `for`/`doseq`/
/// `dotimes` share (§6 "iteration"), evaluating `coll-expr` once in `env`.
fn single_binding(rest: &Value, form_name: &str, ns: &Namespace, env: &Env) -> EvalResult<(Symbol, Value, Vec<Value>)> {
    let forms = seq::collect(rest)?;
    let (bindings_form, body) = forms
        .split_first()
        .ok_or_else(|| EvalError::arity(form_name, "at least 1", 0))?;
    let pair = match bindings_form {
        Value::Vector(items) if items.len() == 2 => items,
        other => return Err(EvalError::type_error("a 2-element binding Vector", other.type_name())),
    };
    let sym = as_symbol(&pair[0])?;
    let source = eval(&pair[1], ns, env)?;
    Ok((sym, source, body.to_vec()))
}

/// `(doseq [x coll] body...)`: evaluate `body` for effect once per
/// element of `coll`. Always returns `nil`.
fn eval_doseq(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let (sym, coll, body) = single_binding(rest, "doseq", ns, env)?;
    for item in seq::collect(&coll)? {
        let iter_env = env.extend(vec![(sym.clone(), item)]);
        for f in &body {
            eval(f, ns, &iter_env)?;
        }
    }
    Ok(Tail::Value(Value::Nil))
}

/// `(dotimes [i n] body...)`: evaluate `body` for effect with `i` bound
/// to `0, 1, ..., n - 1`. Always returns `nil`.
fn eval_dotimes(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let (sym, n, body) = single_binding(rest, "dotimes", ns, env)?;
    let n = match n {
        Value::Int(n) => n,
        other => return Err(EvalError::type_error("Integer", other.type_name())),
    };
    for i in 0..n.max(0) {
        let iter_env = env.extend(vec![(sym.clone(), Value::Int(i))]);
        for f in &body {
            eval(f, ns, &iter_env)?;
        }
    }
    Ok(Tail::Value(Value::Nil))
}

/// `(for [x coll] expr...)`: a list of `expr`'s value for each element of
/// `coll` (eager, not a lazy seq — §9 non-goal rules out laziness
/// machinery this embedded target has no use for).
fn eval_for(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let (sym, coll, body) = single_binding(rest, "for", ns, env)?;
    let last = body.last().cloned().unwrap_or(Value::Nil);
    let init = if body.is_empty() { &[][..] } else { &body[..body.len() - 1] };
    let mut results = Vec::new();
    for item in seq::collect(&coll)? {
        let iter_env = env.extend(vec![(sym.clone(), item)]);
        for f in init {
            eval(f, ns, &iter_env)?;
        }
        results.push(eval(&last, ns, &iter_env)?);
    }
    Ok(Tail::Value(results.into_iter().rev().fold(Value::Nil, |acc, v| Value::cons(v, acc))))
}

struct CatchClause {
    type_name: String,
    binding: Symbol,
    body: Vec<Value>,
}

fn eval_try(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let mut body = Vec::new();
    let mut clauses = Vec::new();
    let mut finally_body: Option<Vec<Value>> = None;
    for form in &forms {
        if let Value::List(node) = form {
            if let Value::Symbol(head) = &node.first {
                let is_catch = with_reserved(|r| Symbol::ptr_eq(head, &r.catch));
                let is_finally = with_reserved(|r| Symbol::ptr_eq(head, &r.finally));
                if is_catch {
                    clauses.push(parse_catch_clause(&node.rest)?);
                    continue;
                }
                if is_finally {
                    finally_body = Some(seq::collect(&node.rest)?);
                    continue;
                }
            }
        }
        if !clauses.is_empty() || finally_body.is_some() {
            return Err(EvalError::new(
                ErrorKind::SyntaxError,
                "try body forms must precede all catch/finally clauses",
            ));
        }
        body.push(form.clone());
    }

    let marker = pool_depth();
    pool_push();
    let mut result = (|| -> EvalResult<Value> {
        let mut last = Value::Nil;
        for f in &body {
            last = eval(f, ns, env)?;
        }
        Ok(last)
    })();

    if let Err(e) = &result {
        pool_unwind_to(marker);
        pool_push();
        for clause in &clauses {
            if catch_matches(&clause.type_name, e.kind) {
                let handler_env = env.extend(vec![(clause.binding.clone(), Value::error(e.clone()))]);
                result = (|| -> EvalResult<Value> {
                    let mut last = Value::Nil;
                    for f in &clause.body {
                        last = eval(f, ns, &handler_env)?;
                    }
                    Ok(last)
                })();
                break;
            }
        }
    }
    pool_pop();

    if let Some(fb) = &finally_body {
        for f in fb {
            eval(f, ns, env)?;
        }
    }
    result.map(Tail::Value)
}

fn parse_catch_clause(rest: &Value) -> EvalResult<CatchClause> {
    let forms = seq::collect(rest)?;
    let (type_form, binding_form, body) = match forms.split_first() {
        Some((t, tail)) => match tail.split_first() {
            Some((b, body)) => (t, b, body),
            None => return Err(EvalError::arity("catch", "at least 2", forms.len())),
        },
        None => return Err(EvalError::arity("catch", "at least 2", 0)),
    };
    let type_name = as_symbol(type_form)?.name().to_string();
    let binding = as_symbol(binding_form)?;
    Ok(CatchClause {
        type_name,
        binding,
        body: body.to_vec(),
    })
}

fn eval_throw(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let thrown = match forms.as_slice() {
        [x] => eval(x, ns, env)?,
        _ => return Err(EvalError::arity("throw", "1", forms.len())),
    };
    match thrown {
        Value::Error(e) => Err(error_value_to_eval_error(&e)),
        other => Err(EvalError::type_error("Error (see the `error` builtin)", other.type_name())),
    }
}

/// `(error kind-keyword message)`, the constructor `throw` expects.
pub fn error_ctor(args: &[Value], _apply: &seq_core::value::Applier) -> EvalResult<Value> {
    let (kind_kw, message) = match args {
        [kind, message] => (kind, message),
        _ => return Err(EvalError::arity("error", "2", args.len())),
    };
    let kind = match kind_kw {
        Value::Keyword(name) => kind_from_keyword(name),
        other => return Err(EvalError::type_error("Keyword", other.type_name())),
    };
    let message = match message {
        Value::String(s) => s.to_string(),
        other => return Err(EvalError::type_error("String", other.type_name())),
    };
    Ok(Value::error(EvalError::new(kind, message)))
}

fn eval_and(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    match forms.split_last() {
        None => Ok(Tail::Value(Value::Bool(true))),
        Some((last, init)) => {
            for f in init {
                let v = eval(f, ns, env)?;
                if !v.is_truthy() {
                    return Ok(Tail::Value(v));
                }
            }
            eval_tail(last, ns, env)
        }
    }
}

fn eval_or(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    match forms.split_last() {
        None => Ok(Tail::Value(Value::Nil)),
        Some((last, init)) => {
            for f in init {
                let v = eval(f, ns, env)?;
                if v.is_truthy() {
                    return Ok(Tail::Value(v));
                }
            }
            eval_tail(last, ns, env)
        }
    }
}

/// `(ns name)` ensures the namespace exists and returns it as a symbol.
/// Switching the *current* namespace for subsequent top-level forms is a
/// host-level operation (`InterpreterState::set_ns`, §6's own API
/// surface), not something an in-language form mutates mid-evaluation.
fn eval_ns(rest: &Value) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let sym = match forms.as_slice() {
        [name] => as_symbol(name)?,
        _ => return Err(EvalError::arity("ns", "1", forms.len())),
    };
    seq_core::namespace::ns_get_or_create(sym.name());
    Ok(Tail::Value(Value::Symbol(sym)))
}

fn eval_when(rest: &Value, ns: &Namespace, env: &Env, polarity: bool) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    let (test, body) = forms
        .split_first()
        .ok_or_else(|| EvalError::arity(if polarity { "when" } else { "when-not" }, "at least 1", 0))?;
    if eval(test, ns, env)?.is_truthy() == polarity {
        eval_body_tail(body, ns, env)
    } else {
        Ok(Tail::Value(Value::Nil))
    }
}

fn eval_cond(rest: &Value, ns: &Namespace, env: &Env) -> EvalResult<Tail> {
    let forms = seq::collect(rest)?;
    if forms.len() % 2 != 0 {
        return Err(EvalError::new(ErrorKind::SyntaxError, "cond requires an even number of test/expr forms"));
    }
    for pair in forms.chunks_exact(2) {
        if eval(&pair[0], ns, env)?.is_truthy() {
            return eval_tail(&pair[1], ns, env);
        }
    }
    Ok(Tail::Value(Value::Nil))
}

/// A fresh, empty `user` namespace and environment for one-off tests.
#[cfg(test)]
fn test_ns() -> Namespace {
    seq_core::namespace::reset_registry();
    seq_core::namespace::ns_get_or_create("user")
}
