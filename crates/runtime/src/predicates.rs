//! Type-predicate builtins (§4.H, §6): `nil? true? false? zero? pos? neg?
//! number? string? symbol? keyword? list? vector? map? seq? fn?`.
//!
//! Each wraps a single `Value` predicate method from `seq-core`; kept as
//! one-line bridges rather than folded into `value.rs` so the evaluator
//! owns its own arity checking the way every other builtin here does.

use seq_core::error::{EvalError, EvalResult};
use seq_core::value::{Applier, Value};

fn unary(name: &'static str, args: &[Value]) -> EvalResult<&Value> {
    match args {
        [v] => Ok(v),
        _ => Err(EvalError::arity(name, "1", args.len())),
    }
}

macro_rules! predicate {
    ($fn_name:ident, $builtin_name:literal, $test:expr) => {
        pub fn $fn_name(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
            let v = unary($builtin_name, args)?;
            let test: fn(&Value) -> bool = $test;
            Ok(Value::Bool(test(v)))
        }
    };
}

predicate!(is_nil, "nil?", |v| v.is_nil());
predicate!(is_true, "true?", |v| matches!(v, Value::Bool(true)));
predicate!(is_false, "false?", |v| matches!(v, Value::Bool(false)));
predicate!(is_number, "number?", |v| v.is_number());
predicate!(is_string, "string?", |v| v.is_string());
predicate!(is_symbol, "symbol?", |v| v.is_symbol());
predicate!(is_keyword, "keyword?", |v| v.is_keyword());
predicate!(is_list, "list?", |v| v.is_list());
predicate!(is_vector, "vector?", |v| v.is_vector());
predicate!(is_map, "map?", |v| v.is_map());
predicate!(is_seq, "seq?", |v| matches!(v, Value::Seq(_)));
predicate!(is_fn, "fn?", |v| v.is_fn());

fn as_scaled(v: &Value) -> EvalResult<i64> {
    match v {
        Value::Int(n) => Ok(*n),
        Value::Fixed(n) => Ok(*n),
        _ => Err(EvalError::type_error("Number", v.type_name())),
    }
}

pub fn is_zero(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let v = unary("zero?", args)?;
    Ok(Value::Bool(as_scaled(v)? == 0))
}

pub fn is_pos(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let v = unary("pos?", args)?;
    Ok(Value::Bool(as_scaled(v)? > 0))
}

pub fn is_neg(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let v = unary("neg?", args)?;
    Ok(Value::Bool(as_scaled(v)? < 0))
}

pub fn not(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let v = unary("not", args)?;
    Ok(Value::Bool(!v.is_truthy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_apply(_: &Value, _: &[Value]) -> EvalResult<Value> {
        Ok(Value::Nil)
    }

    #[test]
    fn nil_and_boolean_predicates() {
        assert_eq!(is_nil(&[Value::Nil], &noop_apply).unwrap(), Value::Bool(true));
        assert_eq!(is_nil(&[Value::Int(0)], &noop_apply).unwrap(), Value::Bool(false));
        assert_eq!(is_true(&[Value::Bool(true)], &noop_apply).unwrap(), Value::Bool(true));
        assert_eq!(is_false(&[Value::Bool(true)], &noop_apply).unwrap(), Value::Bool(false));
    }

    #[test]
    fn numeric_sign_predicates() {
        assert_eq!(is_zero(&[Value::Int(0)], &noop_apply).unwrap(), Value::Bool(true));
        assert_eq!(is_pos(&[Value::Int(3)], &noop_apply).unwrap(), Value::Bool(true));
        assert_eq!(is_neg(&[Value::Fixed(-1)], &noop_apply).unwrap(), Value::Bool(true));
    }

    #[test]
    fn not_inverts_truthiness() {
        assert_eq!(not(&[Value::Nil], &noop_apply).unwrap(), Value::Bool(true));
        assert_eq!(not(&[Value::Int(0)], &noop_apply).unwrap(), Value::Bool(false));
    }

    #[test]
    fn wrong_arity_is_error() {
        assert!(is_nil(&[], &noop_apply).is_err());
        assert!(is_nil(&[Value::Nil, Value::Nil], &noop_apply).is_err());
    }

    #[test]
    fn shape_predicates_distinguish_list_from_vector() {
        assert_eq!(is_list(&[Value::Nil], &noop_apply).unwrap(), Value::Bool(true));
        assert_eq!(is_vector(&[Value::vector(vec![])], &noop_apply).unwrap(), Value::Bool(true));
        assert_eq!(is_list(&[Value::vector(vec![])], &noop_apply).unwrap(), Value::Bool(false));
    }
}
