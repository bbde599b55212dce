//! Arithmetic, comparison, and equality builtins (§4.H): variadic
//! `+ - * / = < > <= >=` with `Int`/`Fixed` numeric promotion.
//!
//! Grounded on the teacher's `arithmetic.rs` (`patch_seq_add` et al.):
//! same pairwise-op-over-two-values shape, reworked to fold over a
//! `&[Value]` argument slice (the evaluator's calling convention, §9
//! "Variadic dispatch … expressed as a function taking an argument
//! slice") instead of popping a `Stack`, and to raise `ArithmeticError`
//! on overflow (`checked_*`) rather than wrapping — the teacher's
//! wrapping semantics fit a Forth-like VM with no exception mechanism;
//! this evaluator has one (§4.G), so §4.H's "else raises ArithmeticError"
//! is the one to honor.

use seq_core::equality::clj_equal;
use seq_core::error::{EvalError, EvalResult};
use seq_core::value::{Applier, Value, FIXED_SCALE};

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Fixed(i64),
}

impl Num {
    fn from_value(v: &Value) -> EvalResult<Num> {
        match v {
            Value::Int(n) => Ok(Num::Int(*n)),
            Value::Fixed(n) => Ok(Num::Fixed(*n)),
            _ => Err(EvalError::type_error("Number", v.type_name())),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Num::Int(n) => Value::Int(n),
            Num::Fixed(n) => Value::Fixed(n),
        }
    }
}

fn overflow() -> EvalError {
    EvalError::new(seq_core::error::ErrorKind::ArithmeticError, "integer overflow")
}

/// Scale an `Int` up to `Fixed` units, or pass a `Fixed` through
/// unchanged. Used wherever an operation needs both operands in the
/// same unit.
fn to_scaled(n: Num) -> EvalResult<i64> {
    match n {
        Num::Int(x) => x.checked_mul(FIXED_SCALE).ok_or_else(overflow),
        Num::Fixed(x) => Ok(x),
    }
}

fn add2(a: Num, b: Num) -> EvalResult<Num> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x.checked_add(y).map(Num::Int).ok_or_else(overflow),
        (Num::Fixed(x), Num::Int(y)) | (Num::Int(y), Num::Fixed(x)) => {
            let y = y.checked_mul(FIXED_SCALE).ok_or_else(overflow)?;
            x.checked_add(y).map(Num::Fixed).ok_or_else(overflow)
        }
        (Num::Fixed(x), Num::Fixed(y)) => x.checked_add(y).map(Num::Fixed).ok_or_else(overflow),
    }
}

fn sub2(a: Num, b: Num) -> EvalResult<Num> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x.checked_sub(y).map(Num::Int).ok_or_else(overflow),
        (Num::Fixed(x), Num::Int(y)) => {
            let y = y.checked_mul(FIXED_SCALE).ok_or_else(overflow)?;
            x.checked_sub(y).map(Num::Fixed).ok_or_else(overflow)
        }
        (Num::Int(x), Num::Fixed(y)) => {
            let x = x.checked_mul(FIXED_SCALE).ok_or_else(overflow)?;
            x.checked_sub(y).map(Num::Fixed).ok_or_else(overflow)
        }
        (Num::Fixed(x), Num::Fixed(y)) => x.checked_sub(y).map(Num::Fixed).ok_or_else(overflow),
    }
}

fn mul2(a: Num, b: Num) -> EvalResult<Num> {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => x.checked_mul(y).map(Num::Int).ok_or_else(overflow),
        (Num::Fixed(x), Num::Int(y)) | (Num::Int(y), Num::Fixed(x)) => {
            x.checked_mul(y).map(Num::Fixed).ok_or_else(overflow)
        }
        (Num::Fixed(x), Num::Fixed(y)) => {
            let product = (x as i128) * (y as i128) / (FIXED_SCALE as i128);
            i64::try_from(product).map(Num::Fixed).map_err(|_| overflow())
        }
    }
}

/// Division always yields `Fixed`: the true quotient of two integers is
/// rarely an integer, and the spec frames division in terms of a
/// fixed-point result ("reciprocal as fixed-point if precision
/// permits"), so this generalizes that to the binary case rather than
/// truncating `Int / Int` silently.
fn div2(a: Num, b: Num) -> EvalResult<Num> {
    let y = to_scaled(b)?;
    if y == 0 {
        return Err(EvalError::division_by_zero());
    }
    let x = to_scaled(a)?;
    let numerator = (x as i128) * (FIXED_SCALE as i128);
    let result = numerator / (y as i128);
    i64::try_from(result).map(Num::Fixed).map_err(|_| overflow())
}

fn negate(a: Num) -> EvalResult<Num> {
    match a {
        Num::Int(x) => x.checked_neg().map(Num::Int).ok_or_else(overflow),
        Num::Fixed(x) => x.checked_neg().map(Num::Fixed).ok_or_else(overflow),
    }
}

pub fn add(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let mut acc = Num::Int(0);
    for v in args {
        acc = add2(acc, Num::from_value(v)?)?;
    }
    Ok(acc.into_value())
}

pub fn sub(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [] => Err(EvalError::arity("-", "at least 1", 0)),
        [a] => Ok(negate(Num::from_value(a)?)?.into_value()),
        [first, rest @ ..] => {
            let mut acc = Num::from_value(first)?;
            for v in rest {
                acc = sub2(acc, Num::from_value(v)?)?;
            }
            Ok(acc.into_value())
        }
    }
}

pub fn mul(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let mut acc = Num::Int(1);
    for v in args {
        acc = mul2(acc, Num::from_value(v)?)?;
    }
    Ok(acc.into_value())
}

pub fn div(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [] => Err(EvalError::arity("/", "at least 1", 0)),
        [a] => Ok(div2(Num::Int(1), Num::from_value(a)?)?.into_value()),
        [first, rest @ ..] => {
            let mut acc = Num::from_value(first)?;
            for v in rest {
                acc = div2(acc, Num::from_value(v)?)?;
            }
            Ok(acc.into_value())
        }
    }
}

fn cmp_values(a: &Value, b: &Value) -> EvalResult<std::cmp::Ordering> {
    let x = to_scaled(Num::from_value(a)?)?;
    let y = to_scaled(Num::from_value(b)?)?;
    Ok(x.cmp(&y))
}

fn chain_cmp(args: &[Value], holds: fn(std::cmp::Ordering) -> bool) -> EvalResult<Value> {
    for w in args.windows(2) {
        if !holds(cmp_values(&w[0], &w[1])?) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

pub fn lt(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    chain_cmp(args, |o| o == std::cmp::Ordering::Less)
}

pub fn gt(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    chain_cmp(args, |o| o == std::cmp::Ordering::Greater)
}

pub fn le(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    chain_cmp(args, |o| o != std::cmp::Ordering::Greater)
}

pub fn ge(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    chain_cmp(args, |o| o != std::cmp::Ordering::Less)
}

/// `(= a b …)`: pairwise `clj_equal`, not restricted to numbers.
pub fn eq(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    Ok(Value::Bool(args.windows(2).all(|w| clj_equal(&w[0], &w[1]))))
}

/// `(inc x)` / `(dec x)`: unary `+1`/`-1`, the common case of `+`/`-`
/// that a `recur`-driven countdown loop reaches for by name.
pub fn inc(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    add2(Num::from_value(&args[0])?, Num::Int(1)).map(Num::into_value)
}

pub fn dec(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    sub2(Num::from_value(&args[0])?, Num::Int(1)).map(Num::into_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_apply(_: &Value, _: &[Value]) -> EvalResult<Value> {
        Ok(Value::Nil)
    }

    #[test]
    fn nullary_identities() {
        assert_eq!(add(&[], &noop_apply).unwrap(), Value::Int(0));
        assert_eq!(mul(&[], &noop_apply).unwrap(), Value::Int(1));
        assert!(sub(&[], &noop_apply).is_err());
        assert!(div(&[], &noop_apply).is_err());
    }

    #[test]
    fn variadic_add_and_sub() {
        let args = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        assert_eq!(add(&args, &noop_apply).unwrap(), Value::Int(6));
        assert_eq!(sub(&args, &noop_apply).unwrap(), Value::Int(-4));
    }

    #[test]
    fn unary_negation_and_reciprocal() {
        assert_eq!(sub(&[Value::Int(5)], &noop_apply).unwrap(), Value::Int(-5));
        let recip = div(&[Value::Int(4)], &noop_apply).unwrap();
        assert_eq!(recip, Value::Fixed(250));
    }

    #[test]
    fn division_by_zero_is_arithmetic_error() {
        let err = div(&[Value::Int(1), Value::Int(0)], &noop_apply).unwrap_err();
        assert_eq!(err.to_string(), "ArithmeticError: Division by zero");
    }

    #[test]
    fn mixed_int_fixed_promotes_to_fixed() {
        let result = add(&[Value::Int(1), Value::Fixed(500)], &noop_apply).unwrap();
        assert_eq!(result, Value::Fixed(1500));
    }

    #[test]
    fn non_numeric_operand_is_type_error() {
        assert!(add(&[Value::Int(1), Value::string("x")], &noop_apply).is_err());
    }

    #[test]
    fn comparisons_chain_across_arguments() {
        let args = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
        assert_eq!(lt(&args, &noop_apply).unwrap(), Value::Bool(true));
        assert_eq!(gt(&args, &noop_apply).unwrap(), Value::Bool(false));
        assert_eq!(le(&[Value::Int(2), Value::Int(2)], &noop_apply).unwrap(), Value::Bool(true));
    }

    #[test]
    fn equality_is_variadic_and_structural() {
        let args = vec![Value::Int(1), Value::Int(1), Value::Int(1)];
        assert_eq!(eq(&args, &noop_apply).unwrap(), Value::Bool(true));
    }

    #[test]
    fn inc_and_dec_are_unary_plus_minus_one() {
        assert_eq!(inc(&[Value::Int(41)], &noop_apply).unwrap(), Value::Int(42));
        assert_eq!(dec(&[Value::Int(1)], &noop_apply).unwrap(), Value::Int(0));
    }

    #[test]
    fn overflow_raises_arithmetic_error() {
        let args = vec![Value::Int(i64::MAX), Value::Int(1)];
        assert!(add(&args, &noop_apply).is_err());
    }
}
