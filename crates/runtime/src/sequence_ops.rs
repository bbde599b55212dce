//! Collection and sequence builtins (§4.B, §4.D, §6): the core seq
//! accessors (`first rest next seq cons count`), the array-map/vector
//! mutators (`conj assoc dissoc get contains? keys vals nth`), the
//! collection constructors (`list vector hash-map vec`), and the
//! supplemented higher-order sequence functions (`apply map filter
//! reduce`) built on the `Applier` callback so this crate never has to
//! depend back on the evaluator that calls into it.

use seq_core::collections::{
    list_nth, map_assoc, map_contains, map_dissoc, map_get, map_keys, map_vals, vector_assoc,
    vector_conj, vector_nth,
};
use seq_core::error::{EvalError, EvalResult};
use seq_core::seq;
use seq_core::value::{Applier, Value};

fn arity_at_least(name: &'static str, args: &[Value], min: usize) -> EvalResult<()> {
    if args.len() < min {
        return Err(EvalError::arity(name, &format!("at least {min}"), args.len()));
    }
    Ok(())
}

pub fn first(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [v] => seq::first(v),
        _ => Err(EvalError::arity("first", "1", args.len())),
    }
}

pub fn rest(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [v] => seq::rest(v),
        _ => Err(EvalError::arity("rest", "1", args.len())),
    }
}

pub fn next(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [v] => seq::next(v),
        _ => Err(EvalError::arity("next", "1", args.len())),
    }
}

pub fn seq(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [v] => seq::seq_ctor(v),
        _ => Err(EvalError::arity("seq", "1", args.len())),
    }
}

pub fn cons(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [x, coll] => seq::cons(x.clone(), coll),
        _ => Err(EvalError::arity("cons", "2", args.len())),
    }
}

pub fn count(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [v] => Ok(Value::Int(seq::count(v)? as i64)),
        _ => Err(EvalError::arity("count", "1", args.len())),
    }
}

/// `(list & xs)`: builds a cons chain directly, right to left.
pub fn list(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    Ok(args.iter().rev().fold(Value::Nil, |acc, x| Value::cons(x.clone(), acc)))
}

pub fn vector(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    Ok(Value::vector(args.to_vec()))
}

pub fn hash_map(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    if args.len() % 2 != 0 {
        return Err(EvalError::new(
            seq_core::error::ErrorKind::ArityError,
            "hash-map: expected an even number of key/value arguments",
        ));
    }
    let mut pairs = Vec::with_capacity(args.len() / 2);
    for chunk in args.chunks_exact(2) {
        pairs.push((chunk[0].clone(), chunk[1].clone()));
    }
    Ok(Value::map(pairs))
}

/// `(vec coll)`: materialize any seqable into a vector.
pub fn vec(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [v] => Ok(Value::vector(seq::collect(v)?)),
        _ => Err(EvalError::arity("vec", "1", args.len())),
    }
}

/// `(conj coll & xs)`: list conj prepends, vector conj appends, map conj
/// takes `[k v]` pair vectors — the three standard Clojure conj shapes.
pub fn conj(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    arity_at_least("conj", args, 1)?;
    let mut coll = args[0].clone();
    for x in &args[1..] {
        coll = match &coll {
            Value::Nil | Value::List(_) => Value::cons(x.clone(), coll),
            Value::Vector(_) => vector_conj(&coll, x.clone())?,
            Value::Map(_) => match x {
                Value::Vector(pair) if pair.len() == 2 => {
                    map_assoc(&coll, pair[0].clone(), pair[1].clone())?
                }
                _ => return Err(EvalError::type_error("[key value] pair", x.type_name())),
            },
            other => return Err(EvalError::type_error("collection", other.type_name())),
        };
    }
    Ok(coll)
}

/// `(assoc coll k v & kvs)`: vector index-assoc or map key-assoc, picked
/// by the collection's own type.
pub fn assoc(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    arity_at_least("assoc", args, 3)?;
    if (args.len() - 1) % 2 != 0 {
        return Err(EvalError::new(
            seq_core::error::ErrorKind::ArityError,
            "assoc: expected an even number of key/value arguments",
        ));
    }
    let mut coll = args[0].clone();
    for kv in args[1..].chunks_exact(2) {
        coll = match &coll {
            Value::Vector(_) => {
                let index = match &kv[0] {
                    Value::Int(n) => *n,
                    other => return Err(EvalError::type_error("Integer index", other.type_name())),
                };
                vector_assoc(&coll, index, kv[1].clone())?
            }
            Value::Map(_) | Value::Nil => {
                let base = if coll.is_nil() { Value::map(vec![]) } else { coll };
                map_assoc(&base, kv[0].clone(), kv[1].clone())?
            }
            other => return Err(EvalError::type_error("Vector or Map", other.type_name())),
        };
    }
    Ok(coll)
}

pub fn dissoc(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    arity_at_least("dissoc", args, 1)?;
    let mut coll = args[0].clone();
    for key in &args[1..] {
        coll = map_dissoc(&coll, key)?;
    }
    Ok(coll)
}

pub fn get(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [coll, key] => map_get(coll, key),
        [coll, key, default] => {
            let found = map_get(coll, key)?;
            Ok(if found.is_nil() { default.clone() } else { found })
        }
        _ => Err(EvalError::arity("get", "2 or 3", args.len())),
    }
}

pub fn contains(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [coll, key] => Ok(Value::Bool(map_contains(coll, key)?)),
        _ => Err(EvalError::arity("contains?", "2", args.len())),
    }
}

pub fn keys(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [coll] => Ok(Value::vector(map_keys(coll)?)),
        _ => Err(EvalError::arity("keys", "1", args.len())),
    }
}

pub fn vals(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    match args {
        [coll] => Ok(Value::vector(map_vals(coll)?)),
        _ => Err(EvalError::arity("vals", "1", args.len())),
    }
}

pub fn nth(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let (coll, index) = match args {
        [coll, Value::Int(i)] => (coll, *i),
        [_, other] => return Err(EvalError::type_error("Integer index", other.type_name())),
        _ => return Err(EvalError::arity("nth", "2", args.len())),
    };
    match coll {
        Value::Vector(_) => vector_nth(coll, index),
        Value::List(_) | Value::Nil => list_nth(coll, index),
        _ => {
            let items = seq::collect(coll)?;
            if index < 0 {
                return Err(EvalError::index_out_of_bounds(index, items.len()));
            }
            items
                .get(index as usize)
                .cloned()
                .ok_or_else(|| EvalError::index_out_of_bounds(index, items.len()))
        }
    }
}

/// `(apply f a b ... coll)`: the last argument is spread as trailing
/// arguments (§ supplement, needed for `for`/`doseq`/`reduce`-style use).
pub fn apply(args: &[Value], call: &Applier) -> EvalResult<Value> {
    arity_at_least("apply", args, 2)?;
    let f = &args[0];
    let (leading, trailing_coll) = args[1..].split_at(args.len() - 2);
    let mut call_args = leading.to_vec();
    call_args.extend(seq::collect(&trailing_coll[0])?);
    call(f, &call_args)
}

pub fn map(args: &[Value], call: &Applier) -> EvalResult<Value> {
    match args {
        [f, coll] => {
            let items = seq::collect(coll)?;
            let mut results = Vec::with_capacity(items.len());
            for item in &items {
                results.push(call(f, std::slice::from_ref(item))?);
            }
            Ok(results.into_iter().rev().fold(Value::Nil, |acc, x| Value::cons(x, acc)))
        }
        _ => Err(EvalError::arity("map", "2", args.len())),
    }
}

pub fn filter(args: &[Value], call: &Applier) -> EvalResult<Value> {
    match args {
        [pred, coll] => {
            let items = seq::collect(coll)?;
            let mut kept = Vec::new();
            for item in items {
                if call(pred, std::slice::from_ref(&item))?.is_truthy() {
                    kept.push(item);
                }
            }
            Ok(kept.into_iter().rev().fold(Value::Nil, |acc, x| Value::cons(x, acc)))
        }
        _ => Err(EvalError::arity("filter", "2", args.len())),
    }
}

pub fn reduce(args: &[Value], call: &Applier) -> EvalResult<Value> {
    match args {
        [f, coll] => {
            let items = seq::collect(coll)?;
            let mut iter = items.into_iter();
            let mut acc = match iter.next() {
                Some(v) => v,
                None => return call(f, &[]),
            };
            for item in iter {
                acc = call(f, &[acc, item])?;
            }
            Ok(acc)
        }
        [f, init, coll] => {
            let items = seq::collect(coll)?;
            let mut acc = init.clone();
            for item in items {
                acc = call(f, &[acc, item])?;
            }
            Ok(acc)
        }
        _ => Err(EvalError::arity("reduce", "2 or 3", args.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_fixture(f: &Value, call_args: &[Value]) -> EvalResult<Value> {
        match f {
            Value::Native(n) => (n.func)(call_args, &call_fixture),
            _ => Err(EvalError::not_a_function(f.type_name())),
        }
    }

    fn double() -> Value {
        use seq_core::value::NativeFn;
        use std::rc::Rc;
        Value::Native(Rc::new(NativeFn {
            name: "double".into(),
            min_arity: 1,
            max_arity: Some(1),
            func: |args, _apply| match args {
                [Value::Int(n)] => Ok(Value::Int(n * 2)),
                _ => Err(EvalError::arity("double", "1", args.len())),
            },
        }))
    }

    fn plus() -> Value {
        use seq_core::value::NativeFn;
        use std::rc::Rc;
        Value::Native(Rc::new(NativeFn {
            name: "plus".into(),
            min_arity: 2,
            max_arity: Some(2),
            func: |args, _apply| match args {
                [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a + b)),
                _ => Err(EvalError::arity("plus", "2", args.len())),
            },
        }))
    }

    #[test]
    fn list_builds_cons_chain_in_order() {
        let result = list(&[Value::Int(1), Value::Int(2), Value::Int(3)], &call_fixture).unwrap();
        assert_eq!(seq::collect(&result).unwrap(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn conj_prepends_on_list_appends_on_vector() {
        let l = conj(&[Value::Nil, Value::Int(1)], &call_fixture).unwrap();
        assert_eq!(seq::collect(&l).unwrap(), vec![Value::Int(1)]);
        let v = conj(&[Value::vector(vec![Value::Int(1)]), Value::Int(2)], &call_fixture).unwrap();
        assert_eq!(seq::collect(&v).unwrap(), vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn assoc_on_nil_creates_a_map() {
        let m = assoc(&[Value::Nil, Value::keyword(":a"), Value::Int(1)], &call_fixture).unwrap();
        assert_eq!(get(&[m, Value::keyword(":a")], &call_fixture).unwrap(), Value::Int(1));
    }

    #[test]
    fn get_with_default_falls_back_when_missing() {
        let m = Value::map(vec![]);
        let got = get(&[m, Value::keyword(":x"), Value::Int(42)], &call_fixture).unwrap();
        assert_eq!(got, Value::Int(42));
    }

    #[test]
    fn nth_works_across_list_and_vector() {
        let v = Value::vector(vec![Value::Int(10), Value::Int(20)]);
        assert_eq!(nth(&[v, Value::Int(1)], &call_fixture).unwrap(), Value::Int(20));
        let l = list(&[Value::Int(10), Value::Int(20)], &call_fixture).unwrap();
        assert_eq!(nth(&[l, Value::Int(0)], &call_fixture).unwrap(), Value::Int(10));
    }

    #[test]
    fn apply_spreads_trailing_collection() {
        let result = apply(
            &[plus(), Value::Int(1), Value::vector(vec![Value::Int(2)])],
            &call_fixture,
        )
        .unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn map_transforms_each_element_preserving_order() {
        let coll = Value::vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let result = map(&[double(), coll], &call_fixture).unwrap();
        assert_eq!(seq::collect(&result).unwrap(), vec![Value::Int(2), Value::Int(4), Value::Int(6)]);
    }

    #[test]
    fn filter_keeps_only_truthy_results() {
        use seq_core::value::NativeFn;
        use std::rc::Rc;
        let even = Value::Native(Rc::new(NativeFn {
            name: "even?".into(),
            min_arity: 1,
            max_arity: Some(1),
            func: |args, _apply| match args {
                [Value::Int(n)] => Ok(Value::Bool(n % 2 == 0)),
                _ => Err(EvalError::arity("even?", "1", args.len())),
            },
        }));
        let coll = Value::vector(vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]);
        let result = filter(&[even, coll], &call_fixture).unwrap();
        assert_eq!(seq::collect(&result).unwrap(), vec![Value::Int(2), Value::Int(4)]);
    }

    #[test]
    fn reduce_with_and_without_explicit_init() {
        let coll = Value::vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let summed = reduce(&[plus(), coll.clone()], &call_fixture).unwrap();
        assert_eq!(summed, Value::Int(6));
        let summed_init = reduce(&[plus(), Value::Int(10), coll], &call_fixture).unwrap();
        assert_eq!(summed_init, Value::Int(16));
    }
}
