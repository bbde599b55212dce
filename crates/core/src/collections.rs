//! Persistent collection operations (§4.B): list, vector, and the
//! insertion-ordered array-map.
//!
//! Vector and map mutation follow the copy-on-write rule (A.6) via
//! `Rc::make_mut`: on a handle with `strong_count == 1` it mutates the
//! backing storage in place and hands the same allocation back; on a
//! shared handle it clones first. That is exactly `Rc::make_mut`'s
//! contract, so the COW discipline falls out of the standard library
//! rather than needing hand-rolled refcount checks.

use std::rc::Rc;

use crate::equality::clj_equal;
use crate::error::{EvalError, EvalResult};
use crate::value::Value;

// ---------------------------------------------------------------- list --

/// `(first nil)` is `nil`; `(first <non-list>)` is also `nil` here
/// because `first`/`rest` are the raw cons accessors — the seq protocol
/// in `seq.rs` is what rejects non-seqable arguments with `TypeError`.
pub fn list_first(v: &Value) -> Value {
    match v {
        Value::List(node) => node.first.clone(),
        _ => Value::Nil,
    }
}

/// `(rest nil)` is the empty list, i.e. `nil` (§4.B).
pub fn list_rest(v: &Value) -> Value {
    match v {
        Value::List(node) => node.rest.clone(),
        _ => Value::Nil,
    }
}

/// Linear in list length (§4.B).
pub fn list_count(v: &Value) -> usize {
    let mut n = 0;
    let mut cursor = v.clone();
    while let Value::List(node) = cursor {
        n += 1;
        cursor = node.rest.clone();
    }
    n
}

pub fn list_nth(v: &Value, index: i64) -> EvalResult<Value> {
    if index < 0 {
        return Err(EvalError::index_out_of_bounds(index, list_count(v)));
    }
    let mut remaining = index;
    let mut cursor = v.clone();
    loop {
        match cursor {
            Value::List(node) => {
                if remaining == 0 {
                    return Ok(node.first.clone());
                }
                remaining -= 1;
                cursor = node.rest.clone();
            }
            _ => return Err(EvalError::index_out_of_bounds(index, list_count(v))),
        }
    }
}

// -------------------------------------------------------------- vector --

pub fn vector_make(capacity: usize) -> Value {
    Value::Vector(Rc::new(Vec::with_capacity(capacity)))
}

pub fn vector_count(v: &Value) -> EvalResult<usize> {
    match v {
        Value::Vector(data) => Ok(data.len()),
        _ => Err(EvalError::type_error("Vector", v.type_name())),
    }
}

pub fn vector_nth(v: &Value, index: i64) -> EvalResult<Value> {
    match v {
        Value::Vector(data) => {
            if index < 0 {
                return Err(EvalError::index_out_of_bounds(index, data.len()));
            }
            data.get(index as usize)
                .cloned()
                .ok_or_else(|| EvalError::index_out_of_bounds(index, data.len()))
        }
        _ => Err(EvalError::type_error("Vector", v.type_name())),
    }
}

/// `(conj v x)`: append, returning a vector sharing nothing observable
/// with a concurrent mutator of the original (A.6/COW).
pub fn vector_conj(v: &Value, x: Value) -> EvalResult<Value> {
    match v {
        Value::Vector(data) => {
            let mut data = data.clone();
            Rc::make_mut(&mut data).push(x);
            Ok(Value::Vector(data))
        }
        _ => Err(EvalError::type_error("Vector", v.type_name())),
    }
}

pub fn vector_assoc(v: &Value, index: i64, x: Value) -> EvalResult<Value> {
    match v {
        Value::Vector(data) => {
            if index < 0 || index as usize >= data.len() {
                return Err(EvalError::index_out_of_bounds(index, data.len()));
            }
            let mut data = data.clone();
            Rc::make_mut(&mut data)[index as usize] = x;
            Ok(Value::Vector(data))
        }
        _ => Err(EvalError::type_error("Vector", v.type_name())),
    }
}

// ----------------------------------------------------------- array-map --

pub fn map_make(capacity: usize) -> Value {
    Value::Map(Rc::new(Vec::with_capacity(capacity)))
}

/// Replace an existing key's value in place (preserving its position) or
/// append a new pair (§4.B).
pub fn map_assoc(v: &Value, key: Value, val: Value) -> EvalResult<Value> {
    match v {
        Value::Map(data) => {
            let mut data = data.clone();
            let pairs = Rc::make_mut(&mut data);
            match pairs.iter_mut().find(|(k, _)| clj_equal(k, &key)) {
                Some(pair) => pair.1 = val,
                None => pairs.push((key, val)),
            }
            Ok(Value::Map(data))
        }
        _ => Err(EvalError::type_error("Map", v.type_name())),
    }
}

pub fn map_dissoc(v: &Value, key: &Value) -> EvalResult<Value> {
    match v {
        Value::Map(data) => {
            let mut data = data.clone();
            Rc::make_mut(&mut data).retain(|(k, _)| !clj_equal(k, key));
            Ok(Value::Map(data))
        }
        _ => Err(EvalError::type_error("Map", v.type_name())),
    }
}

/// `(get m k)` returns the value or `nil`; `(get nil k)` is `nil` too,
/// matching the common "optional map" idiom.
pub fn map_get(v: &Value, key: &Value) -> EvalResult<Value> {
    match v {
        Value::Nil => Ok(Value::Nil),
        Value::Map(data) => Ok(data
            .iter()
            .find(|(k, _)| clj_equal(k, key))
            .map(|(_, val)| val.clone())
            .unwrap_or(Value::Nil)),
        _ => Err(EvalError::type_error("Map", v.type_name())),
    }
}

pub fn map_contains(v: &Value, key: &Value) -> EvalResult<bool> {
    match v {
        Value::Nil => Ok(false),
        Value::Map(data) => Ok(data.iter().any(|(k, _)| clj_equal(k, key))),
        _ => Err(EvalError::type_error("Map", v.type_name())),
    }
}

pub fn map_count(v: &Value) -> EvalResult<usize> {
    match v {
        Value::Nil => Ok(0),
        Value::Map(data) => Ok(data.len()),
        _ => Err(EvalError::type_error("Map", v.type_name())),
    }
}

pub fn map_keys(v: &Value) -> EvalResult<Vec<Value>> {
    match v {
        Value::Nil => Ok(Vec::new()),
        Value::Map(data) => Ok(data.iter().map(|(k, _)| k.clone()).collect()),
        _ => Err(EvalError::type_error("Map", v.type_name())),
    }
}

pub fn map_vals(v: &Value) -> EvalResult<Vec<Value>> {
    match v {
        Value::Nil => Ok(Vec::new()),
        Value::Map(data) => Ok(data.iter().map(|(_, val)| val.clone()).collect()),
        _ => Err(EvalError::type_error("Map", v.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assoc_preserves_position_on_replace() {
        let m = Value::map(vec![
            (Value::keyword(":a"), Value::Int(1)),
            (Value::keyword(":b"), Value::Int(2)),
        ]);
        let m2 = map_assoc(&m, Value::keyword(":a"), Value::Int(99)).unwrap();
        assert_eq!(map_keys(&m2).unwrap(), vec![Value::keyword(":a"), Value::keyword(":b")]);
        assert_eq!(map_get(&m2, &Value::keyword(":a")).unwrap(), Value::Int(99));
    }

    #[test]
    fn assoc_on_shared_vector_leaves_original_unchanged() {
        let v = Value::vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let shared = v.clone();
        let v2 = vector_assoc(&v, 1, Value::Int(99)).unwrap();
        assert_eq!(vector_nth(&shared, 1).unwrap(), Value::Int(2));
        assert_eq!(vector_nth(&v2, 1).unwrap(), Value::Int(99));
        for j in [0usize, 2] {
            assert_eq!(
                vector_nth(&v2, j as i64).unwrap(),
                vector_nth(&shared, j as i64).unwrap()
            );
        }
    }

    #[test]
    fn negative_index_is_index_error() {
        let v = Value::vector(vec![Value::Int(1)]);
        assert!(vector_nth(&v, -1).is_err());
    }

    #[test]
    fn dissoc_then_contains_is_false() {
        let m = Value::map(vec![(Value::keyword(":a"), Value::Int(1))]);
        let m2 = map_dissoc(&m, &Value::keyword(":a")).unwrap();
        assert!(!map_contains(&m2, &Value::keyword(":a")).unwrap());
    }

    #[test]
    fn list_first_and_rest_of_nil() {
        assert_eq!(list_first(&Value::Nil), Value::Nil);
        assert_eq!(list_rest(&Value::Nil), Value::Nil);
        assert_eq!(list_count(&Value::Nil), 0);
    }
}
