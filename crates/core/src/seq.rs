//! The sequence protocol (§4.D): a uniform iterator view over
//! list/vector/map/string/nil.
//!
//! `seq(x)` hands back either the container itself (lists already are
//! their own iterator) or a fresh `Value::Seq` cursor; `first`/`rest`
//! work directly on any seqable container too, so `(first (seq x)) ==
//! (first x)` (invariant D.1) holds by construction rather than by a
//! round-trip check.

use std::rc::Rc;

use crate::collections::list_count;
use crate::error::{EvalError, EvalResult};
use crate::value::{SeqCell, Value};

fn vector_seq_at(data: &Rc<Vec<Value>>, index: usize) -> Value {
    if index >= data.len() {
        Value::Nil
    } else {
        Value::Seq(Rc::new(SeqCell::Vector { data: data.clone(), index }))
    }
}

fn map_seq_at(data: &Rc<Vec<(Value, Value)>>, index: usize) -> Value {
    if index >= data.len() {
        Value::Nil
    } else {
        Value::Seq(Rc::new(SeqCell::Map { data: data.clone(), index }))
    }
}

fn str_seq_at(data: &Rc<str>, index: usize) -> Value {
    if index >= data.chars().count() {
        Value::Nil
    } else {
        Value::Seq(Rc::new(SeqCell::Str { data: data.clone(), index }))
    }
}

/// `(seq x)`: for `nil`, `nil`; for a list, the list itself; for
/// vector/map/string, a fresh cursor at position zero; anything else is
/// a `TypeError`.
pub fn seq_ctor(x: &Value) -> EvalResult<Value> {
    match x {
        Value::Nil | Value::List(_) | Value::Seq(_) => Ok(x.clone()),
        Value::Vector(data) => Ok(vector_seq_at(data, 0)),
        Value::Map(data) => Ok(map_seq_at(data, 0)),
        Value::String(s) => Ok(str_seq_at(s, 0)),
        _ => Err(EvalError::type_error("Seq", x.type_name())),
    }
}

/// `(first x)` over any seqable container, or a `SEQ`.
pub fn first(x: &Value) -> EvalResult<Value> {
    match x {
        Value::Nil => Ok(Value::Nil),
        Value::List(node) => Ok(node.first.clone()),
        Value::Vector(data) => Ok(data.first().cloned().unwrap_or(Value::Nil)),
        Value::Map(data) => Ok(data
            .first()
            .map(|(k, v)| Value::vector(vec![k.clone(), v.clone()]))
            .unwrap_or(Value::Nil)),
        Value::String(s) => Ok(s.chars().next().map(Value::Char).unwrap_or(Value::Nil)),
        Value::Seq(cell) => Ok(match cell.as_ref() {
            SeqCell::Vector { data, index } => data.get(*index).cloned().unwrap_or(Value::Nil),
            SeqCell::Map { data, index } => data
                .get(*index)
                .map(|(k, v)| Value::vector(vec![k.clone(), v.clone()]))
                .unwrap_or(Value::Nil),
            SeqCell::Str { data, index } => data.chars().nth(*index).map(Value::Char).unwrap_or(Value::Nil),
        }),
        _ => Err(EvalError::type_error("Seq", x.type_name())),
    }
}

/// `(rest x)`: a `SEQ` for the tail, or `nil` if exhausted (§4.D).
pub fn rest(x: &Value) -> EvalResult<Value> {
    match x {
        Value::Nil => Ok(Value::Nil),
        Value::List(node) => Ok(node.rest.clone()),
        Value::Vector(data) => Ok(vector_seq_at(data, 1)),
        Value::Map(data) => Ok(map_seq_at(data, 1)),
        Value::String(s) => Ok(str_seq_at(s, 1)),
        Value::Seq(cell) => Ok(match cell.as_ref() {
            SeqCell::Vector { data, index } => vector_seq_at(data, index + 1),
            SeqCell::Map { data, index } => map_seq_at(data, index + 1),
            SeqCell::Str { data, index } => str_seq_at(data, index + 1),
        }),
        _ => Err(EvalError::type_error("Seq", x.type_name())),
    }
}

/// `next`: an alias for `rest` that returns `nil` on an empty rest.
/// Under this representation `rest` already collapses an exhausted tail
/// to `Value::Nil`, so the two coincide exactly.
pub fn next(x: &Value) -> EvalResult<Value> {
    rest(x)
}

/// O(1) when the container reports its own length; O(n) for strings
/// (codepoint count) and for lists (no cached length, §4.B).
pub fn count(x: &Value) -> EvalResult<usize> {
    match x {
        Value::Nil => Ok(0),
        Value::List(_) => Ok(list_count(x)),
        Value::Vector(data) => Ok(data.len()),
        Value::Map(data) => Ok(data.len()),
        Value::String(s) => Ok(s.chars().count()),
        Value::Seq(cell) => Ok(match cell.as_ref() {
            SeqCell::Vector { data, index } => data.len().saturating_sub(*index),
            SeqCell::Map { data, index } => data.len().saturating_sub(*index),
            SeqCell::Str { data, index } => data.chars().count().saturating_sub(*index),
        }),
        _ => Err(EvalError::type_error("Countable", x.type_name())),
    }
}

pub fn is_empty(x: &Value) -> EvalResult<bool> {
    Ok(count(x)? == 0)
}

/// Materialize every remaining element of a seqable as a `Vec<Value>`.
/// Used by builtins (`map`, `filter`, `reduce`, `apply`) that need to
/// walk a whole sequence rather than one step at a time.
pub fn collect(x: &Value) -> EvalResult<Vec<Value>> {
    let mut items = Vec::new();
    let mut cursor = seq_ctor(x)?;
    while !matches!(cursor, Value::Nil) {
        items.push(first(&cursor)?);
        cursor = rest(&cursor)?;
    }
    Ok(items)
}

/// Rebuild a persistent list from any seqable container. A `List`/`Nil`
/// is returned unchanged; anything else is walked and relinked so the
/// closed `LIST` shape (`rest` is always `LIST` or `nil`, §3) holds even
/// after `cons`ing onto a vector, map, or string.
pub fn seqable_to_list(x: &Value) -> EvalResult<Value> {
    if matches!(x, Value::List(_) | Value::Nil) {
        return Ok(x.clone());
    }
    let items = collect(x)?;
    Ok(items.into_iter().rev().fold(Value::Nil, |acc, item| Value::cons(item, acc)))
}

/// `(cons x coll)`: always produces a list, regardless of `coll`'s
/// container type.
pub fn cons(x: Value, coll: &Value) -> EvalResult<Value> {
    let list = seqable_to_list(coll)?;
    Ok(Value::cons(x, list))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_seq_matches_first_of_container() {
        let v = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        let s = seq_ctor(&v).unwrap();
        assert_eq!(first(&s).unwrap(), first(&v).unwrap());
    }

    #[test]
    fn cons_first_rest_roundtrips() {
        let v = Value::vector(vec![Value::Int(2), Value::Int(3)]);
        let s = seq_ctor(&v).unwrap();
        let rebuilt = cons(first(&s).unwrap(), &rest(&s).unwrap()).unwrap();
        assert_eq!(rebuilt, s);
    }

    #[test]
    fn empty_vector_seq_is_nil() {
        assert_eq!(seq_ctor(&Value::vector(vec![])).unwrap(), Value::Nil);
    }

    #[test]
    fn count_of_empty_string_is_zero() {
        assert_eq!(count(&Value::string("")).unwrap(), 0);
    }

    #[test]
    fn rest_of_singleton_is_nil_not_empty_seq() {
        let v = Value::vector(vec![Value::Int(1)]);
        assert_eq!(rest(&v).unwrap(), Value::Nil);
    }

    #[test]
    fn collect_walks_map_as_entry_vectors() {
        let m = Value::map(vec![(Value::keyword(":a"), Value::Int(1))]);
        let items = collect(&m).unwrap();
        assert_eq!(items, vec![Value::vector(vec![Value::keyword(":a"), Value::Int(1)])]);
    }
}
