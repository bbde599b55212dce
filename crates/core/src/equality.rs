//! `clj_equal` (§4.A, §4.H) and the `PartialEq`/`Eq` impls for `Value`
//! that defer to it.
//!
//! This is deliberately not `#[derive(PartialEq)]`: the spec's equality
//! is cross-type for sequences (`(= '(1 2) [1 2])` is `true`) and
//! order-insensitive for maps, neither of which a derived structural
//! comparison gives you.

use std::rc::Rc;

use crate::value::{SeqCell, Value};

/// Materialize the remaining elements of a list/vector/seq/nil as a
/// `Vec<Value>` for sequence-shaped equality (§4.H: "lists, vectors, and
/// seqs compare as sequences"). Returns `None` for anything else (maps,
/// strings, scalars, functions), which never compare equal to a
/// sequence under this rule.
fn sequence_items(v: &Value) -> Option<Vec<Value>> {
    match v {
        Value::Nil => Some(Vec::new()),
        Value::List(_) => {
            let mut items = Vec::new();
            let mut cursor = v.clone();
            loop {
                match cursor {
                    Value::List(node) => {
                        items.push(node.first.clone());
                        cursor = node.rest.clone();
                    }
                    Value::Nil => break,
                    _ => break,
                }
            }
            Some(items)
        }
        Value::Vector(data) => Some(data.as_ref().clone()),
        Value::Seq(cell) => Some(seq_cell_items(cell)),
        _ => None,
    }
}

fn seq_cell_items(cell: &SeqCell) -> Vec<Value> {
    match cell {
        SeqCell::Vector { data, index } => data[*index..].to_vec(),
        SeqCell::Map { data, index } => data[*index..]
            .iter()
            .map(|(k, v)| Value::vector(vec![k.clone(), v.clone()]))
            .collect(),
        SeqCell::Str { data, index } => data.chars().skip(*index).map(Value::Char).collect(),
    }
}

/// Structural equality over the value graph (§4.H).
pub fn clj_equal(a: &Value, b: &Value) -> bool {
    if let (Some(ai), Some(bi)) = (sequence_items(a), sequence_items(b)) {
        return ai.len() == bi.len() && ai.iter().zip(bi.iter()).all(|(x, y)| clj_equal(x, y));
    }

    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Fixed(x), Value::Fixed(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Keyword(x), Value::Keyword(y)) => x == y,
        (Value::Map(x), Value::Map(y)) => maps_equal(x, y),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Native(x), Value::Native(y)) => Rc::ptr_eq(x, y),
        (Value::Error(x), Value::Error(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

fn maps_equal(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().all(|(k, v)| {
        b.iter()
            .any(|(k2, v2)| clj_equal(k, k2) && clj_equal(v, v2))
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        clj_equal(self, other)
    }
}
impl Eq for Value {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflexive_symmetric() {
        let a = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::cons(Value::Int(1), Value::cons(Value::Int(2), Value::Nil));
        assert!(clj_equal(&a, &a));
        assert!(clj_equal(&a, &b));
        assert!(clj_equal(&b, &a));
    }

    #[test]
    fn list_and_vector_equal_by_contents() {
        let list = Value::cons(Value::Int(1), Value::cons(Value::Int(2), Value::Nil));
        let vector = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(list, vector);
    }

    #[test]
    fn empty_list_equals_nil_and_empty_vector() {
        assert_eq!(Value::Nil, Value::vector(vec![]));
    }

    #[test]
    fn maps_compare_order_insensitively() {
        let a = Value::map(vec![
            (Value::keyword(":a"), Value::Int(1)),
            (Value::keyword(":b"), Value::Int(2)),
        ]);
        let b = Value::map(vec![
            (Value::keyword(":b"), Value::Int(2)),
            (Value::keyword(":a"), Value::Int(1)),
        ]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_length_maps_are_unequal() {
        let a = Value::map(vec![(Value::keyword(":a"), Value::Int(1))]);
        let b = Value::map(vec![
            (Value::keyword(":a"), Value::Int(1)),
            (Value::keyword(":b"), Value::Int(2)),
        ]);
        assert_ne!(a, b);
    }

    #[test]
    fn strings_compare_by_bytes_not_identity() {
        let a = Value::string("hi");
        let b = Value::string(String::from("hi"));
        assert_eq!(a, b);
    }

    #[test]
    fn symbols_compare_by_identity() {
        let a = Value::Symbol(crate::symbol::intern_unqualified("x"));
        let b = Value::Symbol(crate::symbol::intern_unqualified("y"));
        assert_ne!(a, b);
    }
}
