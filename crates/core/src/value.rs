//! The `Value` representation (§3, §4.A).
//!
//! `spec.md` draws a line between *immediates* — encoded directly in a
//! pointer-sized word, never heap-allocated — and *heap objects*, each
//! with a shared header (`{type_tag, refcount}`) followed by a
//! type-specific payload. This crate keeps that distinction as the
//! organizing idea but expresses it in safe Rust rather than literal
//! pointer tagging (the teacher lineage's `nanbox.rs` NaN-boxing scheme
//! is the closest precedent for *why* one would tag; we get the same
//! "small values never allocate" property from a plain `enum`, and the
//! same "refcount, deep release on zero" property for free from `Rc`'s
//! `Drop`):
//!
//! - `Nil`, `Bool`, `Int`, `Char` are immediates — `Clone` is a bitwise
//!   copy, equality is bitwise, and invariant A.3 ("immediates never
//!   enter the refcount system") holds trivially because there is no
//!   `Rc` to bump.
//! - Every other variant wraps an `Rc<T>`: the enum discriminant is the
//!   header's type tag (invariant A.1 — one tag, one decode path), and
//!   `Rc::strong_count` is the refcount (invariant A.2 — dropping the
//!   last handle recursively drops owned children, because `T`'s own
//!   `Drop` does, with no manual bookkeeping to get wrong).
//!
//! `retain`/`release`/`autorelease`/the pool API live in [`crate::pool`]
//! as thin, explicitly-named wrappers over `Clone`/`Drop`/a deferred-drop
//! queue — see that module for why an `Rc`-GC'd language still benefits
//! from naming the scopes explicitly.

use std::fmt;
use std::rc::Rc;

use crate::error::EvalResult;
use crate::namespace::Namespace;
use crate::symbol::Symbol;

/// A persistent singly-linked cons cell (§4.B "List"). The empty list is
/// `Value::Nil`, never a heap object — so `ListNode` is only ever
/// constructed non-empty, and `rest` is always either another
/// `Value::List` or `Value::Nil`.
#[derive(Debug)]
pub struct ListNode {
    pub first: Value,
    pub rest: Value,
}

/// One step of a `SEQ` iterator view (§4.D). Borrowing is modeled by
/// holding an `Rc` clone of the underlying container rather than a Rust
/// borrow with an explicit lifetime: the container is kept alive for as
/// long as the seq exists (invariant A.7) without requiring the seq to
/// be scoped to a stack frame.
#[derive(Debug)]
pub enum SeqCell {
    Vector { data: Rc<Vec<Value>>, index: usize },
    Map { data: Rc<Vec<(Value, Value)>>, index: usize },
    Str { data: Rc<str>, index: usize },
}

/// A user-defined function (§3 FUNCTION/CLOSURE). `spec.md` treats
/// `CLOSURE` as "an alias for FUNCTION with a non-empty captured
/// environment" rather than a distinct heap tag, so this crate has one
/// representation and [`FunctionData::is_closure`] tells them apart.
///
/// `defining_ns` is the namespace the `fn` form was evaluated in, not a
/// handle back to the function itself — breaking the `fn`/`def` cycle
/// the design notes call out (§9 "Cyclic environment/closure
/// references"): a namespace is a root owned by the interpreter state,
/// never owned by a function, so there is nothing for a function to
/// leak by holding a strong reference to it.
#[derive(Debug)]
pub struct FunctionData {
    pub name: Option<Symbol>,
    pub params: Vec<Symbol>,
    pub body: Rc<[Value]>,
    pub env: Env,
    pub defining_ns: Namespace,
}

impl FunctionData {
    pub fn is_closure(&self) -> bool {
        !self.env.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Callback a `NativeFn` uses to invoke an arbitrary `Value` as a
/// function, without `seq-core` needing to depend on the evaluator.
/// `seq-runtime` supplies the real implementation (`apply`); builtins
/// that don't need it (arithmetic, string ops, ...) simply ignore it.
pub type Applier<'a> = dyn Fn(&Value, &[Value]) -> EvalResult<Value> + 'a;

pub type NativeFnPtr = fn(args: &[Value], apply: &Applier) -> EvalResult<Value>;

/// A builtin (§3 NATIVE_FN): a function pointer plus the arity it
/// accepts. `max_arity: None` marks a variadic builtin (`+`, `str`, ...).
pub struct NativeFn {
    pub name: &'static str,
    pub min_arity: usize,
    pub max_arity: Option<usize>,
    pub func: NativeFnPtr,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({})", self.name)
    }
}

/// The payload of a raised exception (§3 ERROR, §4.G). Carries the same
/// closed `ErrorKind` set `EvalError` does, so a `(throw (error ...))`
/// value and an internally-raised `EvalError` print and `catch`-match
/// identically.
#[derive(Debug, Clone)]
pub struct ErrorValue {
    pub kind: crate::error::ErrorKind,
    pub message: Rc<str>,
    pub position: Option<crate::error::Position>,
}

impl From<crate::error::EvalError> for ErrorValue {
    fn from(e: crate::error::EvalError) -> Self {
        ErrorValue {
            kind: e.kind,
            message: Rc::from(e.message),
            position: e.position,
        }
    }
}

/// Decimal places carried by the fixed-point immediate (§3 "a reserved
/// short fixed-point form"). A `Value::Fixed(n)` denotes `n as f64 /
/// FIXED_SCALE as f64`; arithmetic on the scaled integer never touches a
/// float, matching the no-FPU embedded target.
pub const FIXED_SCALE: i64 = 1_000;

/// A Seq/Lisp value. See the module doc for the immediate/heap split.
#[derive(Debug, Clone)]
pub enum Value {
    // --- immediates ---
    Nil,
    Bool(bool),
    Int(i64),
    /// Fixed-point immediate, scaled by [`FIXED_SCALE`] (§3, §4.H numeric
    /// promotion: mixing an `Int` into arithmetic with a `Fixed` promotes
    /// the result to `Fixed`).
    Fixed(i64),
    Char(char),

    // --- heap objects (Rc-refcounted) ---
    String(Rc<str>),
    Symbol(Symbol),
    Keyword(Rc<str>),
    List(Rc<ListNode>),
    Vector(Rc<Vec<Value>>),
    Map(Rc<Vec<(Value, Value)>>),
    Seq(Rc<SeqCell>),
    Function(Rc<FunctionData>),
    Native(Rc<NativeFn>),
    Error(Rc<ErrorValue>),
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn keyword(name: impl Into<Rc<str>>) -> Value {
        let name: Rc<str> = name.into();
        debug_assert!(name.starts_with(':'), "keyword name must start with ':'");
        Value::Keyword(name)
    }

    pub fn cons(first: Value, rest: Value) -> Value {
        Value::List(Rc::new(ListNode { first, rest }))
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(Rc::new(items))
    }

    pub fn map(pairs: Vec<(Value, Value)>) -> Value {
        Value::Map(Rc::new(pairs))
    }

    pub fn error(e: crate::error::EvalError) -> Value {
        Value::Error(Rc::new(e.into()))
    }

    /// Truthiness (§4.H): only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// `(list? nil)` is `true` (§4.B): `nil` doubles as the empty list.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_) | Value::Nil)
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Value::Vector(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, Value::Keyword(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Fixed(_))
    }

    pub fn is_fn(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_))
    }

    pub fn is_seqable(&self) -> bool {
        matches!(
            self,
            Value::Nil | Value::List(_) | Value::Vector(_) | Value::Map(_) | Value::String(_) | Value::Seq(_)
        )
    }

    /// A short type name for error messages (`TypeError` wants "the
    /// actual type", §7).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Fixed(_) => "FixedPoint",
            Value::Char(_) => "Character",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Keyword(_) => "Keyword",
            Value::List(_) => "List",
            Value::Vector(_) => "Vector",
            Value::Map(_) => "Map",
            Value::Seq(_) => "Seq",
            Value::Function(f) if f.is_closure() => "Closure",
            Value::Function(_) => "Function",
            Value::Native(_) => "NativeFn",
            Value::Error(_) => "Error",
        }
    }
}

/// A lexical environment frame (§4.C's "environment" component, the
/// persistent ordered map `let`/`fn` bind into). Implemented as a chain
/// of small frames rather than one flat map so each `let`/invocation
/// only allocates the bindings it introduces; lookup walks outward,
/// shadowing inner-to-outer, exactly like the `Namespace` parent chain.
#[derive(Debug)]
struct EnvFrame {
    bindings: Vec<(Symbol, Value)>,
    parent: Option<Env>,
}

#[derive(Debug, Clone)]
pub struct Env(Option<Rc<EnvFrame>>);

impl Env {
    /// The empty environment — what a top-level (non-closing-over) `fn`
    /// captures, per `FunctionData::is_closure`.
    pub fn empty() -> Env {
        Env(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn extend(&self, bindings: Vec<(Symbol, Value)>) -> Env {
        Env(Some(Rc::new(EnvFrame {
            bindings,
            parent: Some(self.clone()),
        })))
    }

    pub fn get(&self, sym: &Symbol) -> Option<Value> {
        let mut frame = self.0.as_ref();
        while let Some(f) = frame {
            if let Some((_, v)) = f.bindings.iter().rev().find(|(k, _)| k == sym) {
                return Some(v.clone());
            }
            frame = f.parent.0.as_ref();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::intern_unqualified;

    #[test]
    fn truthiness_matches_spec() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Bool(true).is_truthy());
        assert!(Value::Int(0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::vector(vec![]).is_truthy());
    }

    #[test]
    fn fixed_point_is_a_number_not_an_integer() {
        assert!(Value::Fixed(1_500).is_number());
        assert_eq!(Value::Fixed(1_500).type_name(), "FixedPoint");
    }

    #[test]
    fn nil_is_a_list() {
        assert!(Value::Nil.is_list());
        assert!(Value::cons(Value::Int(1), Value::Nil).is_list());
        assert!(!Value::vector(vec![]).is_list());
    }

    #[test]
    fn env_shadowing_prefers_innermost() {
        let x = intern_unqualified("x");
        let outer = Env::empty().extend(vec![(x.clone(), Value::Int(1))]);
        let inner = outer.extend(vec![(x.clone(), Value::Int(2))]);
        assert!(matches!(inner.get(&x), Some(Value::Int(2))));
        assert!(matches!(outer.get(&x), Some(Value::Int(1))));
    }

    #[test]
    fn env_lookup_falls_through_to_parent() {
        let x = intern_unqualified("x");
        let y = intern_unqualified("y");
        let outer = Env::empty().extend(vec![(x.clone(), Value::Int(1))]);
        let inner = outer.extend(vec![(y.clone(), Value::Int(2))]);
        assert!(matches!(inner.get(&x), Some(Value::Int(1))));
        assert_eq!(inner.get(&intern_unqualified("missing")).is_none(), true);
    }

    #[test]
    fn function_without_captures_is_not_a_closure() {
        let ns = crate::namespace::ns_get_or_create("__value_test_ns__");
        let f = FunctionData {
            name: None,
            params: vec![],
            body: Rc::from(vec![Value::Nil]),
            env: Env::empty(),
            defining_ns: ns,
        };
        assert!(!f.is_closure());
    }
}
