//! Seq Core: value representation, persistent collections, the
//! sequence protocol, symbol/namespace interning, and the autorelease
//! pool — the data model §3/§4.A-D describe, with no evaluator attached.
//!
//! # Modules
//!
//! - `error`: the `EvalError`/`EvalResult` error type shared by every
//!   crate in the workspace.
//! - `symbol`: process-(thread-)wide symbol interning for pointer-equality
//!   dispatch.
//! - `namespace`: the namespace registry symbols resolve against.
//! - `value`: the `Value` enum, `Env` lexical-binding chain, and the
//!   function/native-fn/error payload types.
//! - `equality`: structural equality (`clj_equal`) and the `PartialEq`
//!   impl that defers to it.
//! - `pool`: the autorelease pool (`retain`/`release`/`autorelease`,
//!   scoped `pool_push`/`pool_pop`/`pool_unwind_to`).
//! - `collections`: list/vector/array-map operations, copy-on-write via
//!   `Rc::make_mut`.
//! - `seq`: the sequence protocol (`seq`/`first`/`rest`/`next`/`count`)
//!   unifying list/vector/map/string/nil under one cursor type.
//! - `print`: `pr-str` (readable) and `str`/`println` (display) output.

pub mod collections;
pub mod equality;
pub mod error;
pub mod namespace;
pub mod pool;
pub mod print;
pub mod seq;
pub mod symbol;
pub mod value;

pub use collections::{
    list_count, list_first, list_nth, list_rest, map_assoc, map_contains, map_count, map_dissoc,
    map_get, map_keys, map_make, map_vals, vector_assoc, vector_conj, vector_count, vector_make,
    vector_nth,
};
pub use equality::clj_equal;
pub use error::{ErrorKind, EvalError, EvalResult, Position};
pub use namespace::{ns_get_or_create, reset_registry, Namespace, CORE_NS, DEFAULT_NS};
pub use pool::{autorelease, pool_depth, pool_pop, pool_push, pool_unwind_to, release, retain};
pub use print::{pr_str, to_display_string};
pub use seq::{collect, cons, count, first, is_empty, next, rest, seq_ctor, seqable_to_list};
pub use symbol::{intern, intern_unqualified, is_reserved_name, with_reserved, Reserved, Symbol};
pub use value::{
    Applier, Env, ErrorValue, FunctionData, ListNode, NativeFn, NativeFnPtr, SeqCell, Value, FIXED_SCALE,
};
