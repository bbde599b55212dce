//! Seq Runtime: the tree-walking evaluator (§4.F), the exception stack
//! (§4.G), the builtin library (§6), and [`InterpreterState`], the
//! library API a host embeds against.
//!
//! This crate stays logging-free, matching [`seq_core`]: failures flow
//! through `EvalError`, never through a log line. The REPL consumer is
//! where `tracing` gets installed.

pub mod arithmetic;
pub mod builtins;
pub mod eval;
pub mod exceptions;
pub mod io;
pub mod predicates;
pub mod sequence_ops;
pub mod string_ops;

use seq_core::error::EvalResult;
use seq_core::namespace::{ns_get_or_create, Namespace, DEFAULT_NS};
use seq_core::pool::{pool_depth, pool_push, pool_unwind_to};
use seq_core::value::{Env, Value};

pub use seq_core::error::{ErrorKind, EvalError, Position};
pub use seq_core::print::pr_str as pr_str_fn;

/// One interpreter: the namespace a form is currently evaluated in, plus
/// the (always-empty-at-top-level) lexical environment top-level forms
/// start from. Namespaces and the symbol table are their own process-wide
/// registries (§5 "Shared mutable state"), so this struct is small —
/// a cursor into that shared state, not a copy of it.
pub struct InterpreterState {
    current_ns: Namespace,
}

/// Fresh interpreter state with `user` as the current namespace (§6).
/// Installs the builtin library into `core` on first call; subsequent
/// calls are cheap (`builtins::install` just re-defines the same names).
pub fn new_state() -> InterpreterState {
    builtins::install();
    InterpreterState {
        current_ns: ns_get_or_create(DEFAULT_NS),
    }
}

/// Releases all heap the interpreter can reach on its own. In this
/// `Rc`-refcounted representation that is exactly dropping the state
/// (§6 "releases all heap") — anything still referenced from outside
/// (e.g. a `Value` the host is holding onto) is kept alive by its own
/// handle, which is the correct refcounted behavior, not a leak.
pub fn free_state(state: InterpreterState) {
    drop(state);
}

/// `parse(src, s)`: the first form in `src` (or `None` on empty/
/// comment-only input), or a `ReaderError`. Does not consult `s` beyond
/// using it as the evidence a state exists at the call site — parsing
/// has no namespace dependency, matching the reader crate's own API.
pub fn parse(src: &str, _state: &InterpreterState) -> EvalResult<Option<Value>> {
    seq_reader::read_one(src)
}

/// `eval(form, s)`: evaluate one already-parsed form in `s`'s current
/// namespace and a fresh top-level (empty) lexical environment.
///
/// Brackets the call with a pool frame (§3 "Lifecycle": "the evaluator
/// pushes a pool at entry to `eval` of a top-level form"), so invariant
/// 7 (§8: a top-level `eval` returns with the pool at exactly its entry
/// depth) holds even if the form's own evaluation unwinds through an
/// uncaught exception rather than returning normally.
pub fn eval(form: &Value, state: &InterpreterState) -> EvalResult<Value> {
    let marker = pool_depth();
    pool_push();
    let result = eval::eval(form, &state.current_ns, &Env::empty());
    pool_unwind_to(marker);
    result
}

/// `eval_string(src, s)`: parse and evaluate every form in `src` in
/// order (§5 "do and implicit do bodies are left-to-right"), returning
/// the value of the last one. Empty input evaluates to `nil`.
pub fn eval_string(src: &str, state: &InterpreterState) -> EvalResult<Value> {
    let forms = seq_reader::read_all(src)?;
    let mut last = Value::Nil;
    for form in &forms {
        last = eval(form, state)?;
    }
    Ok(last)
}

/// `pr_str(v)`: the printable, readable representation (§3 `pr_str`
/// contract) — strings quoted, `nil`/`true`/`false` literal, collections
/// in their reader syntax.
pub fn pr_str(v: &Value) -> String {
    seq_core::print::pr_str(v)
}

/// `set_ns(s, name)`: switch `s`'s current namespace, creating it
/// (parented to `core`) if it does not already exist.
pub fn set_ns(state: &mut InterpreterState, name: &str) {
    state.current_ns = ns_get_or_create(name);
}

impl InterpreterState {
    /// The symbol naming the current namespace, for consumers (e.g. a
    /// REPL prompt) that want to display it without reaching into
    /// `seq_core` themselves.
    pub fn current_ns_name(&self) -> seq_core::symbol::Symbol {
        self.current_ns.name().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> InterpreterState {
        seq_core::namespace::reset_registry();
        new_state()
    }

    #[test]
    fn new_state_starts_in_user_namespace() {
        let state = fresh();
        assert_eq!(state.current_ns.name().name(), DEFAULT_NS);
    }

    #[test]
    fn eval_string_runs_every_form_and_returns_the_last() {
        let state = fresh();
        let result = eval_string("(def x 1) (def y 2) (+ x y)", &state).unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn pr_str_quotes_strings() {
        assert_eq!(pr_str(&Value::string("hi")), "\"hi\"");
    }

    #[test]
    fn set_ns_switches_the_current_namespace() {
        let mut state = fresh();
        set_ns(&mut state, "scratch");
        eval_string("(def x 42)", &state).unwrap();
        assert_eq!(state.current_ns.name().name(), "scratch");
        assert!(ns_get_or_create("scratch").get_local(&seq_core::symbol::intern_unqualified("x")).is_some());
    }

    #[test]
    fn division_by_zero_is_catchable() {
        let state = fresh();
        let result = eval_string(
            "(try (/ 1 0) (catch ArithmeticError e (str \"caught: \" e)))",
            &state,
        )
        .unwrap();
        match result {
            Value::String(s) => assert!(s.contains("caught: Division by zero")),
            other => panic!("expected a String, got {other:?}"),
        }
    }

    #[test]
    fn closures_and_tail_recursion_end_to_end() {
        let state = fresh();
        eval_string("(def square (fn [x] (* x x)))", &state).unwrap();
        assert_eq!(eval_string("(square 5)", &state).unwrap(), Value::Int(25));

        eval_string(
            "(def factorial (fn [n] (loop [i n acc 1] (if (zero? i) acc (recur (- i 1) (* acc i))))))",
            &state,
        )
        .unwrap();
        assert_eq!(eval_string("(factorial 5)", &state).unwrap(), Value::Int(120));
    }

    #[test]
    fn map_literal_access_by_keyword_and_get() {
        let state = fresh();
        let result = eval_string("(let [m {:a 1 :b 2}] (+ (:a m) (get m :b)))", &state).unwrap();
        assert_eq!(result, Value::Int(3));
    }

    #[test]
    fn top_level_eval_returns_at_entry_pool_depth() {
        let state = fresh();
        let before = seq_core::pool::pool_depth();
        eval_string("(+ 1 (* 2 3) [1 2 3] {:a 1})", &state).unwrap();
        assert_eq!(seq_core::pool::pool_depth(), before);

        // Same invariant holds when the form raises instead of returning.
        let before = seq_core::pool::pool_depth();
        assert!(eval_string("(/ 1 0)", &state).is_err());
        assert_eq!(seq_core::pool::pool_depth(), before);
    }
}
