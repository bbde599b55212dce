//! Wires every builtin into the `core` namespace a fresh interpreter
//! state parents every other namespace to (§6). One table, built once per
//! `InterpreterState::new` — repeat `install()` calls just overwrite the
//! same bindings, which keeps `reset_registry()`-based test isolation
//! cheap.

use std::rc::Rc;

use seq_core::namespace::{ns_get_or_create, Namespace, CORE_NS};
use seq_core::symbol::intern_unqualified;
use seq_core::value::{NativeFn, NativeFnPtr, Value};

use crate::eval::error_ctor;
use crate::{arithmetic, io, predicates, sequence_ops, string_ops};

fn native(name: &'static str, min_arity: usize, max_arity: Option<usize>, func: NativeFnPtr) -> Value {
    Value::Native(Rc::new(NativeFn { name, min_arity, max_arity, func }))
}

/// Install the minimum-viable builtin set (§6) into `core`. Returns the
/// `core` namespace for convenience.
pub fn install() -> Namespace {
    let core = ns_get_or_create(CORE_NS);
    let mut defs: Vec<(&'static str, Value)> = Vec::new();

    macro_rules! def {
        ($name:literal, $min:expr, $max:expr, $func:expr) => {
            defs.push(($name, native($name, $min, $max, $func)));
        };
    }

    // Arithmetic (§6). All variadic with Clojure-standard identities.
    def!("+", 0, None, arithmetic::add);
    def!("-", 1, None, arithmetic::sub);
    def!("*", 0, None, arithmetic::mul);
    def!("/", 1, None, arithmetic::div);
    def!("=", 1, None, arithmetic::eq);
    def!("<", 1, None, arithmetic::lt);
    def!(">", 1, None, arithmetic::gt);
    def!("<=", 1, None, arithmetic::le);
    def!(">=", 1, None, arithmetic::ge);
    def!("inc", 1, Some(1), arithmetic::inc);
    def!("dec", 1, Some(1), arithmetic::dec);

    // Predicates.
    def!("nil?", 1, Some(1), predicates::is_nil);
    def!("true?", 1, Some(1), predicates::is_true);
    def!("false?", 1, Some(1), predicates::is_false);
    def!("zero?", 1, Some(1), predicates::is_zero);
    def!("pos?", 1, Some(1), predicates::is_pos);
    def!("neg?", 1, Some(1), predicates::is_neg);
    def!("number?", 1, Some(1), predicates::is_number);
    def!("string?", 1, Some(1), predicates::is_string);
    def!("symbol?", 1, Some(1), predicates::is_symbol);
    def!("keyword?", 1, Some(1), predicates::is_keyword);
    def!("list?", 1, Some(1), predicates::is_list);
    def!("vector?", 1, Some(1), predicates::is_vector);
    def!("map?", 1, Some(1), predicates::is_map);
    def!("seq?", 1, Some(1), predicates::is_seq);
    def!("fn?", 1, Some(1), predicates::is_fn);
    def!("not", 1, Some(1), predicates::not);

    // Sequence and collection operations.
    def!("first", 1, Some(1), sequence_ops::first);
    def!("rest", 1, Some(1), sequence_ops::rest);
    def!("next", 1, Some(1), sequence_ops::next);
    def!("seq", 1, Some(1), sequence_ops::seq);
    def!("cons", 2, Some(2), sequence_ops::cons);
    def!("count", 1, Some(1), sequence_ops::count);
    def!("list", 0, None, sequence_ops::list);
    def!("vector", 0, None, sequence_ops::vector);
    def!("hash-map", 0, None, sequence_ops::hash_map);
    def!("vec", 1, Some(1), sequence_ops::vec);
    def!("conj", 1, None, sequence_ops::conj);
    def!("assoc", 3, None, sequence_ops::assoc);
    def!("dissoc", 1, None, sequence_ops::dissoc);
    def!("get", 2, Some(3), sequence_ops::get);
    def!("contains?", 2, Some(2), sequence_ops::contains);
    def!("keys", 1, Some(1), sequence_ops::keys);
    def!("vals", 1, Some(1), sequence_ops::vals);
    def!("nth", 2, Some(3), sequence_ops::nth);
    def!("apply", 2, None, sequence_ops::apply);
    def!("map", 2, None, sequence_ops::map);
    def!("filter", 2, Some(2), sequence_ops::filter);
    def!("reduce", 2, Some(3), sequence_ops::reduce);

    // Strings and I/O.
    def!("str", 0, None, string_ops::str_fn);
    def!("pr-str", 0, None, string_ops::pr_str_fn);
    def!("println", 0, None, io::println_fn);
    def!("print", 0, None, io::print_fn);
    def!("prn", 0, None, io::prn_fn);

    // Exception construction (`throw` expects a `Value::Error`, §4.G).
    def!("error", 2, Some(2), error_ctor);

    for (name, value) in defs {
        core.define(intern_unqualified(name), value);
    }
    core
}

#[cfg(test)]
mod tests {
    use super::*;
    use seq_core::error::EvalResult;

    fn call_fixture(f: &Value, args: &[Value]) -> EvalResult<Value> {
        match f {
            Value::Native(n) => (n.func)(args, &call_fixture),
            _ => unreachable!(),
        }
    }

    #[test]
    fn installs_plus_and_first_into_core() {
        seq_core::namespace::reset_registry();
        let core = install();
        let plus = core.get_local(&intern_unqualified("+")).unwrap();
        let result = call_fixture(&plus, &[Value::Int(1), Value::Int(2)]).unwrap();
        assert_eq!(result, Value::Int(3));

        let first = core.get_local(&intern_unqualified("first")).unwrap();
        let v = Value::vector(vec![Value::Int(9), Value::Int(10)]);
        assert_eq!(call_fixture(&first, std::slice::from_ref(&v)).unwrap(), Value::Int(9));
    }

    #[test]
    fn user_namespace_resolves_through_core() {
        seq_core::namespace::reset_registry();
        install();
        let user = ns_get_or_create("user");
        assert!(user.resolve(&intern_unqualified("println")).is_some());
    }
}
