//! End-to-end `parse -> eval -> pr_str` cases run through the public
//! `InterpreterState` API, one test per case.

use seq_runtime::{eval_string, new_state, pr_str};

fn run(src: &str) -> String {
    let state = new_state();
    let value = eval_string(src, &state).expect("evaluation failed");
    pr_str(&value)
}

#[test]
fn variadic_addition() {
    assert_eq!(run("(+ 1 2 3)"), "6");
}

#[test]
fn closure_over_a_squaring_fn() {
    assert_eq!(run("(def square (fn [x] (* x x))) (square 9)"), "81");
}

#[test]
fn tail_recursive_factorial() {
    let src = "(def factorial (fn [n] \
                 (loop [i n acc 1] \
                   (if (= i 0) acc (recur (- i 1) (* acc i)))))) \
               (factorial 10)";
    assert_eq!(run(src), "3628800");
}

#[test]
fn division_by_zero_is_catchable_and_stringifiable() {
    let src = r#"(try (/ 1 0) (catch ArithmeticError e (str "caught: " e)))"#;
    assert_eq!(run(src), "\"caught: Division by zero\"");
}

#[test]
fn array_map_get_and_keyword_lookup() {
    let src = "(let [m {:a 1 :b 2}] [(get m :a) (:b m) (count m)])";
    assert_eq!(run(src), "[1 2 2]");
}

#[test]
fn doseq_returns_nil() {
    let state = new_state();
    let value = eval_string("(doseq [x [10 20 30]] (println x))", &state).unwrap();
    assert_eq!(pr_str(&value), "nil");
}

#[test]
fn deep_recur_does_not_grow_the_c_stack() {
    let src = "(loop [n 1000000] (if (zero? n) :done (recur (dec n))))";
    assert_eq!(run(src), ":done");
}

#[test]
fn boundary_empty_list_is_nil_as_a_sequence() {
    assert_eq!(run("(first ())"), "nil");
    assert_eq!(run("(rest nil)"), "nil");
    assert_eq!(run(r#"(count "")"#), "0");
}

#[test]
fn boundary_nth_out_of_bounds_is_an_index_error() {
    let state = new_state();
    let err = eval_string("(nth [1 2 3] -1)", &state).unwrap_err();
    assert_eq!(err.kind, seq_runtime::ErrorKind::IndexError);
}

#[test]
fn boundary_def_rejects_a_reserved_special_form_name() {
    let state = new_state();
    let err = eval_string("(def if 1)", &state).unwrap_err();
    assert_eq!(err.kind, seq_runtime::ErrorKind::SyntaxError);
}
