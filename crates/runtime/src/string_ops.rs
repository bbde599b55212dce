//! String-producing builtins (§6, supplemented): `str` concatenates the
//! display form of every argument; `pr-str` does the same with the
//! readable form, matching how this lineage keeps `to_display_string`
//! and `pr_str` as the only two printers and lets every builtin pick
//! one.

use seq_core::error::EvalResult;
use seq_core::print::{pr_str, to_display_string};
use seq_core::value::{Applier, Value};

pub fn str_fn(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let mut out = String::new();
    for v in args {
        out.push_str(&to_display_string(v));
    }
    Ok(Value::string(out))
}

pub fn pr_str_fn(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    let rendered: Vec<String> = args.iter().map(pr_str).collect();
    Ok(Value::string(rendered.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_apply(_: &Value, _: &[Value]) -> EvalResult<Value> {
        Ok(Value::Nil)
    }

    #[test]
    fn str_concatenates_display_forms_without_quoting() {
        let args = vec![Value::string("a"), Value::Int(1), Value::string("b")];
        assert_eq!(str_fn(&args, &noop_apply).unwrap(), Value::string("a1b"));
    }

    #[test]
    fn str_of_no_args_is_empty_string() {
        assert_eq!(str_fn(&[], &noop_apply).unwrap(), Value::string(""));
    }

    #[test]
    fn pr_str_quotes_embedded_strings() {
        let args = vec![Value::string("a")];
        assert_eq!(pr_str_fn(&args, &noop_apply).unwrap(), Value::string("\"a\""));
    }
}
