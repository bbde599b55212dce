//! Output builtins (§6): `println`/`print` write the display form,
//! `prn` writes the readable form — the same `to_display_string`/
//! `pr_str` split `string_ops.rs` uses for `str`/`pr-str`.

use std::io::Write;

use seq_core::error::EvalResult;
use seq_core::print::{pr_str, to_display_string};
use seq_core::value::{Applier, Value};

fn joined(args: &[Value], render: fn(&Value) -> String) -> String {
    args.iter().map(render).collect::<Vec<_>>().join(" ")
}

pub fn println_fn(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    println!("{}", joined(args, to_display_string));
    Ok(Value::Nil)
}

pub fn print_fn(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    print!("{}", joined(args, to_display_string));
    let _ = std::io::stdout().flush();
    Ok(Value::Nil)
}

pub fn prn_fn(args: &[Value], _apply: &Applier) -> EvalResult<Value> {
    println!("{}", joined(args, pr_str));
    Ok(Value::Nil)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_apply(_: &Value, _: &[Value]) -> EvalResult<Value> {
        Ok(Value::Nil)
    }

    #[test]
    fn println_returns_nil() {
        assert_eq!(println_fn(&[Value::Int(1)], &noop_apply).unwrap(), Value::Nil);
    }

    #[test]
    fn prn_returns_nil_too() {
        assert_eq!(prn_fn(&[Value::string("x")], &noop_apply).unwrap(), Value::Nil);
    }
}
