//! Printable representations (§4.E "Printer", supplemented by
//! `SPEC_FULL.md`'s `pr-str`/`str` distinction).
//!
//! Grounded on the teacher lineage's SON formatter (`value_to_son` /
//! `SonConfig`): one recursive `format_value` walk, a config flag
//! steering a handful of call sites, output built into a `String` buf
//! rather than returned piecewise. `readable` here plays the role
//! `pretty` played there — `pr_str` (`readable: true`) produces a
//! string the reader could read back (strings quoted and escaped,
//! chars as `\c`); `to_display_string` (`readable: false`, what `str`
//! and `println` use) unwraps strings and chars to their raw bytes and
//! leaves every other type printed the same way.

use crate::value::{SeqCell, Value, FIXED_SCALE};

struct PrintConfig {
    readable: bool,
}

/// `(pr-str x)`: a representation the reader could parse back.
pub fn pr_str(v: &Value) -> String {
    let mut buf = String::new();
    format_value(v, &PrintConfig { readable: true }, &mut buf);
    buf
}

/// `(str x)` / what `println` writes: strings and characters print
/// their raw contents instead of a quoted/escaped literal.
pub fn to_display_string(v: &Value) -> String {
    let mut buf = String::new();
    format_value(v, &PrintConfig { readable: false }, &mut buf);
    buf
}

fn format_value(v: &Value, config: &PrintConfig, buf: &mut String) {
    match v {
        Value::Nil => buf.push_str("nil"),
        Value::Bool(b) => buf.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => buf.push_str(&n.to_string()),
        Value::Fixed(scaled) => format_fixed(*scaled, buf),
        Value::Char(c) => {
            if config.readable {
                buf.push('\\');
                buf.push(*c);
            } else {
                buf.push(*c);
            }
        }
        Value::String(s) => {
            if config.readable {
                format_quoted_string(s, buf);
            } else {
                buf.push_str(s);
            }
        }
        Value::Symbol(s) => buf.push_str(&s.to_string()),
        Value::Keyword(k) => buf.push_str(k),
        Value::List(_) => format_list(v, config, buf),
        Value::Vector(items) => format_bracketed(items.iter(), '[', ']', config, buf),
        Value::Map(pairs) => format_map(pairs, config, buf),
        Value::Seq(cell) => format_seq_cell(cell, config, buf),
        Value::Function(f) => {
            let name = f.name.as_ref().map(|s| s.to_string()).unwrap_or_else(|| "anonymous".to_string());
            buf.push_str(&format!("#<{}:{}>", v.type_name(), name));
        }
        Value::Native(f) => buf.push_str(&format!("#<NativeFn:{}>", f.name)),
        Value::Error(e) => buf.push_str(&format!("#<Error:{} {}>", e.kind, e.message)),
    }
}

/// Print a `Fixed` immediate as `[-]whole.frac` with exactly three
/// fractional digits, so the reader's fixed-point literal grammar parses
/// it back to the same scaled integer (invariant 2, §8).
fn format_fixed(scaled: i64, buf: &mut String) {
    if scaled < 0 {
        buf.push('-');
    }
    let abs = scaled.unsigned_abs();
    let whole = abs / FIXED_SCALE as u64;
    let frac = abs % FIXED_SCALE as u64;
    buf.push_str(&whole.to_string());
    buf.push('.');
    buf.push_str(&format!("{frac:03}"));
}

fn format_quoted_string(s: &str, buf: &mut String) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            c => buf.push(c),
        }
    }
    buf.push('"');
}

fn format_bracketed<'a>(
    items: impl Iterator<Item = &'a Value>,
    open: char,
    close: char,
    config: &PrintConfig,
    buf: &mut String,
) {
    buf.push(open);
    let mut first = true;
    for item in items {
        if !first {
            buf.push(' ');
        }
        first = false;
        format_value(item, config, buf);
    }
    buf.push(close);
}

fn format_map(pairs: &[(Value, Value)], config: &PrintConfig, buf: &mut String) {
    buf.push('{');
    for (i, (k, v)) in pairs.iter().enumerate() {
        if i > 0 {
            buf.push(' ');
        }
        format_value(k, config, buf);
        buf.push(' ');
        format_value(v, config, buf);
    }
    buf.push('}');
}

fn format_seq_cell(cell: &SeqCell, config: &PrintConfig, buf: &mut String) {
    match cell {
        SeqCell::Vector { data, index } => format_bracketed(data[*index..].iter(), '(', ')', config, buf),
        SeqCell::Map { data, index } => {
            buf.push('(');
            for (i, (k, v)) in data[*index..].iter().enumerate() {
                if i > 0 {
                    buf.push(' ');
                }
                format_bracketed([k, v].into_iter(), '[', ']', config, buf);
            }
            buf.push(')');
        }
        SeqCell::Str { data, index } => {
            buf.push('(');
            for (i, c) in data.chars().skip(*index).enumerate() {
                if i > 0 {
                    buf.push(' ');
                }
                format_value(&Value::Char(c), config, buf);
            }
            buf.push(')');
        }
    }
}

fn format_list(v: &Value, config: &PrintConfig, buf: &mut String) {
    buf.push('(');
    let mut cursor = v.clone();
    let mut first = true;
    while let Value::List(node) = cursor {
        if !first {
            buf.push(' ');
        }
        first = false;
        format_value(&node.first, config, buf);
        cursor = node.rest.clone();
    }
    buf.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn nil_true_false() {
        assert_eq!(pr_str(&Value::Nil), "nil");
        assert_eq!(pr_str(&Value::Bool(true)), "true");
        assert_eq!(pr_str(&Value::Bool(false)), "false");
    }

    #[test]
    fn pr_str_quotes_and_escapes_strings() {
        assert_eq!(pr_str(&Value::string("a\nb")), r#""a\nb""#);
    }

    #[test]
    fn display_string_unwraps_quotes() {
        assert_eq!(to_display_string(&Value::string("hello")), "hello");
    }

    #[test]
    fn vectors_print_bracketed() {
        let v = Value::vector(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(pr_str(&v), "[1 2]");
    }

    #[test]
    fn lists_print_parenthesized() {
        let l = Value::cons(Value::Int(1), Value::cons(Value::Int(2), Value::Nil));
        assert_eq!(pr_str(&l), "(1 2)");
    }

    #[test]
    fn empty_list_prints_as_nil() {
        assert_eq!(pr_str(&Value::Nil), "nil");
    }

    #[test]
    fn maps_print_as_braces_with_flat_pairs() {
        let m = Value::map(vec![(Value::keyword(":a"), Value::Int(1))]);
        assert_eq!(pr_str(&m), "{:a 1}");
    }

    #[test]
    fn fixed_point_prints_three_fractional_digits() {
        assert_eq!(pr_str(&Value::Fixed(3140)), "3.140");
        assert_eq!(pr_str(&Value::Fixed(-500)), "-0.500");
    }

    #[test]
    fn keywords_print_with_leading_colon() {
        assert_eq!(pr_str(&Value::keyword(":foo")), ":foo");
    }

    #[test]
    fn native_fn_prints_its_name() {
        fn noop(_: &[Value], _: &crate::value::Applier) -> crate::error::EvalResult<Value> {
            Ok(Value::Nil)
        }
        let f = Value::Native(Rc::new(crate::value::NativeFn {
            name: "+",
            min_arity: 0,
            max_arity: None,
            func: noop,
        }));
        assert_eq!(pr_str(&f), "#<NativeFn:+>");
    }
}
