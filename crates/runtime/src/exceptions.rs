//! The exception stack (§4.G): `(error kind msg)` construction, and the
//! `ErrorValue` <-> `EvalError` conversion `throw`/`catch` need to move a
//! raised condition across the `Result` boundary the evaluator already
//! uses for every other fallible operation.

use seq_core::error::{ErrorKind, EvalError};
use seq_core::value::ErrorValue;

/// `(error :kind "message")`: build an `Error` value from a keyword
/// naming one of the closed `ErrorKind` variants. An unrecognized keyword
/// falls back to `RuntimeError` rather than failing to construct the
/// error at all — the same "don't panic on user input" stance the rest
/// of the evaluator takes.
pub fn kind_from_keyword(name: &str) -> ErrorKind {
    match name.trim_start_matches(':') {
        "ReaderError" => ErrorKind::ReaderError,
        "SymbolError" => ErrorKind::SymbolError,
        "TypeError" => ErrorKind::TypeError,
        "ArityError" => ErrorKind::ArityError,
        "SyntaxError" => ErrorKind::SyntaxError,
        "IndexError" => ErrorKind::IndexError,
        "ArithmeticError" => ErrorKind::ArithmeticError,
        "NumberFormatError" => ErrorKind::NumberFormatError,
        "NamespaceError" => ErrorKind::NamespaceError,
        "StackOverflowError" => ErrorKind::StackOverflowError,
        "OutOfMemory" => ErrorKind::OutOfMemory,
        _ => ErrorKind::RuntimeError,
    }
}

pub fn error_value_to_eval_error(e: &ErrorValue) -> EvalError {
    match e.position {
        Some(pos) => EvalError::at(e.kind, e.message.to_string(), pos),
        None => EvalError::new(e.kind, e.message.to_string()),
    }
}

/// A `catch` clause's declared type name matches an `EvalError` either
/// exactly (`ArithmeticError`) or via the universal `Exception` alias
/// every `ErrorKind` satisfies — `catch`'s equivalent of catching `Throwable`.
pub fn catch_matches(type_name: &str, kind: ErrorKind) -> bool {
    type_name == "Exception" || type_name == kind.to_string().as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_maps_to_known_kind() {
        assert_eq!(kind_from_keyword(":ArithmeticError"), ErrorKind::ArithmeticError);
    }

    #[test]
    fn unknown_keyword_falls_back_to_runtime_error() {
        assert_eq!(kind_from_keyword(":totally-made-up"), ErrorKind::RuntimeError);
    }

    #[test]
    fn catch_all_alias_matches_every_kind() {
        assert!(catch_matches("Exception", ErrorKind::IndexError));
        assert!(catch_matches("ArithmeticError", ErrorKind::ArithmeticError));
        assert!(!catch_matches("ArithmeticError", ErrorKind::IndexError));
    }

    #[test]
    fn round_trips_through_error_value() {
        let original = EvalError::new(ErrorKind::TypeError, "bad shape");
        let ev: ErrorValue = original.clone().into();
        let back = error_value_to_eval_error(&ev);
        assert_eq!(back.kind, original.kind);
        assert_eq!(back.message, original.message);
    }
}
