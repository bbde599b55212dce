//! Typed evaluator errors.
//!
//! Every fallible operation in `seq-core`, `seq-reader`, and `seq-runtime`
//! returns `Result<_, EvalError>` rather than panicking. `ErrorKind` is the
//! closed set named in the design: reader failures, symbol resolution,
//! type mismatches, arity mismatches, syntax violations, out-of-bounds
//! access, arithmetic faults, namespace errors, and the two exhaustion
//! cases (`StackOverflow`, `OutOfMemory`).

use std::fmt;

/// A source position, when the failing form came from text the reader
/// tokenized. `None` for errors raised on synthesized values (e.g. by a
/// host embedding that built a form by hand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ReaderError,
    SymbolError,
    TypeError,
    ArityError,
    SyntaxError,
    IndexError,
    ArithmeticError,
    NumberFormatError,
    NamespaceError,
    StackOverflowError,
    OutOfMemory,
    RuntimeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::ReaderError => "ReaderError",
            ErrorKind::SymbolError => "SymbolError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ArityError => "ArityError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::IndexError => "IndexError",
            ErrorKind::ArithmeticError => "ArithmeticError",
            ErrorKind::NumberFormatError => "NumberFormatError",
            ErrorKind::NamespaceError => "NamespaceError",
            ErrorKind::StackOverflowError => "StackOverflowError",
            ErrorKind::OutOfMemory => "OutOfMemory",
            ErrorKind::RuntimeError => "RuntimeError",
        };
        f.write_str(s)
    }
}

/// A raised exception: a `kind`, a human-readable `message`, an optional
/// source `position`, and for user-level `(throw x)`, the thrown `Value`
/// itself (carried as an opaque payload here so `seq-core` doesn't need
/// to depend on its own `Value` type in a cycle; `seq-runtime` attaches
/// it via `with_payload`).
#[derive(Debug, Clone)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Option<Position>,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
        }
    }

    pub fn at(kind: ErrorKind, message: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        if self.position.is_none() {
            self.position = Some(position);
        }
        self
    }

    pub fn symbol_unresolved(name: &str) -> Self {
        Self::new(
            ErrorKind::SymbolError,
            format!("Unable to resolve symbol: {name} in this context"),
        )
    }

    pub fn type_error(expected_shape: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("{got} cannot be used as a {expected_shape}"),
        )
    }

    pub fn not_a_function(got: &str) -> Self {
        Self::new(ErrorKind::TypeError, format!("{got} is not a function"))
    }

    pub fn arity(name: &str, expected: &str, got: usize) -> Self {
        Self::new(
            ErrorKind::ArityError,
            format!("{name}: expected {expected} argument(s), got {got}"),
        )
    }

    pub fn index_out_of_bounds(index: i64, count: usize) -> Self {
        Self::new(
            ErrorKind::IndexError,
            format!("index {index} out of bounds for collection of size {count}"),
        )
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::ArithmeticError, "Division by zero")
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{}: {} ({pos})", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_position_when_present() {
        let err = EvalError::at(ErrorKind::IndexError, "index -1 out of bounds", Position::new(3, 7));
        assert_eq!(err.to_string(), "IndexError: index -1 out of bounds (3:7)");
    }

    #[test]
    fn display_omits_position_when_absent() {
        let err = EvalError::new(ErrorKind::TypeError, "oops");
        assert_eq!(err.to_string(), "TypeError: oops");
    }

    #[test]
    fn with_position_does_not_override_existing() {
        let err = EvalError::at(ErrorKind::SyntaxError, "bad", Position::new(1, 1))
            .with_position(Position::new(9, 9));
        assert_eq!(err.position, Some(Position::new(1, 1)));
    }
}
