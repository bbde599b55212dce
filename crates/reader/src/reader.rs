//! Tokenizer and recursive-descent parser (§4.E). Grounded on the
//! teacher lineage's `compiler::parser` module: a `Token{text, line,
//! column}` produced by a single char-by-char scan, fed to a
//! hand-written recursive-descent parser — except here the parser
//! builds a `Value` graph directly rather than a separate AST, since
//! the reader's whole job is "produce the data the evaluator reduces".

use std::rc::Rc;

use seq_core::error::{ErrorKind, EvalError, EvalResult, Position};
use seq_core::symbol::intern;
use seq_core::value::{Value, FIXED_SCALE};

#[derive(Debug, Clone)]
struct Token {
    text: String,
    line: u32,
    column: u32,
}

impl Token {
    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

fn reader_error(message: impl Into<String>, pos: Position) -> EvalError {
    EvalError::at(ErrorKind::ReaderError, message, pos)
}

/// Scan `source` into a flat token stream. Whitespace is consumed and
/// dropped; `;` line comments are consumed and dropped; strings and
/// character literals are each captured as one token (with their
/// delimiters/prefix included) for `parse_atom` to decode.
fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_line = 0u32;
    let mut current_col = 0u32;

    let mut line = 0u32;
    let mut col = 0u32;

    let mut chars = source.chars().peekable();

    macro_rules! flush {
        () => {
            if !current.is_empty() {
                tokens.push(Token { text: std::mem::take(&mut current), line: current_line, column: current_col });
            }
        };
    }

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                flush!();
                let start_line = line;
                let start_col = col;
                let mut text = String::from("\"");
                col += 1;
                let mut closed = false;
                while let Some(c) = chars.next() {
                    text.push(c);
                    if c == '\n' {
                        line += 1;
                        col = 0;
                    } else {
                        col += 1;
                    }
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            text.push(escaped);
                            col += 1;
                        }
                        continue;
                    }
                    if c == '"' {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    tokens.push(Token {
                        text: "<<<UNCLOSED_STRING>>>".to_string(),
                        line: start_line,
                        column: start_col,
                    });
                } else {
                    tokens.push(Token { text, line: start_line, column: start_col });
                }
            }
            ';' => {
                flush!();
                for c in chars.by_ref() {
                    col += 1;
                    if c == '\n' {
                        line += 1;
                        col = 0;
                        break;
                    }
                }
            }
            '(' | ')' | '[' | ']' | '{' | '}' | '\'' | '^' => {
                flush!();
                tokens.push(Token { text: ch.to_string(), line, column: col });
                col += 1;
            }
            c if c.is_whitespace() => {
                flush!();
                if c == '\n' {
                    line += 1;
                    col = 0;
                } else {
                    col += 1;
                }
            }
            '\\' => {
                flush!();
                let start_line = line;
                let start_col = col;
                let mut text = String::from("\\");
                col += 1;
                if let Some(&first) = chars.peek() {
                    chars.next();
                    text.push(first);
                    col += 1;
                    if first.is_alphanumeric() {
                        while let Some(&c) = chars.peek() {
                            if c.is_alphanumeric() || c == '-' {
                                text.push(c);
                                col += 1;
                                chars.next();
                            } else {
                                break;
                            }
                        }
                    }
                }
                tokens.push(Token { text, line: start_line, column: start_col });
            }
            c => {
                if current.is_empty() {
                    current_line = line;
                    current_col = col;
                }
                current.push(c);
                col += 1;
            }
        }
    }
    flush!();
    tokens
}

/// A resumable reader over one source text: each call to [`Reader::next_form`]
/// advances the cursor and returns the next top-level form, matching
/// `parse(src, state)`'s "repeated calls advance state" contract (§6).
pub struct Reader {
    tokens: Vec<Token>,
    pos: usize,
}

impl Reader {
    pub fn new(source: &str) -> Reader {
        Reader { tokens: tokenize(source), pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Parse and return the next top-level form, or `None` at end of input.
    pub fn next_form(&mut self) -> EvalResult<Option<Value>> {
        match self.advance() {
            None => Ok(None),
            Some(tok) => Ok(Some(self.parse_token(tok)?)),
        }
    }

    fn parse_token(&mut self, tok: Token) -> EvalResult<Value> {
        match tok.text.as_str() {
            "<<<UNCLOSED_STRING>>>" => {
                Err(reader_error("unterminated string literal", tok.position()))
            }
            "(" => {
                let items = self.parse_seq_until(")", &tok)?;
                Ok(items.into_iter().rev().fold(Value::Nil, |acc, x| Value::cons(x, acc)))
            }
            "[" => {
                let items = self.parse_seq_until("]", &tok)?;
                Ok(Value::vector(items))
            }
            "{" => {
                let items = self.parse_seq_until("}", &tok)?;
                if items.len() % 2 != 0 {
                    return Err(reader_error("map literal requires an even number of forms", tok.position()));
                }
                let pairs = items.chunks(2).map(|c| (c[0].clone(), c[1].clone())).collect();
                Ok(Value::map(pairs))
            }
            ")" | "]" | "}" => Err(reader_error(format!("unexpected '{}'", tok.text), tok.position())),
            "'" => {
                let inner = self.require_next_form(&tok)?;
                let quote = Value::Symbol(intern(None, "quote"));
                Ok(Value::cons(quote, Value::cons(inner, Value::Nil)))
            }
            "^" => {
                // Metadata prefix: read and discard the metadata form, then
                // read and return the form it annotates.
                let _meta = self.require_next_form(&tok)?;
                self.require_next_form(&tok)
            }
            _ => self.parse_atom(tok),
        }
    }

    fn require_next_form(&mut self, opener: &Token) -> EvalResult<Value> {
        self.next_form()?.ok_or_else(|| reader_error("unexpected end of input", opener.position()))
    }

    fn parse_seq_until(&mut self, close: &str, opener: &Token) -> EvalResult<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(reader_error(
                        format!("unbalanced delimiter: missing '{close}'"),
                        opener.position(),
                    ))
                }
                Some(t) if t.text == close => {
                    self.advance();
                    return Ok(items);
                }
                Some(_) => {
                    let tok = self.advance().expect("peeked Some");
                    items.push(self.parse_token(tok)?);
                }
            }
        }
    }

    fn parse_atom(&mut self, tok: Token) -> EvalResult<Value> {
        let text = tok.text.as_str();
        if let Some(rest) = text.strip_prefix(':') {
            if rest.is_empty() {
                return Err(reader_error("empty keyword", tok.position()));
            }
            return Ok(Value::keyword(text));
        }
        if text.starts_with('"') {
            return decode_string(text, &tok);
        }
        if let Some(rest) = text.strip_prefix('\\') {
            return decode_char(rest, &tok);
        }
        if looks_numeric(text) {
            return parse_number(text, &tok);
        }
        parse_symbol(text, &tok)
    }
}

fn looks_numeric(text: &str) -> bool {
    let rest = text.strip_prefix('-').unwrap_or(text);
    rest.starts_with(|c: char| c.is_ascii_digit())
}

fn parse_number(text: &str, tok: &Token) -> EvalResult<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    let (sign, rest) = match text.strip_prefix('-') {
        Some(r) => (-1i64, r),
        None => (1i64, text),
    };
    if let Some((whole, frac)) = rest.split_once('.') {
        let malformed = || reader_error(format!("invalid number literal '{text}'"), tok.position());
        if whole.is_empty() || frac.is_empty() {
            return Err(malformed());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let whole_n: i64 = whole.parse().map_err(|_| malformed())?;
        let mut frac_digits = frac.to_string();
        frac_digits.truncate(3);
        while frac_digits.len() < 3 {
            frac_digits.push('0');
        }
        let frac_n: i64 = frac_digits.parse().map_err(|_| malformed())?;
        return Ok(Value::Fixed(sign * (whole_n * FIXED_SCALE + frac_n)));
    }
    Err(reader_error(format!("invalid number literal '{text}'"), tok.position()))
}

fn parse_symbol(text: &str, tok: &Token) -> EvalResult<Value> {
    match text.rsplit_once('/') {
        Some((ns, name)) if !ns.is_empty() && !name.is_empty() => Ok(Value::Symbol(intern(Some(ns), name))),
        Some((_ns, "")) => Err(reader_error(format!("symbol with only namespace '{text}'"), tok.position())),
        _ => Ok(Value::Symbol(intern(None, text))),
    }
}

fn decode_string(text: &str, tok: &Token) -> EvalResult<Value> {
    let inner = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| reader_error("malformed string literal", tok.position()))?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('0') => out.push('\0'),
            Some(other) => return Err(reader_error(format!("bad escape '\\{other}'"), tok.position())),
            None => return Err(reader_error("dangling escape at end of string", tok.position())),
        }
    }
    Ok(Value::String(Rc::from(out)))
}

fn decode_char(rest: &str, tok: &Token) -> EvalResult<Value> {
    let c = match rest {
        "newline" => '\n',
        "space" => ' ',
        "tab" => '\t',
        _ if rest.chars().count() == 1 => rest.chars().next().unwrap(),
        _ => return Err(reader_error(format!("unknown character literal '\\{rest}'"), tok.position())),
    };
    Ok(Value::Char(c))
}

/// Parse every top-level form in `source`.
pub fn read_all(source: &str) -> EvalResult<Vec<Value>> {
    let mut reader = Reader::new(source);
    let mut forms = Vec::new();
    while let Some(form) = reader.next_form()? {
        forms.push(form);
    }
    Ok(forms)
}

/// Parse just the first top-level form in `source`, or `None` if it is
/// empty/all-comment.
pub fn read_one(source: &str) -> EvalResult<Option<Value>> {
    Reader::new(source).next_form()
}

#[cfg(test)]
mod tests {
    use super::*;
    use seq_core::equality::clj_equal;

    fn read(src: &str) -> Value {
        read_one(src).unwrap().unwrap()
    }

    #[test]
    fn reads_integers_and_negative_integers() {
        assert!(matches!(read("42"), Value::Int(42)));
        assert!(matches!(read("-7"), Value::Int(-7)));
    }

    #[test]
    fn reads_fixed_point_literal() {
        assert!(matches!(read("3.140"), Value::Fixed(3140)));
        assert!(matches!(read("-0.5"), Value::Fixed(-500)));
    }

    #[test]
    fn reads_string_with_escapes() {
        assert!(matches!(read(r#""a\nb""#), Value::String(ref s) if &**s == "a\nb"));
    }

    #[test]
    fn reads_named_and_literal_chars() {
        assert!(matches!(read(r"\newline"), Value::Char('\n')));
        assert!(matches!(read(r"\a"), Value::Char('a')));
    }

    #[test]
    fn reads_keyword_and_symbol() {
        assert!(matches!(read(":foo"), Value::Keyword(ref s) if &*s == ":foo"));
        assert!(matches!(read("foo"), Value::Symbol(_)));
    }

    #[test]
    fn namespaced_symbol_with_empty_name_is_reader_error() {
        assert!(read_one("foo/").is_err());
    }

    #[test]
    fn reads_list_vector_and_map_literals() {
        let list = read("(1 2 3)");
        let vector = Value::vector(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(clj_equal(&list, &vector));

        let v = read("[1 2]");
        assert!(matches!(v, Value::Vector(_)));

        let m = read("{:a 1}");
        assert!(matches!(m, Value::Map(_)));
    }

    #[test]
    fn unbalanced_closing_delimiter_is_reader_error() {
        assert!(read_one(")").is_err());
    }

    #[test]
    fn unbalanced_opening_delimiter_is_reader_error() {
        assert!(read_one("(1 2").is_err());
    }

    #[test]
    fn quote_prefix_expands_to_quote_form() {
        let q = read("'x");
        assert!(matches!(q, Value::List(_)));
        assert_eq!(seq_core::collections::list_count(&q), 2);
    }

    #[test]
    fn line_comments_are_skipped() {
        let forms = read_all("; a comment\n42 ; trailing\n").unwrap();
        assert_eq!(forms.len(), 1);
        assert!(matches!(forms[0], Value::Int(42)));
    }

    #[test]
    fn reads_multiple_top_level_forms_in_order() {
        let forms = read_all("1 2 3").unwrap();
        assert_eq!(forms, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }
}
