//! Token-driven recursive descent reader.
//!
//! Turns a [`TokenStream`] into raw expressions: nested lists plus atoms.
//! Quote-family markers (`'`, `` ` ``, `,`, `,@`) are rewritten into their
//! two-element keyword forms here, so later stages only ever see lists.

use crate::ast::number::{parse_complex, parse_float, parse_int};
use crate::ast::Value;
use crate::errors::{ErrorKind, ErrorReporting, SprigResult};
use crate::runtime::context::DEFAULT_MAX_DEPTH;
use crate::syntax::tokens::TokenStream;
use crate::syntax::{Keywords, SymbolTable};

/// Reader over a session's intern table.
pub struct Reader<'s> {
    symbols: &'s mut SymbolTable,
    keywords: &'s Keywords,
    max_depth: usize,
}

impl<'s> Reader<'s> {
    pub fn new(symbols: &'s mut SymbolTable, keywords: &'s Keywords) -> Self {
        Self {
            symbols,
            keywords,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Bounds how deeply lists and quote markers may nest.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reads one expression. `None` means the source ended cleanly at a
    /// top-level boundary.
    pub fn read(&mut self, stream: &mut TokenStream<'_>) -> SprigResult<Option<Value>> {
        match stream.next_token()? {
            None => Ok(None),
            Some(token) => self.read_ahead(token, stream, 1).map(Some),
        }
    }

    fn read_ahead(
        &mut self,
        token: String,
        stream: &mut TokenStream<'_>,
        depth: usize,
    ) -> SprigResult<Value> {
        if depth > self.max_depth {
            return Err(stream
                .report(ErrorKind::RecursionLimit {
                    limit: self.max_depth,
                })
                .with_help("expression nests deeper than max_depth allows"));
        }
        match token.as_str() {
            "(" => {
                let mut items = Vec::new();
                loop {
                    match stream.next_token()? {
                        Some(next) if next == ")" => return Ok(Value::list(items)),
                        Some(next) => items.push(self.read_ahead(next, stream, depth + 1)?),
                        None => {
                            return Err(stream
                                .report(ErrorKind::UnexpectedEof)
                                .with_help("a list was still open when the input ended"))
                        }
                    }
                }
            }
            ")" => Err(stream.report(ErrorKind::UnexpectedCloseParen)),
            marker => match self.keywords.for_quote_marker(marker).cloned() {
                Some(keyword) => {
                    let Some(next) = stream.next_token()? else {
                        return Err(stream
                            .report(ErrorKind::UnexpectedEof)
                            .with_help(format!("'{marker}' must be followed by an expression")));
                    };
                    let quoted = self.read_ahead(next, stream, depth + 1)?;
                    Ok(Value::list(vec![Value::Symbol(keyword), quoted]))
                }
                None => self.atom(marker, stream),
            },
        }
    }

    /// `nil`, booleans, strings, then int, float, complex; anything else is
    /// a symbol. `nil` reads as the no-value placeholder the printer writes.
    fn atom(&mut self, token: &str, stream: &TokenStream<'_>) -> SprigResult<Value> {
        match token {
            "nil" => return Ok(Value::Nil),
            "#t" => return Ok(Value::Bool(true)),
            "#f" => return Ok(Value::Bool(false)),
            _ => {}
        }
        if let Some(body) = token.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            return unescape(body)
                .map(Value::string)
                .map_err(|escape| stream.report(ErrorKind::InvalidEscape { escape }));
        }
        if let Some(i) = parse_int(token) {
            return Ok(Value::Int(i));
        }
        if let Some(x) = parse_float(token) {
            return Ok(Value::Float(x));
        }
        if let Some(c) = parse_complex(token) {
            return Ok(Value::Complex(c));
        }
        Ok(Value::Symbol(self.symbols.intern(token)))
    }
}

/// Resolves backslash escapes. Returns the offending character on an unknown escape.
pub fn unescape(body: &str) -> Result<String, char> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some('a') => '\u{07}',
            Some('b') => '\u{08}',
            Some('f') => '\u{0C}',
            Some('v') => '\u{0B}',
            Some(c @ ('\\' | '"' | '\'')) => c,
            Some(other) => return Err(other),
            None => return Err('\\'),
        };
        out.push(escaped);
    }
    Ok(out)
}

/// Inverse of [`unescape`] for the characters the printer must protect.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(text: &str) -> SprigResult<Vec<Value>> {
        let mut symbols = SymbolTable::new();
        let keywords = Keywords::new(&mut symbols);
        let mut reader = Reader::new(&mut symbols, &keywords);
        let mut stream = TokenStream::from_str("<test>", text);
        let mut out = Vec::new();
        while let Some(value) = reader.read(&mut stream)? {
            out.push(value);
        }
        Ok(out)
    }

    #[test]
    fn reads_nested_lists() {
        let values = read_all("(a (b 1) \"s\" #t)").unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].to_string(), "(a (b 1) \"s\" #t)");
    }

    #[test]
    fn classifies_atoms() {
        let values = read_all("42 -7 2.5 1e3 3i 1-2i #f foo").unwrap();
        assert!(matches!(values[0], Value::Int(42)));
        assert!(matches!(values[1], Value::Int(-7)));
        assert!(matches!(values[2], Value::Float(x) if x == 2.5));
        assert!(matches!(values[3], Value::Float(x) if x == 1000.0));
        assert!(matches!(values[4], Value::Complex(_)));
        assert!(matches!(values[5], Value::Complex(c) if c.re == 1.0 && c.im == -2.0));
        assert!(matches!(values[6], Value::Bool(false)));
        assert!(matches!(values[7], Value::Symbol(_)));
    }

    #[test]
    fn expands_quote_markers() {
        let values = read_all("'x `(a ,b ,@c)").unwrap();
        assert_eq!(values[0].to_string(), "(quote x)");
        assert_eq!(
            values[1].to_string(),
            "(quasiquote (a (unquote b) (unquote-splicing c)))"
        );
    }

    #[test]
    fn same_spelling_reads_as_same_symbol() {
        let values = read_all("foo foo").unwrap();
        match (&values[0], &values[1]) {
            (Value::Symbol(a), Value::Symbol(b)) => assert_eq!(a, b),
            other => panic!("expected symbols, got {other:?}"),
        }
    }

    #[test]
    fn unbalanced_input_is_rejected() {
        let err = read_all(")").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedCloseParen);
        let err = read_all("(a (b)").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
        let err = read_all("'").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
    }

    #[test]
    fn nil_reads_back_as_no_value() {
        let values = read_all("nil (if x 1 nil)").unwrap();
        assert_eq!(values[0], Value::Nil);
        assert_eq!(values[1].as_list().map(|items| &items[3]), Some(&Value::Nil));
        assert_eq!(values[1].to_string(), "(if x 1 nil)");
    }

    #[test]
    fn nesting_beyond_the_limit_is_an_error() {
        let mut symbols = SymbolTable::new();
        let keywords = Keywords::new(&mut symbols);
        let mut reader = Reader::new(&mut symbols, &keywords).with_max_depth(3);

        let mut stream = TokenStream::from_str("<test>", "((1)) '(2)");
        assert_eq!(reader.read(&mut stream).unwrap().map(|v| v.to_string()).as_deref(), Some("((1))"));
        assert!(reader.read(&mut stream).unwrap().is_some());

        let mut stream = TokenStream::from_str("<test>", "(((1)))");
        let err = reader.read(&mut stream).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RecursionLimit { limit: 3 });
        assert_eq!(err.code(), "sprig::read::recursion_limit");

        let mut stream = TokenStream::from_str("<test>", "'''x");
        assert!(reader.read(&mut stream).is_err());
    }

    #[test]
    fn string_escapes() {
        assert_eq!(unescape(r#"a\nb\"c\\"#).unwrap(), "a\nb\"c\\");
        assert_eq!(unescape(r"\q"), Err('q'));
        assert_eq!(escape("a\nb\"c\\"), r#"a\nb\"c\\"#);
        let err = read_all(r#""bad \q""#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidEscape { escape: 'q' });
    }
}
