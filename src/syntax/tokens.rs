//! Incremental tokenizer over a line-oriented character source.
//!
//! The stream keeps one pending line of unconsumed text and refills it from
//! its [`LineSource`] only when the line is exhausted, so an interactive
//! source is never asked for more input than the reader needs.

use std::io::BufRead;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{ErrorKind, ErrorReporting, Phase, SourceInfo, SprigError, SprigResult};

/// Splice marker, single-char markers, string literal, comment, bare token.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(,@|[('`,)]|"(?:\\.|[^\\"])*"|;.*|[^\s('"`,;)]*)"#)
        .expect("token pattern is a valid regex")
});

// ============================================================================
// LINE SOURCES
// ============================================================================

/// Anything that can hand out source text one line at a time.
pub trait LineSource {
    /// The next line, terminator included; `None` once the source is exhausted.
    fn next_line(&mut self) -> std::io::Result<Option<String>>;
}

/// Adapts any `BufRead` (files, stdin, byte slices) into a `LineSource`.
pub struct BufReadSource<R>(pub R);

impl<R: BufRead> LineSource for BufReadSource<R> {
    fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if self.0.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

// ============================================================================
// TOKEN STREAM
// ============================================================================

pub struct TokenStream<'a> {
    source: Box<dyn LineSource + 'a>,
    name: String,
    line: String,
    pos: usize,
    line_no: usize,
    last_span: Range<usize>,
}

impl<'a> TokenStream<'a> {
    pub fn new(name: impl Into<String>, source: impl LineSource + 'a) -> Self {
        Self {
            source: Box::new(source),
            name: name.into(),
            line: String::new(),
            pos: 0,
            line_no: 0,
            last_span: 0..0,
        }
    }

    pub fn from_reader(name: impl Into<String>, reader: impl BufRead + 'a) -> Self {
        Self::new(name, BufReadSource(reader))
    }

    pub fn from_str(name: impl Into<String>, text: &'a str) -> Self {
        Self::new(name, BufReadSource(text.as_bytes()))
    }

    /// Returns the next token, or `None` once the source is exhausted.
    /// Whitespace and comments never come back as tokens.
    pub fn next_token(&mut self) -> SprigResult<Option<String>> {
        loop {
            if self.pos >= self.line.len() {
                match self.source.next_line()? {
                    Some(line) => {
                        self.line = line;
                        self.pos = 0;
                        self.line_no += 1;
                    }
                    None => {
                        self.line.clear();
                        self.pos = 0;
                        return Ok(None);
                    }
                }
            }

            let rest = &self.line[self.pos..];
            let Some(found) = TOKEN.captures(rest).and_then(|caps| caps.get(1)) else {
                return Err(self.unterminated_string());
            };
            let start = self.pos + found.start();
            let end = self.pos + found.end();
            let token = found.as_str();

            if token.is_empty() {
                if self.line[end..].trim().is_empty() {
                    self.pos = self.line.len();
                    continue;
                }
                // Only an unclosed `"` stops every alternative from matching.
                self.pos = end;
                return Err(self.unterminated_string());
            }

            self.pos = end;
            if token.starts_with(';') {
                continue;
            }
            let token = token.to_string();
            self.last_span = start..end;
            return Ok(Some(token));
        }
    }

    /// Drops whatever is left of the pending line.
    pub fn discard_line(&mut self) {
        self.pos = self.line.len();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-based number of the line currently buffered.
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    fn unterminated_string(&mut self) -> SprigError {
        let end = self.line.trim_end().len().max(self.pos);
        self.last_span = self.pos..end;
        self.pos = self.line.len();
        self.report(ErrorKind::UnterminatedString)
            .with_help("string literals must close on the line they start")
    }
}

impl ErrorReporting for TokenStream<'_> {
    fn report(&self, kind: ErrorKind) -> SprigError {
        let text = self.line.trim_end_matches(['\r', '\n']).to_string();
        let start = self.last_span.start.min(text.len());
        let end = self.last_span.end.min(text.len()).max(start);
        SprigError::new(kind, Phase::Read).with_source(SourceInfo::new(
            format!("{}:{}", self.name, self.line_no),
            text,
            (start..end).into(),
        ))
    }
}
