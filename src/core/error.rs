// src/core/error.rs
//! Error taxonomy for the whole pipeline.
//!
//! Lex and parse errors abort evaluation before anything runs; runtime
//! errors unwind as thrown signals and are catchable by `try`/`catch`.
//! All carry 1-based source positions where one was available.

use std::fmt;

use crate::core::lexer::LexError;
use crate::core::parser::ParseError;

/// Category tag for a runtime fault. These names double as the `tipo`
/// field of the error value a `catch` clause binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Runtime,
    Type,
    Attribute,
    Index,
    Key,
}

impl ErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Attribute => "AttributeError",
            ErrorKind::Index => "IndexError",
            ErrorKind::Key => "KeyError",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl RuntimeError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind: ErrorKind::Runtime, message: message.into(), line, column }
    }

    pub fn type_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind: ErrorKind::Type, message: message.into(), line, column }
    }

    pub fn attribute(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind: ErrorKind::Attribute, message: message.into(), line, column }
    }

    pub fn index(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind: ErrorKind::Index, message: message.into(), line, column }
    }

    pub fn key(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind: ErrorKind::Key, message: message.into(), line, column }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(f, "{}: {} at {}:{}", self.kind.name(), self.message, self.line, self.column)
        } else {
            write!(f, "{}: {}", self.kind.name(), self.message)
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Top-level error for `Interpreter::evaluate`: whichever pipeline stage
/// failed first.
#[derive(Debug, Clone)]
pub enum ZiskError {
    Lex(LexError),
    Parse(ParseError),
    Runtime(RuntimeError),
}

impl ZiskError {
    pub fn position(&self) -> (usize, usize) {
        match self {
            ZiskError::Lex(e) => e.position(),
            ZiskError::Parse(e) => (e.line, e.column),
            ZiskError::Runtime(e) => (e.line, e.column),
        }
    }
}

impl fmt::Display for ZiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZiskError::Lex(e) => write!(f, "{}", e),
            ZiskError::Parse(e) => write!(f, "{}", e),
            ZiskError::Runtime(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ZiskError {}

impl From<LexError> for ZiskError {
    fn from(e: LexError) -> Self {
        ZiskError::Lex(e)
    }
}

impl From<ParseError> for ZiskError {
    fn from(e: ParseError) -> Self {
        ZiskError::Parse(e)
    }
}

impl From<RuntimeError> for ZiskError {
    fn from(e: RuntimeError) -> Self {
        ZiskError::Runtime(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_display_includes_kind_and_position() {
        let err = RuntimeError::type_error("incompatible types", 3, 7);
        assert_eq!(format!("{}", err), "TypeError: incompatible types at 3:7");
    }

    #[test]
    fn position_less_errors_omit_location() {
        let err = RuntimeError::new("stack exhausted", 0, 0);
        assert_eq!(format!("{}", err), "RuntimeError: stack exhausted");
    }
}
