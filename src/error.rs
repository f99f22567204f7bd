//! Error types for audiomd

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

/// Error kind for detailed categorization
///
/// The first group covers XML well-formedness failures and carries a span
/// into the source text. The second group covers schema mapping failures and
/// carries the path of the offending element instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    InvalidEntity,
    UnterminatedMarkup,
    MismatchedTag,
    DuplicateAttribute {
        name: String,
    },
    SchemaViolation {
        path: String,
    },
    TypeCoercion {
        path: String,
        expected: String,
        found: String,
    },
    MissingRequiredField {
        path: String,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::InvalidEntity => write!(f, "invalid xml entity"),
            Self::UnterminatedMarkup => write!(f, "unterminated markup"),
            Self::MismatchedTag => write!(f, "mismatched closing tag"),
            Self::DuplicateAttribute { name } => {
                write!(f, "duplicate attribute: {name}")
            }
            Self::SchemaViolation { path } => {
                write!(f, "schema violation at {path}")
            }
            Self::TypeCoercion {
                path,
                expected,
                found,
            } => {
                write!(f, "cannot coerce {found:?} at {path}: expected {expected}")
            }
            Self::MissingRequiredField { path } => {
                write!(f, "missing required field: {path}")
            }
        }
    }
}

/// Main error type for audiomd
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an error with no source position, for schema mapping failures
    pub fn schema(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

/// Result type alias for audiomd
pub type Result<T> = std::result::Result<T, Error>;
