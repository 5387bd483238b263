//! Error codes for the path-expression engine.
//!
//! Every variant corresponds to one of the stable error codes a caller can
//! observe through [`crate::path::CompiledPath::error`]. Errors carry a
//! zero-based byte offset into the original expression text where available;
//! type errors report offset 0 (the expression's start) since the checker
//! does not track per-node source spans.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum XPathError {
    #[error("illegal name at offset {offset}: {message}")]
    Name { message: String, offset: usize },

    #[error("illegal string literal at offset {offset}: {message}")]
    StringLit { message: String, offset: usize },

    #[error("illegal number at offset {offset}: {message}")]
    Number { message: String, offset: usize },

    #[error("expected delimiter at offset {offset}: {message}")]
    Delim { message: String, offset: usize },

    #[error("unmatched predicate bracket at offset {offset}")]
    Predicate { offset: usize },

    #[error("expected '/' at offset {offset}")]
    Slash { offset: usize },

    #[error("out of memory")]
    NoMem,

    #[error("internal error: {0}")]
    Internal(String),

    #[error("type error: {0}")]
    Type(String),
}

impl XPathError {
    /// The zero-based byte offset into the source text at which this error
    /// was raised, or 0 for errors that carry no useful position.
    pub fn offset(&self) -> usize {
        match self {
            XPathError::Name { offset, .. }
            | XPathError::StringLit { offset, .. }
            | XPathError::Number { offset, .. }
            | XPathError::Delim { offset, .. }
            | XPathError::Predicate { offset }
            | XPathError::Slash { offset } => *offset,
            XPathError::NoMem | XPathError::Internal(_) | XPathError::Type(_) => 0,
        }
    }

    /// The stable error-code name, matching the C-style enumeration in the
    /// engine's external contract (`NOERROR` is represented by `Ok`, never
    /// by a variant of this type).
    pub fn code(&self) -> &'static str {
        match self {
            XPathError::Name { .. } => "ENAME",
            XPathError::StringLit { .. } => "ESTRING",
            XPathError::Number { .. } => "ENUMBER",
            XPathError::Delim { .. } => "EDELIM",
            XPathError::Predicate { .. } => "EPRED",
            XPathError::Slash { .. } => "ESLASH",
            XPathError::NoMem => "ENOMEM",
            XPathError::Internal(_) => "EINTERNAL",
            XPathError::Type(_) => "ETYPE",
        }
    }
}
