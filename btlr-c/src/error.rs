//! Errors of the C front end.
//!
//! Every failure the front end reports is a [`FrontError`]: the stage that
//! failed, an [`ErrorKind`] and the source range it applies to. Lexer and
//! scope failures have their own types ([`LexError`], [`ScopeError`]) that
//! convert into it.

use btlr::{ScanError, ScanErrorKind, Span};
use smartstring::alias::String;
use std::fmt;
use thiserror::Error;

/// Pipeline stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Lexer,
    Parser,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexer => f.write_str("lexer"),
            Stage::Parser => f.write_str("parser"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnidentifiedToken,
    InvalidCharacter,
    /// Octal or hex escape above 255.
    EscapeOutOfRange,
    UnexpectedToken,
    /// A typedef name combined with another type specifier.
    InconsistentSpecifiers,
    /// An ordinary identifier where a typedef name is required, or the
    /// reverse.
    InvalidSymbolKind,
    UndeclaredIdentifier,
    /// One scope declares a name both as a typedef and as an ordinary
    /// identifier.
    RedefinitionSymbol,
    SearchLimitExceeded,
    MalformedTable,
    /// More than one tree survived scope analysis.
    Ambiguous,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::UnidentifiedToken => "unidentified token",
            ErrorKind::InvalidCharacter => "invalid character",
            ErrorKind::EscapeOutOfRange => "escape sequence out of range",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::InconsistentSpecifiers => "inconsistent declaration specifiers",
            ErrorKind::InvalidSymbolKind => "invalid symbol kind",
            ErrorKind::UndeclaredIdentifier => "undeclared identifier",
            ErrorKind::RedefinitionSymbol => "symbol redefined",
            ErrorKind::SearchLimitExceeded => "search limit exceeded",
            ErrorKind::MalformedTable => "malformed parse table",
            ErrorKind::Ambiguous => "ambiguous input",
        };
        f.write_str(s)
    }
}

/// The error every front-end entry point returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} error at {span}: {kind}{}", detail_suffix(.detail))]
pub struct FrontError {
    /// Stage that reported the error.
    pub stage: Stage,
    pub kind: ErrorKind,
    /// Source range of the offending token or name.
    pub span: Span,
    /// Extra context, such as the offending name; may be empty.
    pub detail: String,
}

fn detail_suffix(detail: &str) -> std::string::String {
    if detail.is_empty() {
        std::string::String::new()
    } else {
        format!(" ({detail})")
    }
}

impl FrontError {
    pub fn new(stage: Stage, kind: ErrorKind, span: Span) -> Self {
        Self {
            stage,
            kind,
            span,
            detail: String::new(),
        }
    }

    /// Attach context shown in parentheses after the message.
    pub fn with_detail(mut self, detail: impl AsRef<str>) -> Self {
        self.detail = detail.as_ref().into();
        self
    }
}

/// Failure of one of the recognizers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub kind: ErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl From<ScanError> for LexError {
    fn from(e: ScanError) -> Self {
        let kind = match e.kind {
            ScanErrorKind::UnidentifiedToken => ErrorKind::UnidentifiedToken,
            ScanErrorKind::InvalidCharacter => ErrorKind::InvalidCharacter,
        };
        LexError::new(kind, e.span)
    }
}

impl From<LexError> for FrontError {
    fn from(e: LexError) -> Self {
        FrontError::new(Stage::Lexer, e.kind, e.span)
    }
}

/// Why a candidate tree was rejected by scope analysis, or why the parser
/// pruned a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} `{name}` at {span}")]
pub struct ScopeError {
    pub kind: ErrorKind,
    /// The identifier as written.
    pub name: String,
    pub span: Span,
}

impl From<ScopeError> for FrontError {
    fn from(e: ScopeError) -> Self {
        FrontError::new(Stage::Parser, e.kind, e.span).with_detail(e.name)
    }
}
