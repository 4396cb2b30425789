//! Source positions and ranges.
//!
//! Every token, tree node and diagnostic in the workspace carries a [`Span`].
//! Lines and columns are 1-based and human-facing; the [`Cursor`](crate::Cursor)
//! maintains them while bytes are consumed.
//!
//! # Examples
//!
//! ```rust
//! # use btlr::{Position, Span, span};
//! let a = Span::new(Position::new(1, 1), Position::new(1, 4));
//! let b = span!(1, 6, 2, 3);
//! let ab = a.merge(&b);
//! assert_eq!(ab.start, Position::new(1, 1));
//! assert_eq!(ab.end, Position::new(2, 3));
//! assert_eq!(ab.line_range(), (1, 2));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number (byte position in the line).
    pub column: usize,
}

impl Position {
    /// Creates a new `Position`.
    #[inline]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open source range: `[start, end)`.
///
/// It is conventional for `start <= end` in lexicographic `(line, column)`
/// ordering; the type does not enforce it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Starting position (inclusive).
    pub start: Position,
    /// Ending position (exclusive).
    pub end: Position,
}

impl Span {
    /// Creates a new `Span`.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Empty span at `pos`.
    #[inline]
    pub const fn at(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        let start = if self.start <= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end >= other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    /// Is this span empty (start == end)?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the inclusive line range spanned by this `Span`.
    #[inline]
    pub fn line_range(&self) -> (usize, usize) {
        (self.start.line, self.end.line)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Build a [`Span`] inline from 1-based line/column coordinates.
///
/// ```rust
/// # use btlr::{Position, span};
/// let s = span!(1, 1, 1, 5);
/// assert_eq!(s.end, Position::new(1, 5));
/// ```
#[macro_export]
macro_rules! span {
    ($line_start:expr, $col_start:expr, $line_end:expr, $col_end:expr) => {
        $crate::Span {
            start: $crate::Position { line: $line_start, column: $col_start },
            end: $crate::Position { line: $line_end, column: $col_end },
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_order_independent() {
        let a = span!(2, 5, 2, 9);
        let b = span!(1, 3, 2, 6);
        assert_eq!(a.merge(&b), b.merge(&a));
        assert_eq!(a.merge(&b), span!(1, 3, 2, 9));
    }

    #[test]
    fn empty_span_at_position() {
        let s = Span::at(Position::new(4, 7));
        assert!(s.is_empty());
        assert_eq!(s.to_string(), "4:7-4:7");
    }

    #[test]
    fn default_position_is_origin() {
        assert_eq!(Position::default(), Position::new(1, 1));
    }
}
