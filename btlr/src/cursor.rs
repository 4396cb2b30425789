//! Byte cursor over an in-memory source buffer.
//!
//! The cursor keeps the byte offset and the human-facing [`Position`] in step:
//! consuming `\n` increments the line and resets the column to 1, any other
//! byte moves one column to the right. Recognizers that need to retreat (the
//! punctuator automaton does when `..` is not followed by a third `.`) take a
//! [`Mark`] and [`Cursor::reset`] to it.

use crate::{Position, Span};

/// Saved cursor location, restorable with [`Cursor::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pos: usize,
    at: Position,
}

impl Mark {
    /// Byte offset of the mark.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Line/column of the mark.
    #[inline]
    pub fn position(&self) -> Position {
        self.at
    }
}

/// Tracks the current byte offset and line/column over `src`.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a [u8],
    pos: usize,
    at: Position,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of `src`.
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            at: Position::default(),
        }
    }

    /// Byte under the cursor, `None` at end of input.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    /// Byte `n` positions past the cursor.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.src.get(self.pos + n).copied()
    }

    /// Consume one byte and update line/column. Returns the consumed byte.
    pub fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.at.line += 1;
            self.at.column = 1;
        } else {
            self.at.column += 1;
        }
        Some(b)
    }

    /// All input consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Byte offset of the next byte.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Line and column of the next byte.
    #[inline]
    pub fn position(&self) -> Position {
        self.at
    }

    /// Remember the current position, to return to it with [`Cursor::reset`].
    #[inline]
    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            at: self.at,
        }
    }

    /// Return to `mark`, which must come from this cursor.
    #[inline]
    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.at = mark.at;
    }

    /// Bytes consumed since `mark`.
    #[inline]
    pub fn slice_from(&self, mark: Mark) -> &'a [u8] {
        &self.src[mark.pos..self.pos]
    }

    /// Source range from `mark` to the current location.
    #[inline]
    pub fn span_from(&self, mark: Mark) -> Span {
        Span::new(mark.at, self.at)
    }
}
