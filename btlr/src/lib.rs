//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! Backtracking LR runtime.
//!
//! `btlr` contains the pieces a front end needs at run time:
//!  * [`Cursor`], [`Span`], [`Position`]: byte cursor with line/column tracking;
//!  * [`Automaton`] and [`Recognizer`]: a table-driven scanner engine with
//!    maximal munch;
//!  * [`ParseTable`]: the serialized action/goto tables produced by
//!    `btlr-gen`;
//!  * [`Parser`] and [`ParserDriver`]: a non-deterministic LR parser that
//!    explores every alternative of a conflicting table cell by checkpoint and
//!    backtrack and returns all accepted values;
//!  * [`Stack`]: the persistent stack that makes checkpoints cheap;
//!  * [`TraceSink`]: structured step-by-step tracing.

mod cursor;
mod parser;
mod scanner;
mod span;
mod stack;
mod table;
pub mod trace;

pub use cursor::{Cursor, Mark};
pub use parser::{ParseError, Parser, ParserConfig, ParserDriver, ParserStats};
pub use scanner::{
    Automaton, AutomatonBuilder, Condition, Label, Recognizer, ScanError, ScanErrorKind,
};
pub use span::{Position, Span};
pub use stack::{Iter as StackIter, Stack};
pub use table::{Action, ParseTable, Production, Symbol, TABLE_FORMAT_VERSION, TableError};
pub use trace::{LogSink, NullSink, RecordingSink, TraceEvent, TraceSink};
