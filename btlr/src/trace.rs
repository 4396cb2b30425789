//! Structured parser trace events.
//!
//! The parser reports each step to a [`TraceSink`]. [`LogSink`] forwards to
//! `log::trace!`, [`NullSink`] drops everything and [`RecordingSink`] keeps the
//! events for inspection.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One parser step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Shift {
        pos: usize,
        terminal: usize,
        state: usize,
    },
    Reduce {
        pos: usize,
        production: usize,
        state: usize,
    },
    /// A cell with several actions; `depth` is the checkpoint stack size
    /// after the push.
    Checkpoint {
        pos: usize,
        state: usize,
        alternatives: usize,
        depth: usize,
    },
    /// Resumed at a checkpoint with alternative `alternative`.
    Backtrack {
        pos: usize,
        alternative: usize,
        depth: usize,
    },
    /// The current path died.
    Reject { pos: usize, reason: String },
    Accept { pos: usize, candidate: usize },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Shift {
                pos,
                terminal,
                state,
            } => write!(f, "@{pos} shift t{terminal} -> s{state}"),
            TraceEvent::Reduce {
                pos,
                production,
                state,
            } => write!(f, "@{pos} reduce p{production} -> s{state}"),
            TraceEvent::Checkpoint {
                pos,
                state,
                alternatives,
                depth,
            } => write!(f, "@{pos} checkpoint s{state} x{alternatives} [{depth}]"),
            TraceEvent::Backtrack {
                pos,
                alternative,
                depth,
            } => write!(f, "@{pos} backtrack alt {alternative} [{depth}]"),
            TraceEvent::Reject { pos, reason } => write!(f, "@{pos} reject: {reason}"),
            TraceEvent::Accept { pos, candidate } => write!(f, "@{pos} accept #{candidate}"),
        }
    }
}

/// Receiver of [`TraceEvent`]s.
pub trait TraceSink {
    fn event(&mut self, event: TraceEvent);
}

/// Forwards events to the `log` facade at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn event(&mut self, event: TraceEvent) {
        log::trace!("{event}");
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn event(&mut self, _event: TraceEvent) {}
}

/// Keeps every event. Clones share the same buffer, so a handle kept by the
/// caller sees what the parser recorded.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }
}

impl TraceSink for RecordingSink {
    fn event(&mut self, event: TraceEvent) {
        self.events.borrow_mut().push(event);
    }
}
