//! Table-driven automaton scanner engine.
//!
//! An [`Automaton`] is a state table over named states `S` and named byte
//! conditions `C`. At every step the engine evaluates the conditions in their
//! declared order against the byte under the cursor and follows the first one
//! that has a transition out of the current state. Scanning stops when no
//! transition applies:
//!
//! * in an accepting state the lexeme is handed to the [`Recognizer`] together
//!   with the accepting state reached;
//! * on a `(state, condition)` pair declared *forbidden* the scan fails with
//!   [`ScanErrorKind::InvalidCharacter`];
//! * otherwise it fails with [`ScanErrorKind::UnidentifiedToken`], unless the
//!   automaton was built with [`AutomatonBuilder::backtrack`], in which case it
//!   rolls back to the last accepting state it passed through.
//!
//! Because transitions are followed as long as possible the engine always
//! produces the longest match the table allows (maximal munch).
//!
//! # Examples
//!
//! ```rust
//! use btlr::{Automaton, Cursor, ScanError, Span, Recognizer};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum St { Start, Digits }
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Cond { Digit }
//!
//! struct Digits(Automaton<St, Cond>);
//!
//! impl Recognizer for Digits {
//!     type State = St;
//!     type Cond = Cond;
//!     type Output = u64;
//!     type Error = ScanError;
//!     fn automaton(&self) -> &Automaton<St, Cond> { &self.0 }
//!     fn build(&self, lexeme: &[u8], _span: Span, _state: St) -> Result<u64, ScanError> {
//!         Ok(lexeme.iter().fold(0, |n, b| n * 10 + u64::from(b - b'0')))
//!     }
//! }
//!
//! let digits = Digits(
//!     Automaton::builder("digits", St::Start)
//!         .condition(Cond::Digit, |b| b.is_ascii_digit())
//!         .edge(St::Start, Cond::Digit, St::Digits)
//!         .edge(St::Digits, Cond::Digit, St::Digits)
//!         .accept(St::Digits)
//!         .build(),
//! );
//! let mut cursor = Cursor::new(b"1234+");
//! assert_eq!(digits.scan(&mut cursor).unwrap(), 1234);
//! assert_eq!(cursor.peek(), Some(b'+'));
//! ```

use crate::{Cursor, Span};
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug};
use std::hash::Hash;
use thiserror::Error;

/// Bound shared by state and condition labels.
pub trait Label: Copy + Eq + Hash + Debug {}

impl<T: Copy + Eq + Hash + Debug> Label for T {}

/// Single-byte predicate.
pub type Condition = fn(u8) -> bool;

/// Why a scan failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    /// No condition led anywhere from a non-accepting state.
    UnidentifiedToken,
    /// A byte that is structurally disallowed at this point.
    InvalidCharacter,
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanErrorKind::UnidentifiedToken => f.write_str("unidentified token"),
            ScanErrorKind::InvalidCharacter => f.write_str("invalid character"),
        }
    }
}

/// Scan failure with the range consumed so far.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in {automaton} at {span}")]
pub struct ScanError {
    /// Range scanned before the failure.
    pub kind: ScanErrorKind,
    pub span: Span,
    /// Name of the automaton that failed.
    pub automaton: &'static str,
}

/// A named finite automaton over byte conditions.
#[derive(Debug, Clone)]
pub struct Automaton<S: Label, C: Label> {
    name: &'static str,
    start: S,
    conditions: Vec<(C, Condition)>,
    transitions: HashMap<(S, C), S>,
    accepting: HashSet<S>,
    forbidden: HashSet<(S, C)>,
    backtrack: bool,
}

/// Outcome of [`Automaton::run`].
enum Step<S> {
    Next(S),
    Forbidden,
    Stuck,
}

impl<S: Label, C: Label> Automaton<S, C> {
    /// Start building an automaton called `name` that starts in `start`.
    pub fn builder(name: &'static str, start: S) -> AutomatonBuilder<S, C> {
        AutomatonBuilder {
            inner: Automaton {
                name,
                start,
                conditions: Vec::new(),
                transitions: HashMap::new(),
                accepting: HashSet::new(),
                forbidden: HashSet::new(),
                backtrack: false,
            },
        }
    }

    /// Name used in logs and errors.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn start(&self) -> S {
        self.start
    }

    /// `state` ends a token.
    #[inline]
    pub fn is_accepting(&self, state: S) -> bool {
        self.accepting.contains(&state)
    }

    /// Target of `(state, cond)` if the table has one.
    #[inline]
    pub fn transition(&self, state: S, cond: C) -> Option<S> {
        self.transitions.get(&(state, cond)).copied()
    }

    fn step(&self, state: S, byte: Option<u8>) -> Step<S> {
        let Some(b) = byte else {
            return Step::Stuck;
        };
        for (cond, test) in &self.conditions {
            if !test(b) {
                continue;
            }
            if self.forbidden.contains(&(state, *cond)) {
                return Step::Forbidden;
            }
            if let Some(next) = self.transition(state, *cond) {
                return Step::Next(next);
            }
        }
        Step::Stuck
    }

    /// Drive the automaton from the cursor and return the accepting state
    /// reached. The cursor is left just past the lexeme.
    pub fn run(&self, cursor: &mut Cursor<'_>) -> Result<S, ScanError> {
        let begin = cursor.mark();
        let mut state = self.start;
        let mut last_accept = None;
        loop {
            if self.is_accepting(state) {
                last_accept = Some((state, cursor.mark()));
            }
            match self.step(state, cursor.peek()) {
                Step::Next(next) => {
                    log::trace!(
                        "{}: {:?} --{}--> {:?}",
                        self.name,
                        state,
                        printable(cursor.peek()),
                        next
                    );
                    cursor.advance();
                    state = next;
                }
                Step::Forbidden => {
                    cursor.advance();
                    return Err(self.error(ScanErrorKind::InvalidCharacter, cursor.span_from(begin)));
                }
                Step::Stuck => {
                    if self.is_accepting(state) {
                        return Ok(state);
                    }
                    if self.backtrack {
                        if let Some((accepted, mark)) = last_accept {
                            log::trace!("{}: back to {:?}", self.name, accepted);
                            cursor.reset(mark);
                            return Ok(accepted);
                        }
                    }
                    return Err(self.error(ScanErrorKind::UnidentifiedToken, cursor.span_from(begin)));
                }
            }
        }
    }

    fn error(&self, kind: ScanErrorKind, span: Span) -> ScanError {
        ScanError {
            kind,
            span,
            automaton: self.name,
        }
    }
}

fn printable(b: Option<u8>) -> String {
    match b {
        Some(b) if b.is_ascii_graphic() => (b as char).to_string(),
        Some(b) => format!("0x{}", hex::encode([b])),
        None => "EOF".to_string(),
    }
}

/// Incremental constructor for [`Automaton`].
pub struct AutomatonBuilder<S: Label, C: Label> {
    inner: Automaton<S, C>,
}

impl<S: Label, C: Label> AutomatonBuilder<S, C> {
    /// Declare a condition. Conditions are evaluated in declaration order.
    pub fn condition(mut self, cond: C, test: Condition) -> Self {
        self.inner.conditions.push((cond, test));
        self
    }

    /// Add a transition from `from` on `cond`.
    pub fn edge(mut self, from: S, cond: C, to: S) -> Self {
        debug_assert!(
            self.inner.conditions.iter().any(|(c, _)| *c == cond),
            "undeclared condition {cond:?}"
        );
        self.inner.transitions.insert((from, cond), to);
        self
    }

    /// Same condition from several states to one target.
    pub fn edges(mut self, from: &[S], cond: C, to: S) -> Self {
        for s in from {
            self = self.edge(*s, cond, to);
        }
        self
    }

    /// Mark `state` as accepting.
    pub fn accept(mut self, state: S) -> Self {
        self.inner.accepting.insert(state);
        self
    }

    /// Matching `cond` in `state` is an [`ScanErrorKind::InvalidCharacter`].
    pub fn forbid(mut self, state: S, cond: C) -> Self {
        self.inner.forbidden.insert((state, cond));
        self
    }

    /// Fall back to the last accepting state instead of failing.
    pub fn backtrack(mut self) -> Self {
        self.inner.backtrack = true;
        self
    }

    /// Finish the automaton.
    pub fn build(self) -> Automaton<S, C> {
        self.inner
    }
}

/// One lexical class: an automaton plus token construction.
pub trait Recognizer {
    type State: Label;
    type Cond: Label;
    type Output;
    type Error: From<ScanError>;

    fn automaton(&self) -> &Automaton<Self::State, Self::Cond>;

    /// Construct the token for `lexeme`, which ended in `state`.
    fn build(&self, lexeme: &[u8], span: Span, state: Self::State) -> Result<Self::Output, Self::Error>;

    fn scan(&self, cursor: &mut Cursor<'_>) -> Result<Self::Output, Self::Error> {
        let begin = cursor.mark();
        let state = self.automaton().run(cursor)?;
        let lexeme = cursor.slice_from(begin);
        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "{}: accept {:?} {:?}",
                self.automaton().name(),
                state,
                match std::str::from_utf8(lexeme) {
                    Ok(s) => s.to_string(),
                    Err(_) => hex::encode(lexeme),
                }
            );
        }
        self.build(lexeme, cursor.span_from(begin), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum St {
        Start,
        Lt,
        Shl,
        ShlEq,
        Dot,
        Dot2,
        Dot3,
        Quote,
        Body,
        Close,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Co {
        Lt,
        Eq,
        Dot,
        Quote,
        Newline,
        Other,
    }

    struct Test(Automaton<St, Co>);

    impl Recognizer for Test {
        type State = St;
        type Cond = Co;
        type Output = (std::string::String, St);
        type Error = ScanError;

        fn automaton(&self) -> &Automaton<St, Co> {
            &self.0
        }

        fn build(&self, lexeme: &[u8], _span: Span, state: St) -> Result<Self::Output, ScanError> {
            Ok((std::string::String::from_utf8_lossy(lexeme).into_owned(), state))
        }
    }

    fn test_automaton() -> Test {
        Test(
            Automaton::builder("test", St::Start)
                .condition(Co::Lt, |b| b == b'<')
                .condition(Co::Eq, |b| b == b'=')
                .condition(Co::Dot, |b| b == b'.')
                .condition(Co::Quote, |b| b == b'"')
                .condition(Co::Newline, |b| b == b'\n')
                .condition(Co::Other, |_| true)
                .edge(St::Start, Co::Lt, St::Lt)
                .edge(St::Lt, Co::Lt, St::Shl)
                .edge(St::Shl, Co::Eq, St::ShlEq)
                .edge(St::Start, Co::Dot, St::Dot)
                .edge(St::Dot, Co::Dot, St::Dot2)
                .edge(St::Dot2, Co::Dot, St::Dot3)
                .edge(St::Start, Co::Quote, St::Quote)
                .edges(&[St::Quote, St::Body], Co::Other, St::Body)
                .edges(&[St::Quote, St::Body], Co::Quote, St::Close)
                .forbid(St::Body, Co::Newline)
                .forbid(St::Quote, Co::Newline)
                .accept(St::Lt)
                .accept(St::Shl)
                .accept(St::ShlEq)
                .accept(St::Dot)
                .accept(St::Dot3)
                .accept(St::Close)
                .backtrack()
                .build(),
        )
    }

    #[test]
    fn longest_match_wins() {
        init_logger();
        let t = test_automaton();
        let mut c = Cursor::new(b"<<=<<<");
        assert_eq!(t.scan(&mut c).unwrap(), ("<<=".into(), St::ShlEq));
        assert_eq!(t.scan(&mut c).unwrap(), ("<<".into(), St::Shl));
        assert_eq!(t.scan(&mut c).unwrap(), ("<".into(), St::Lt));
        assert!(c.is_eof());
    }

    #[test]
    fn backtracks_to_last_accepting_state() {
        init_logger();
        let t = test_automaton();
        let mut c = Cursor::new(b"..x");
        assert_eq!(t.scan(&mut c).unwrap(), (".".into(), St::Dot));
        assert_eq!(c.offset(), 1);
        assert_eq!(t.scan(&mut c).unwrap(), (".".into(), St::Dot));
    }

    #[test]
    fn forbidden_byte_is_invalid_character() {
        let t = test_automaton();
        let mut c = Cursor::new(b"\"ab\ncd\"");
        let err = t.scan(&mut c).unwrap_err();
        assert_eq!(err.kind, ScanErrorKind::InvalidCharacter);
        assert_eq!(err.automaton, "test");
        assert_eq!(err.span, span!(1, 1, 2, 1));
    }

    #[test]
    fn no_transition_is_unidentified() {
        let t = test_automaton();
        let mut c = Cursor::new(b"\"abc");
        let err = t.scan(&mut c).unwrap_err();
        assert_eq!(err.kind, ScanErrorKind::UnidentifiedToken);
        let mut c = Cursor::new(b"=");
        let err = t.scan(&mut c).unwrap_err();
        assert_eq!(err.kind, ScanErrorKind::UnidentifiedToken);
        assert!(err.span.is_empty());
    }
}
