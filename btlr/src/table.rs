//! The grammar table artifact.
//!
//! A [`ParseTable`] is what the generator emits and what the parser runs on:
//! the productions, the non-deterministic action table and the deterministic
//! goto table. It is serialized as JSON and carries
//! [`TABLE_FORMAT_VERSION`]; a table written by an incompatible generator is
//! rejected by [`ParseTable::from_json`].
//!
//! Symbols are addressed by index. Terminals and non-terminals have separate
//! index spaces, non-terminal `0` is the augmented start symbol and
//! production `0` is `Start -> <grammar start>`.

use serde::{Deserialize, Serialize};
use smartstring::alias::String;
use std::fmt;
use thiserror::Error;

/// Bumped whenever the serialized layout changes.
pub const TABLE_FORMAT_VERSION: u32 = 1;

/// A grammar symbol by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    Term(usize),
    NonTerm(usize),
}

/// A grammar production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    /// Stable index in [`ParseTable::productions`].
    pub index: usize,
    /// Unique production label, e.g. `primaryIdentifier`.
    pub label: String,
    /// Left-hand non-terminal.
    pub lhs: usize,
    /// Position among the productions sharing `lhs`, starting at 1.
    pub ordinal: usize,
    /// Right-hand side in order; empty for an ε-production.
    pub rhs: Vec<Symbol>,
}

/// One parser action. The derived order (shift, then reduce by production
/// index, then accept) is the order in which alternatives are explored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "s{s}"),
            Action::Reduce(p) => write!(f, "r{p}"),
            Action::Accept => f.write_str("acc"),
        }
    }
}

/// Failure to load or store a [`ParseTable`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("malformed table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("table format version {found}, expected {expected}")]
    Version { found: u32, expected: u32 },

    #[error("table references {what} {index} out of range")]
    OutOfRange { what: &'static str, index: usize },
}

/// Action/goto tables plus grammar metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseTable {
    /// [`TABLE_FORMAT_VERSION`] of the generator that wrote it.
    pub version: u32,
    /// Terminal names; `end` is the last.
    pub terminals: Vec<String>,
    /// Non-terminal names; `Start` is the first.
    pub nonterminals: Vec<String>,
    /// Productions by index; production 0 is `Start -> ...`.
    pub productions: Vec<Production>,
    /// Index of the end-of-input terminal.
    pub end: usize,
    /// Per state, `(terminal, actions)` pairs sorted by terminal. Action
    /// lists are never empty.
    pub actions: Vec<Vec<(usize, Vec<Action>)>>,
    /// Per state, `(non-terminal, state)` pairs sorted by non-terminal.
    pub gotos: Vec<Vec<(usize, usize)>>,
}

impl ParseTable {
    /// Load a table written by [`ParseTable::to_json`], checking its version.
    pub fn from_json(text: &str) -> Result<Self, TableError> {
        let table: ParseTable = serde_json::from_str(text)?;
        table.validate()?;
        Ok(table)
    }

    /// Serialize the table.
    pub fn to_json(&self) -> Result<std::string::String, TableError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.version != TABLE_FORMAT_VERSION {
            return Err(TableError::Version {
                found: self.version,
                expected: TABLE_FORMAT_VERSION,
            });
        }
        let n_states = self.actions.len();
        let check = |what, index, bound| {
            if index < bound {
                Ok(())
            } else {
                Err(TableError::OutOfRange { what, index })
            }
        };
        check("terminal", self.end, self.terminals.len())?;
        for prod in &self.productions {
            check("non-terminal", prod.lhs, self.nonterminals.len())?;
            for sym in &prod.rhs {
                match *sym {
                    Symbol::Term(t) => check("terminal", t, self.terminals.len())?,
                    Symbol::NonTerm(n) => check("non-terminal", n, self.nonterminals.len())?,
                }
            }
        }
        for row in &self.actions {
            for (term, acts) in row {
                check("terminal", *term, self.terminals.len())?;
                for act in acts {
                    match *act {
                        Action::Shift(s) => check("state", s, n_states)?,
                        Action::Reduce(p) => check("production", p, self.productions.len())?,
                        Action::Accept => {}
                    }
                }
            }
        }
        if self.gotos.len() != n_states {
            return Err(TableError::OutOfRange {
                what: "goto row",
                index: self.gotos.len(),
            });
        }
        for row in &self.gotos {
            for (nt, s) in row {
                check("non-terminal", *nt, self.nonterminals.len())?;
                check("state", *s, n_states)?;
            }
        }
        Ok(())
    }

    /// Number of LR states.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.actions.len()
    }

    /// Actions for `(state, terminal)`; empty when the pair is an error.
    pub fn actions(&self, state: usize, terminal: usize) -> &[Action] {
        let Some(row) = self.actions.get(state) else {
            return &[];
        };
        match row.binary_search_by_key(&terminal, |(t, _)| *t) {
            Ok(i) => &row[i].1,
            Err(_) => &[],
        }
    }

    /// Target of the goto from `state` on `nonterminal`.
    pub fn goto(&self, state: usize, nonterminal: usize) -> Option<usize> {
        let row = self.gotos.get(state)?;
        row.binary_search_by_key(&nonterminal, |(n, _)| *n)
            .ok()
            .map(|i| row[i].1)
    }

    /// Index of the terminal called `name`.
    pub fn terminal(&self, name: &str) -> Option<usize> {
        self.terminals.iter().position(|t| t.as_str() == name)
    }

    /// Index of the non-terminal called `name`.
    pub fn nonterminal(&self, name: &str) -> Option<usize> {
        self.nonterminals.iter().position(|n| n.as_str() == name)
    }

    /// Production labelled `label`.
    pub fn production(&self, label: &str) -> Option<&Production> {
        self.productions.iter().find(|p| p.label.as_str() == label)
    }

    /// Number of `(state, terminal)` cells holding more than one action.
    pub fn conflict_count(&self) -> usize {
        self.actions
            .iter()
            .flatten()
            .filter(|(_, acts)| acts.len() > 1)
            .count()
    }

    /// Render a production as `Lhs -> a B c`.
    pub fn display_production(&self, index: usize) -> std::string::String {
        let Some(prod) = self.productions.get(index) else {
            return format!("<production {index}>");
        };
        let mut s = format!("{} ->", self.nonterminals[prod.lhs]);
        for sym in &prod.rhs {
            s.push(' ');
            match *sym {
                Symbol::Term(t) => s.push_str(&self.terminals[t]),
                Symbol::NonTerm(n) => s.push_str(&self.nonterminals[n]),
            }
        }
        s
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// `E -> E + n | n`, hand-built.
    pub(crate) fn sum_table() -> ParseTable {
        let p = |index, label: &str, lhs, ordinal, rhs| Production {
            index,
            label: label.into(),
            lhs,
            ordinal,
            rhs,
        };
        ParseTable {
            version: TABLE_FORMAT_VERSION,
            terminals: vec!["plus".into(), "n".into(), "end".into()],
            nonterminals: vec!["Start".into(), "E".into()],
            productions: vec![
                p(0, "start", 0, 1, vec![Symbol::NonTerm(1)]),
                p(1, "add", 1, 1, vec![Symbol::NonTerm(1), Symbol::Term(0), Symbol::Term(1)]),
                p(2, "num", 1, 2, vec![Symbol::Term(1)]),
            ],
            end: 2,
            actions: vec![
                vec![(1, vec![Action::Shift(2)])],
                vec![(0, vec![Action::Shift(3)]), (2, vec![Action::Accept])],
                vec![(0, vec![Action::Reduce(2)]), (2, vec![Action::Reduce(2)])],
                vec![(1, vec![Action::Shift(4)])],
                vec![(0, vec![Action::Reduce(1)]), (2, vec![Action::Reduce(1)])],
            ],
            gotos: vec![vec![(1, 1)], vec![], vec![], vec![], vec![]],
        }
    }

    #[test]
    fn lookups() {
        let t = sum_table();
        assert_eq!(t.actions(1, 2), &[Action::Accept]);
        assert!(t.actions(0, 0).is_empty());
        assert!(t.actions(99, 0).is_empty());
        assert_eq!(t.goto(0, 1), Some(1));
        assert_eq!(t.goto(2, 1), None);
        assert_eq!(t.terminal("plus"), Some(0));
        assert_eq!(t.production("add").map(|p| p.index), Some(1));
        assert_eq!(t.display_production(1), "E -> E plus n");
        assert_eq!(t.conflict_count(), 0);
    }

    #[test]
    fn json_artifact_is_checked() {
        let t = sum_table();
        let text = t.to_json().unwrap();
        assert_eq!(ParseTable::from_json(&text).unwrap(), t);

        let mut old = t.clone();
        old.version = 0;
        let err = ParseTable::from_json(&old.to_json().unwrap()).unwrap_err();
        assert!(matches!(err, TableError::Version { found: 0, .. }));

        let mut broken = t;
        broken.actions[0][0].1 = vec![Action::Shift(42)];
        let err = ParseTable::from_json(&broken.to_json().unwrap()).unwrap_err();
        assert!(matches!(err, TableError::OutOfRange { what: "state", index: 42 }));

        assert!(matches!(ParseTable::from_json("{"), Err(TableError::Json(_))));
    }

    #[test]
    fn action_order_explores_shift_first() {
        let mut acts = vec![Action::Accept, Action::Reduce(3), Action::Shift(9), Action::Reduce(1)];
        acts.sort();
        assert_eq!(
            acts,
            vec![Action::Shift(9), Action::Reduce(1), Action::Reduce(3), Action::Accept]
        );
    }
}
