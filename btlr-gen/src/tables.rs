//! Action and goto table construction with conflict handling.
//!
//! Shift and goto entries come from the LR(0) transitions, reduce entries
//! from the LALR(1) lookaheads of completed items, and the completed start
//! item becomes `Accept` on `end`. A cell holding more than one action is a
//! conflict:
//!
//! * shift/shift cannot arise from a well-formed automaton and aborts
//!   generation;
//! * a shift/reduce conflict on a terminal listed in
//!   [`GenOptions::prefer_shift`] keeps only the shift (the classic
//!   dangling-`else` resolution);
//! * every other conflict is kept in the table for the backtracking parser
//!   under [`ConflictPolicy::Report`], or fails generation under
//!   [`ConflictPolicy::Reject`].

use crate::grammar::Grammar;
use crate::lalr::Lalr;
use crate::lr0::Lr0;
use anyhow::{Result, bail};
use btlr::Action;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Keep conflicting actions and log them.
    #[default]
    Report,
    /// Fail on any conflict not resolved by `prefer_shift`.
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenOptions {
    /// Terminals whose shift/reduce conflicts resolve to shift.
    pub prefer_shift: Vec<String>,
    pub conflicts: ConflictPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    PreferShift,
    Kept,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub state: usize,
    pub terminal: usize,
    pub kind: ConflictKind,
    /// Actions before resolution.
    pub actions: Vec<Action>,
    pub resolution: Resolution,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ConflictKind::ShiftReduce => "shift/reduce",
            ConflictKind::ReduceReduce => "reduce/reduce",
        };
        write!(f, "state {} terminal {}: {kind} [", self.state, self.terminal)?;
        for (i, a) in self.actions.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{a}")?;
        }
        match self.resolution {
            Resolution::PreferShift => f.write_str("] resolved by shift"),
            Resolution::Kept => f.write_str("] kept"),
        }
    }
}

pub type ActionRows = Vec<Vec<(usize, Vec<Action>)>>;
pub type GotoRows = Vec<Vec<(usize, usize)>>;

pub fn build(
    grammar: &Grammar,
    prods: &[Vec<usize>],
    lr0: &Lr0,
    lalr: &Lalr,
    options: &GenOptions,
) -> Result<(ActionRows, GotoRows, Vec<Conflict>)> {
    let n_nonterm = grammar.n_nonterms();
    let end = grammar.end();
    let prefer: BTreeSet<usize> = options
        .prefer_shift
        .iter()
        .filter_map(|name| {
            let t = grammar.terminals.iter().position(|t| t.as_str() == name.as_str());
            if t.is_none() {
                log::warn!("prefer-shift terminal `{name}` is not in the grammar");
            }
            t
        })
        .collect();

    let mut actions = Vec::with_capacity(lr0.len());
    let mut gotos = Vec::with_capacity(lr0.len());
    let mut conflicts = Vec::new();

    for state in 0..lr0.len() {
        let mut cells: BTreeMap<usize, BTreeSet<Action>> = BTreeMap::new();
        let mut goto_row = Vec::new();

        for (&sym, &target) in &lr0.transitions[state] {
            if sym < n_nonterm {
                goto_row.push((sym, target));
                continue;
            }
            let cell = cells.entry(sym - n_nonterm).or_default();
            if let Some(other) = cell.iter().find(|a| matches!(a, Action::Shift(_))) {
                bail!(
                    "state {state}: shift/shift conflict on `{}` ({other} vs s{target})",
                    grammar.terminals[sym - n_nonterm]
                );
            }
            cell.insert(Action::Shift(target));
        }

        for (prod, lookaheads) in lalr.reductions(state, prods) {
            for la in lookaheads {
                let term = la - n_nonterm;
                let action = if prod == 0 {
                    if term != end {
                        continue;
                    }
                    Action::Accept
                } else {
                    Action::Reduce(prod)
                };
                cells.entry(term).or_default().insert(action);
            }
        }

        let mut row = Vec::with_capacity(cells.len());
        for (term, set) in cells {
            let mut acts: Vec<Action> = set.into_iter().collect();
            if acts.len() > 1 {
                let has_shift = acts.iter().any(|a| matches!(a, Action::Shift(_)));
                let kind = if has_shift {
                    ConflictKind::ShiftReduce
                } else {
                    ConflictKind::ReduceReduce
                };
                let resolution = if has_shift && prefer.contains(&term) {
                    Resolution::PreferShift
                } else {
                    Resolution::Kept
                };
                conflicts.push(Conflict {
                    state,
                    terminal: term,
                    kind,
                    actions: acts.clone(),
                    resolution,
                });
                if resolution == Resolution::PreferShift {
                    acts.retain(|a| matches!(a, Action::Shift(_)));
                }
            }
            row.push((term, acts));
        }
        actions.push(row);
        gotos.push(goto_row);
    }

    let kept: Vec<&Conflict> = conflicts
        .iter()
        .filter(|c| c.resolution == Resolution::Kept)
        .collect();
    for c in &conflicts {
        log::debug!("{c} on `{}`", grammar.terminals[c.terminal]);
    }
    if !kept.is_empty() {
        match options.conflicts {
            ConflictPolicy::Reject => {
                let listed: Vec<String> = kept
                    .iter()
                    .take(5)
                    .map(|c| format!("{c} on `{}`", grammar.terminals[c.terminal]))
                    .collect();
                bail!("{} unresolved conflicts: {}", kept.len(), listed.join("; "));
            }
            ConflictPolicy::Report => {
                log::warn!(
                    "{} conflicting cells kept for backtracking ({} resolved by shift)",
                    kept.len(),
                    conflicts.len() - kept.len()
                );
            }
        }
    }
    Ok((actions, gotos, conflicts))
}
