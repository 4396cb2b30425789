//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! LALR(1) table generator.
//!
//! `btlr-gen` reads a `.g` grammar, builds the LR(0) automaton, computes
//! LALR(1) lookaheads and emits a [`btlr::ParseTable`]. Conflicting cells are
//! either resolved by shift for selected terminals, kept for the
//! backtracking parser, or rejected, as chosen by [`GenOptions`].
//!
//! Use [`generate`] from a `build.rs` script, or the `btlr-gen` binary
//! (feature `cli`).
//!
//! ```rust
//! use btlr_gen::{GenOptions, build_table};
//!
//! let generated = build_table("Sum -> Sum + n\nSum -> n\n", &GenOptions::default()).unwrap();
//! assert!(generated.conflicts.is_empty());
//! assert_eq!(generated.table.nonterminals[0].as_str(), "Start");
//! ```

mod generate;
pub mod grammar;
pub mod lalr;
pub mod lr0;
mod report;
mod tables;

pub use generate::{Generated, build_table, generate};
pub use tables::{Conflict, ConflictKind, ConflictPolicy, GenOptions, Resolution};
