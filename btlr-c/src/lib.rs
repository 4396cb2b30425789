//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! Front end for C (without the preprocessor) built on the `btlr` runtime.
//!
//! The C grammar is ambiguous until one knows which identifiers are typedef
//! names: `a * b;` declares `b` if `a` is a type and multiplies otherwise.
//! This crate parses with a non-deterministic LALR(1) table, keeps every
//! derivation the parser cannot rule out, and then decides between them with
//! exact scope rules.
//!
//! Key components:
//! - [`lexer`]: five automaton recognizers (identifiers and keywords,
//!   numbers, strings, characters, punctuators) and the driver that tokenizes
//!   a whole input;
//! - [`grammar`]: the parse table generated from `c.g` at build time;
//! - [`driver`]: the parser driver building trees and pruning impossible
//!   typedef readings on the fly;
//! - [`chop`]: scope analysis of the accepted trees;
//! - [`FrontEnd`]: the pipeline from source text to trees.
//!
//! # Example
//!
//! ```
//! use btlr_c::{FrontConfig, FrontEnd};
//!
//! let front = FrontEnd::new(FrontConfig::default()).unwrap();
//! let unit = front.parse("typedef int a; int main() { int a; int b; a*b; }").unwrap();
//! assert_eq!(unit.tree.find(front.grammar(), "multiply").count(), 1);
//! ```

pub mod chop;
pub mod config;
pub mod driver;
pub mod error;
pub mod front;
pub mod grammar;
pub mod lexer;
pub mod scope;
pub mod token;
pub mod tree;

pub use config::FrontConfig;
pub use error::{ErrorKind, FrontError, LexError, ScopeError, Stage};
pub use front::{Analysis, Forest, FrontEnd, TranslationUnit};
pub use grammar::{CGrammar, GrammarError, c_grammar};
pub use lexer::tokenize;
pub use token::{LiteralValue, Token, TokenKind};
pub use tree::{Node, NodeId, NodeKind, Tree};
