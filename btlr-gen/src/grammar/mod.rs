//! Grammar description: reading, augmentation and validation.
//!
//! [`Grammar::parse`] turns grammar text into numbered productions. The
//! grammar is augmented with non-terminal `Start` (index 0), production
//! `start: Start -> <first lhs>` (index 0) and terminal `end`, which is
//! always the last terminal. Productions without a label are named after
//! their left-hand side and ordinal, e.g. the third `Expr` production is
//! `expr3`.
//!
//! The LR construction works on an integer encoding of the productions
//! ([`Grammar::encoded`]): each production is a vector whose element 0 is
//! the left-hand side and whose remaining elements are the right-hand side,
//! with non-terminals numbered `0..n_nonterms` and terminal `t` numbered
//! `n_nonterms + t`.

mod lexer;
mod parser;
mod symtab;

pub use lexer::{SYM_NAMES, sym_name};

use anyhow::{Context, Result, anyhow, bail};
use btlr::Symbol;
use chumsky::Parser as _;
use lexer::LexContext;
use smartstring::alias::String;
use std::collections::HashSet;

pub const START: &str = "Start";
pub const END: &str = "end";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarProduction {
    pub label: String,
    pub lhs: usize,
    pub ordinal: usize,
    pub rhs: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub terminals: Vec<String>,
    pub nonterminals: Vec<String>,
    pub productions: Vec<GrammarProduction>,
}

impl Grammar {
    pub fn parse(text: &str) -> Result<Self> {
        let mut ctx = LexContext::default();
        ctx.nonterms.add(START);
        let lines = lexer::tokenize_lines(text, &mut ctx)?;

        let mut raw = Vec::with_capacity(lines.len());
        for line in &lines {
            let prod = parser::parser()
                .parse(&line.tokens)
                .into_result()
                .map_err(|_| anyhow!("line {}: malformed production", line.number))?;
            raw.push(prod);
        }
        let Some(first) = raw.first() else {
            bail!("grammar has no productions");
        };
        if first.lhs == 0 {
            bail!("`{START}` is reserved");
        }
        let end = ctx.terms.add(END);

        let mut productions = vec![GrammarProduction {
            label: "start".into(),
            lhs: 0,
            ordinal: 1,
            rhs: vec![Symbol::NonTerm(first.lhs)],
        }];
        let mut ordinals = vec![0usize; ctx.nonterms.len()];
        let mut seen = HashSet::new();
        seen.insert(String::from("start"));
        for (prod, line) in raw.iter().zip(&lines) {
            if prod.lhs == 0 {
                bail!("line {}: `{START}` is reserved", line.number);
            }
            if prod.rhs.contains(&Symbol::Term(end)) {
                bail!("line {}: `{END}` is reserved", line.number);
            }
            ordinals[prod.lhs] += 1;
            let ordinal = ordinals[prod.lhs];
            let label: String = match prod.label {
                Some(l) => ctx.labels.name(l).context("label index")?.into(),
                None => default_label(ctx.nonterms.name(prod.lhs).context("lhs index")?, ordinal),
            };
            if !seen.insert(label.clone()) {
                bail!("line {}: duplicate production label `{label}`", line.number);
            }
            productions.push(GrammarProduction {
                label,
                lhs: prod.lhs,
                ordinal,
                rhs: prod.rhs.clone(),
            });
        }

        let grammar = Grammar {
            terminals: ctx.terms.to_vec(),
            nonterminals: ctx.nonterms.to_vec(),
            productions,
        };
        grammar.validate()?;
        log::info!(
            "grammar: {} terminals, {} non-terminals, {} productions",
            grammar.terminals.len(),
            grammar.nonterminals.len(),
            grammar.productions.len()
        );
        Ok(grammar)
    }

    /// Every non-terminal must have a production.
    fn validate(&self) -> Result<()> {
        let mut defined = vec![false; self.nonterminals.len()];
        for p in &self.productions {
            defined[p.lhs] = true;
        }
        let undefined: Vec<&str> = defined
            .iter()
            .enumerate()
            .filter(|(_, d)| !**d)
            .map(|(i, _)| self.nonterminals[i].as_str())
            .collect();
        if !undefined.is_empty() {
            bail!("non-terminals without productions: {}", undefined.join(", "));
        }
        Ok(())
    }

    #[inline]
    pub fn n_terms(&self) -> usize {
        self.terminals.len()
    }

    #[inline]
    pub fn n_nonterms(&self) -> usize {
        self.nonterminals.len()
    }

    /// Index of the end-of-input terminal.
    #[inline]
    pub fn end(&self) -> usize {
        self.terminals.len() - 1
    }

    pub fn encoded(&self) -> Vec<Vec<usize>> {
        let n = self.n_nonterms();
        self.productions
            .iter()
            .map(|p| {
                std::iter::once(p.lhs)
                    .chain(p.rhs.iter().map(|s| match *s {
                        Symbol::NonTerm(i) => i,
                        Symbol::Term(i) => n + i,
                    }))
                    .collect()
            })
            .collect()
    }

    /// Names of all symbols in encoded order.
    pub fn symbol_names(&self) -> Vec<String> {
        self.nonterminals
            .iter()
            .chain(self.terminals.iter())
            .cloned()
            .collect()
    }
}

fn default_label(lhs: &str, ordinal: usize) -> String {
    let mut chars = lhs.chars();
    let mut label = String::new();
    if let Some(c) = chars.next() {
        for lc in c.to_lowercase() {
            label.push(lc);
        }
    }
    label.push_str(chars.as_str());
    label.push_str(&ordinal.to_string());
    label
}
