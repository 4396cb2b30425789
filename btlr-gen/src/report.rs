//! Human-readable generation report.

use crate::grammar::Grammar;
use crate::lalr::Lalr;
use crate::lr0::{Item, Lr0};
use crate::tables::Conflict;
use std::fmt::Write;

fn write_item(out: &mut String, item: &Item, prods: &[Vec<usize>], names: &[impl AsRef<str>]) {
    let p = &prods[item.prod];
    let _ = write!(out, "{} ->", names[p[0]].as_ref());
    for (j, sym) in p.iter().enumerate().skip(1) {
        if j == item.dot {
            out.push_str(" .");
        }
        let _ = write!(out, " {}", names[*sym].as_ref());
    }
    if item.dot == p.len() {
        out.push_str(" .");
    }
}

/// Productions, LR(0) kernels with lookaheads, FIRST sets and conflicts.
pub fn render(
    grammar: &Grammar,
    prods: &[Vec<usize>],
    lr0: &Lr0,
    lalr: &Lalr,
    conflicts: &[Conflict],
) -> String {
    let names = grammar.symbol_names();
    let mut out = String::new();

    let _ = writeln!(out, "PRODUCTIONS {}\n", prods.len());
    for (i, p) in grammar.productions.iter().enumerate() {
        let _ = write!(out, "{i:4} {:<24} ", p.label);
        write_item(&mut out, &Item::new(i, usize::MAX), prods, &names);
        out.push('\n');
    }

    let _ = writeln!(out, "\nSTATES {}\n", lr0.len());
    for (s, kernel) in lalr.kernels.iter().enumerate() {
        let _ = writeln!(out, "state {s}");
        for (item, la) in kernel {
            out.push_str("    ");
            write_item(&mut out, item, prods, &names);
            out.push_str("    {");
            for (k, l) in la.iter().enumerate() {
                if k > 0 {
                    out.push_str(", ");
                }
                out.push_str(names[*l].as_ref());
            }
            out.push_str("}\n");
        }
        for (sym, target) in &lr0.transitions[s] {
            let _ = writeln!(out, "    {} => {target}", names[*sym]);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "FIRST\n");
    for nt in 0..grammar.n_nonterms() {
        let _ = write!(out, "{} {{", names[nt]);
        if lalr.first.nullable[nt] {
            out.push_str("`empty'");
            if !lalr.first.first[nt].is_empty() {
                out.push_str(", ");
            }
        }
        let firsts: Vec<&str> = lalr.first.first[nt].iter().map(|t| names[*t].as_str()).collect();
        out.push_str(&firsts.join(", "));
        out.push_str("}\n");
    }

    let _ = writeln!(out, "\nCONFLICTS {}\n", conflicts.len());
    for c in conflicts {
        let _ = writeln!(out, "{c} on `{}`", grammar.terminals[c.terminal]);
    }
    out
}
