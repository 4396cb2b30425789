use crate::grammar::Grammar;
use crate::lalr::Lalr;
use crate::lr0::Lr0;
use crate::report;
use crate::tables::{self, Conflict, GenOptions};
use anyhow::{Context, Result};
use btlr::{ParseTable, Production, TABLE_FORMAT_VERSION};
use std::path::Path;

/// Output of [`build_table`].
#[derive(Debug, Clone)]
pub struct Generated {
    pub table: ParseTable,
    /// Every conflicting cell, resolved or kept.
    pub conflicts: Vec<Conflict>,
    /// Productions, states, FIRST sets and conflicts as text.
    pub report: String,
}

/// Build the LALR(1) table for grammar `text`.
pub fn build_table(text: &str, options: &GenOptions) -> Result<Generated> {
    let grammar = Grammar::parse(text)?;
    let prods = grammar.encoded();
    let lr0 = Lr0::build(&prods, grammar.n_nonterms());
    let lalr = Lalr::build(&lr0, &prods, grammar.n_nonterms(), grammar.n_terms());
    let (actions, gotos, conflicts) = tables::build(&grammar, &prods, &lr0, &lalr, options)?;
    let report = report::render(&grammar, &prods, &lr0, &lalr, &conflicts);

    let productions = grammar
        .productions
        .iter()
        .enumerate()
        .map(|(index, p)| Production {
            index,
            label: p.label.clone(),
            lhs: p.lhs,
            ordinal: p.ordinal,
            rhs: p.rhs.clone(),
        })
        .collect();
    let table = ParseTable {
        version: TABLE_FORMAT_VERSION,
        terminals: grammar.terminals.clone(),
        nonterminals: grammar.nonterminals.clone(),
        productions,
        end: grammar.end(),
        actions,
        gotos,
    };
    log::info!(
        "table: {} states, {} conflicting cells",
        table.state_count(),
        table.conflict_count()
    );
    Ok(Generated {
        table,
        conflicts,
        report,
    })
}

/// Read `grammar_path` and write `<name>.json` (the table) and
/// `<name>.report` into `out_dir`.
pub fn generate<P, Q>(grammar_path: P, out_dir: Q, name: &str, options: &GenOptions) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let grammar_path = grammar_path.as_ref();
    let text = std::fs::read_to_string(grammar_path)
        .with_context(|| format!("reading {}", grammar_path.display()))?;
    let generated = build_table(&text, options)
        .with_context(|| format!("generating tables for {}", grammar_path.display()))?;

    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;
    let json_path = out_dir.join(format!("{name}.json"));
    std::fs::write(&json_path, generated.table.to_json()?)
        .with_context(|| format!("writing {}", json_path.display()))?;
    let report_path = out_dir.join(format!("{name}.report"));
    std::fs::write(&report_path, &generated.report)
        .with_context(|| format!("writing {}", report_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ConflictKind, ConflictPolicy, Resolution};
    use btlr::Action;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    const DANGLING: &str = "
        Stmt -> if Cond then Stmt
        Stmt -> if Cond then Stmt else Stmt
        Stmt -> other
        Cond -> c
    ";

    #[test]
    fn dangling_else_prefers_shift() {
        init_logger();
        let options = GenOptions {
            prefer_shift: vec!["else".into()],
            conflicts: ConflictPolicy::Reject,
        };
        let g = build_table(DANGLING, &options).unwrap();
        assert_eq!(g.conflicts.len(), 1);
        let c = &g.conflicts[0];
        assert_eq!(c.kind, ConflictKind::ShiftReduce);
        assert_eq!(c.resolution, Resolution::PreferShift);
        let else_t = g.table.terminal("else").unwrap();
        assert_eq!(c.terminal, else_t);
        let cell = g.table.actions(c.state, else_t);
        assert_eq!(cell.len(), 1);
        assert!(matches!(cell[0], Action::Shift(_)));
        assert_eq!(g.table.conflict_count(), 0);
        assert!(g.report.contains("resolved by shift"));
    }

    #[test]
    fn conflicts_kept_or_rejected() {
        let err = build_table(DANGLING, &GenOptions {
            prefer_shift: vec![],
            conflicts: ConflictPolicy::Reject,
        })
        .unwrap_err();
        assert!(err.to_string().contains("unresolved"), "{err}");

        let g = build_table(DANGLING, &GenOptions::default()).unwrap();
        assert_eq!(g.table.conflict_count(), 1);
    }

    #[test]
    fn reduce_reduce_is_reported() {
        let text = "
            S -> A x
            S -> B x
            A -> id
            B -> id
        ";
        let g = build_table(text, &GenOptions::default()).unwrap();
        assert_eq!(g.conflicts.len(), 1);
        assert_eq!(g.conflicts[0].kind, ConflictKind::ReduceReduce);
        let a = g.table.production("a1").unwrap().index;
        let b = g.table.production("b1").unwrap().index;
        assert_eq!(g.conflicts[0].actions, vec![Action::Reduce(a), Action::Reduce(b)]);
    }

    #[test]
    fn lalr_grammar_has_no_conflicts() {
        let text = "
            S -> L = R
            S -> R
            L -> * R
            L -> id
            R -> L
        ";
        let options = GenOptions {
            prefer_shift: vec![],
            conflicts: ConflictPolicy::Reject,
        };
        let g = build_table(text, &options).unwrap();
        assert!(g.conflicts.is_empty());
        let end = g.table.end;
        let accepts = (0..g.table.state_count())
            .filter(|s| g.table.actions(*s, end) == [Action::Accept])
            .count();
        assert_eq!(accepts, 1);
    }

    #[test]
    fn undefined_nonterminal_is_fatal() {
        assert!(build_table("S -> A\n", &GenOptions::default()).is_err());
    }

    #[test]
    fn generate_writes_artifacts() {
        let dir = std::env::temp_dir().join(format!("btlr-gen-{}", std::process::id()));
        let grammar = dir.join("dangling.g");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&grammar, DANGLING).unwrap();
        generate(&grammar, &dir, "dangling", &GenOptions::default()).unwrap();
        let json = std::fs::read_to_string(dir.join("dangling.json")).unwrap();
        let table = ParseTable::from_json(&json).unwrap();
        assert!(table.production("stmt2").is_some());
        assert!(dir.join("dangling.report").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
