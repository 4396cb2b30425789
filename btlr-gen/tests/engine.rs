//! Generated tables driven by the backtracking parser.

use btlr::{ParseError, ParseTable, Parser, ParserConfig, ParserDriver, Production};
use btlr_gen::grammar::sym_name;
use btlr_gen::{ConflictPolicy, GenOptions, build_table};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Renders each tree as an s-expression labelled by production.
struct SExpr<'t> {
    table: &'t ParseTable,
}

impl ParserDriver for SExpr<'_> {
    type Token = String;
    type Value = String;
    type Context = ();
    type Error = usize;

    /// Punctuation is looked up by the name the grammar lexer gives it.
    fn terminal(&self, token: &String) -> usize {
        let mut chars = token.chars();
        let name = match (chars.next(), chars.next()) {
            (Some(c), None) => sym_name(c).unwrap_or(token.as_str()),
            _ => token.as_str(),
        };
        self.table.terminal(name).unwrap_or(usize::MAX)
    }

    fn shift(&mut self, _ctx: &mut (), token: &String, _index: usize) -> Result<String, usize> {
        Ok(token.clone())
    }

    fn reduce(&mut self, _ctx: &mut (), production: &Production, children: Vec<String>) -> Result<String, usize> {
        Ok(format!("({} {})", production.label, children.join(" ")))
    }

    fn syntax_error(&self, _token: &String, index: usize) -> usize {
        index
    }
}

fn parse(table: &ParseTable, input: &str) -> Result<Vec<String>, ParseError<usize>> {
    let mut tokens: Vec<String> = input.split_whitespace().map(String::from).collect();
    tokens.push("end".into());
    let mut parser = Parser::new(table, SExpr { table }, ParserConfig::default());
    parser.parse(&tokens)
}

const EXPR: &str = "
    add: E -> E + E
    mul: E -> E * E
    num: E -> n
";

const IF: &str = "
    ifThen: S -> if c then S
    ifElse: S -> if c then S else S
    other: S -> x
";

#[test]
fn ambiguous_expression_yields_every_tree() {
    init_logger();
    let g = build_table(EXPR, &GenOptions::default()).unwrap();
    assert!(g.table.conflict_count() > 0);
    let trees = parse(&g.table, "n + n * n").unwrap();
    assert_eq!(
        trees,
        vec![
            "(add (num n) + (mul (num n) * (num n)))".to_string(),
            "(mul (add (num n) + (num n)) * (num n))".to_string(),
        ]
    );
}

#[test]
fn punctuation_terminals_carry_names() {
    let g = build_table(EXPR, &GenOptions::default()).unwrap();
    assert!(g.table.terminal("plus").is_some());
    assert!(g.table.terminal("asterisk").is_some());
    assert_eq!(g.table.terminal("+"), None);
}

#[test]
fn catalan_number_of_trees() {
    let g = build_table(EXPR, &GenOptions::default()).unwrap();
    let trees = parse(&g.table, "n + n + n + n + n").unwrap();
    assert_eq!(trees.len(), 14);
    let again = parse(&g.table, "n + n + n + n + n").unwrap();
    assert_eq!(trees, again);
}

#[test]
fn dangling_else_binds_to_nearest_if() {
    init_logger();
    let options = GenOptions {
        prefer_shift: vec!["else".into()],
        conflicts: ConflictPolicy::Reject,
    };
    let g = build_table(IF, &options).unwrap();
    let trees = parse(&g.table, "if c then if c then x else x").unwrap();
    assert_eq!(
        trees,
        vec!["(ifThen if c then (ifElse if c then (other x) else (other x)))".to_string()]
    );
}

#[test]
fn dangling_else_without_preference_is_ambiguous() {
    let g = build_table(IF, &GenOptions::default()).unwrap();
    let trees = parse(&g.table, "if c then if c then x else x").unwrap();
    assert_eq!(trees.len(), 2);
}

#[test]
fn syntax_error_at_deepest_token() {
    let g = build_table(EXPR, &GenOptions::default()).unwrap();
    assert_eq!(parse(&g.table, "n + * n"), Err(ParseError::NoParse(2)));
    assert_eq!(parse(&g.table, "n n"), Err(ParseError::NoParse(1)));
    assert_eq!(parse(&g.table, ""), Err(ParseError::NoParse(0)));
}

#[test]
fn table_survives_json_round_trip() {
    let g = build_table(IF, &GenOptions::default()).unwrap();
    let table = ParseTable::from_json(&g.table.to_json().unwrap()).unwrap();
    assert_eq!(
        parse(&table, "if c then x else x").unwrap(),
        parse(&g.table, "if c then x else x").unwrap()
    );
}
