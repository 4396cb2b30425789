//! The generated C parse table and what the front end knows about it.
//!
//! The table is produced at build time from `c.g` and embedded as JSON. At
//! first use it is deserialized once, and the productions and non-terminals
//! the driver and the disambiguator care about are looked up by name into
//! [`Rule`] and [`Category`].

use crate::token::TokenKind;
use btlr::{ParseTable, TableError};
use once_cell::sync::OnceCell;
use thiserror::Error;

const TABLE_JSON: &str = include_str!(concat!(env!("OUT_DIR"), "/c_tables.json"));

static C_GRAMMAR: OnceCell<CGrammar> = OnceCell::new();

/// The embedded table does not fit this front end.
#[derive(Debug, Error)]
pub enum GrammarError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("C grammar has no {what} `{name}`")]
    Missing { what: &'static str, name: &'static str },
}

/// Productions with a meaning of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// `TypedefName -> identifier`
    TypedefName,
    /// `PrimaryExpression -> identifier`
    PrimaryIdentifier,
    /// `DirectDeclarator -> identifier`
    DeclaratorName,
    /// `StorageClassSpecifier -> typedef`
    TypedefStorage,
    /// `TypeSpecifier -> TypedefName`
    NamedType,
    /// `DirectDeclarator -> DirectDeclarator ( ParameterTypeList )`
    FunctionDeclarator,
    /// `DirectDeclarator -> DirectDeclarator ( )`
    FunctionDeclaratorEmpty,
    /// any of the four `for` statements
    For,
    Other,
}

const RULES: &[(&str, Rule)] = &[
    ("typedefName", Rule::TypedefName),
    ("primaryIdentifier", Rule::PrimaryIdentifier),
    ("declaratorName", Rule::DeclaratorName),
    ("typedefStorage", Rule::TypedefStorage),
    ("namedType", Rule::NamedType),
    ("functionDeclarator", Rule::FunctionDeclarator),
    ("functionDeclaratorEmpty", Rule::FunctionDeclaratorEmpty),
    ("forExpr", Rule::For),
    ("forExprStep", Rule::For),
    ("forDecl", Rule::For),
    ("forDeclStep", Rule::For),
];

/// Non-terminals the driver and the disambiguator treat specially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    FunctionDefinition,
    Declaration,
    DeclarationSpecifiers,
    SpecifierQualifierList,
    TypeSpecifier,
    InitDeclaratorList,
    InitDeclarator,
    DeclaratorInit,
    Declarator,
    DirectDeclarator,
    DirectAbstractDeclarator,
    ParameterTypeList,
    ParameterList,
    ParameterDeclaration,
    Enumerator,
    BlockOpen,
    CompoundStatement,
    IterationStatement,
    Other,
}

const CATEGORIES: &[(&str, Category)] = &[
    ("FunctionDefinition", Category::FunctionDefinition),
    ("Declaration", Category::Declaration),
    ("DeclarationSpecifiers", Category::DeclarationSpecifiers),
    ("SpecifierQualifierList", Category::SpecifierQualifierList),
    ("TypeSpecifier", Category::TypeSpecifier),
    ("InitDeclaratorList", Category::InitDeclaratorList),
    ("InitDeclarator", Category::InitDeclarator),
    ("DeclaratorInit", Category::DeclaratorInit),
    ("Declarator", Category::Declarator),
    ("DirectDeclarator", Category::DirectDeclarator),
    ("DirectAbstractDeclarator", Category::DirectAbstractDeclarator),
    ("ParameterTypeList", Category::ParameterTypeList),
    ("ParameterList", Category::ParameterList),
    ("ParameterDeclaration", Category::ParameterDeclaration),
    ("Enumerator", Category::Enumerator),
    ("BlockOpen", Category::BlockOpen),
    ("CompoundStatement", Category::CompoundStatement),
    ("IterationStatement", Category::IterationStatement),
];

/// The C parse table with its lookup tables.
#[derive(Debug)]
pub struct CGrammar {
    /// The generated table.
    pub table: ParseTable,
    /// Terminal index per [`TokenKind`] discriminant; `usize::MAX` for kinds
    /// the grammar never mentions (`#`, `##`).
    terminals: Vec<usize>,
    rules: Vec<Rule>,
    categories: Vec<Category>,
}

impl CGrammar {
    /// Index the productions and non-terminals of `table` that have a
    /// meaning to the front end. Fails if one is missing.
    pub fn from_table(table: ParseTable) -> Result<Self, GrammarError> {
        let mut terminals = Vec::new();
        let mut raw: u16 = 0;
        while let Ok(kind) = TokenKind::try_from(raw) {
            let index = match kind {
                TokenKind::End => table.end,
                _ => table.terminal(kind.terminal_name()).unwrap_or(usize::MAX),
            };
            terminals.push(index);
            raw += 1;
        }

        let mut rules = vec![Rule::Other; table.productions.len()];
        for &(label, rule) in RULES {
            let production = table.production(label).ok_or(GrammarError::Missing {
                what: "production",
                name: label,
            })?;
            rules[production.index] = rule;
        }

        let mut categories = vec![Category::Other; table.nonterminals.len()];
        for &(name, category) in CATEGORIES {
            let index = table.nonterminal(name).ok_or(GrammarError::Missing {
                what: "non-terminal",
                name,
            })?;
            categories[index] = category;
        }

        Ok(Self {
            table,
            terminals,
            rules,
            categories,
        })
    }

    /// Terminal index of `kind`; `usize::MAX` if the grammar has none.
    pub fn terminal(&self, kind: TokenKind) -> usize {
        self.terminals[usize::from(u16::from(kind))]
    }

    /// The [`Rule`] of `production`, [`Rule::Other`] for most.
    pub fn rule(&self, production: usize) -> Rule {
        self.rules[production]
    }

    /// Category of the left-hand side of `production`.
    pub fn category(&self, production: usize) -> Category {
        self.categories[self.table.productions[production].lhs]
    }

    /// Label of `production`, as written in `c.g` or generated.
    pub fn label(&self, production: usize) -> &str {
        &self.table.productions[production].label
    }
}

/// The embedded C grammar, deserialized on first use.
pub fn c_grammar() -> Result<&'static CGrammar, GrammarError> {
    C_GRAMMAR.get_or_try_init(|| {
        let grammar = CGrammar::from_table(ParseTable::from_json(TABLE_JSON)?)?;
        log::debug!(
            "C grammar: {} states, {} productions, {} conflicting cells",
            grammar.table.state_count(),
            grammar.table.productions.len(),
            grammar.table.conflict_count()
        );
        Ok(grammar)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use btlr::Action;

    #[test]
    fn embedded_table_loads() {
        let g = c_grammar().unwrap();
        assert_eq!(g.table.nonterminals[0], "Start");
        assert_eq!(g.table.nonterminals[1], "TranslationUnit");
        assert_eq!(g.terminal(TokenKind::End), g.table.end);
        assert_eq!(g.terminal(TokenKind::Hash), usize::MAX);
        assert_ne!(g.terminal(TokenKind::Identifier), usize::MAX);
    }

    #[test]
    fn every_grammar_terminal_has_a_token_kind() {
        let g = c_grammar().unwrap();
        let mut raw: u16 = 0;
        let mut named = vec![];
        while let Ok(kind) = TokenKind::try_from(raw) {
            named.push(kind.terminal_name());
            raw += 1;
        }
        for t in &g.table.terminals {
            assert!(named.contains(&t.as_str()), "no token kind for `{t}`");
        }
    }

    #[test]
    fn else_is_never_ambiguous() {
        let g = c_grammar().unwrap();
        assert!(g.table.conflict_count() > 0);
        // `else` always shifts
        let else_t = g.terminal(TokenKind::Else);
        for state in 0..g.table.state_count() {
            let actions = g.table.actions(state, else_t);
            if actions.iter().any(|a| matches!(a, Action::Shift(_))) {
                assert_eq!(actions.len(), 1);
            }
        }
    }

    #[test]
    fn rules_and_categories_are_mapped() {
        let g = c_grammar().unwrap();
        let p = g.table.production("typedefName").unwrap().index;
        assert_eq!(g.rule(p), Rule::TypedefName);
        let p = g.table.production("forDeclStep").unwrap().index;
        assert_eq!(g.rule(p), Rule::For);
        assert_eq!(g.category(p), Category::IterationStatement);
        let p = g.table.production("multiply").unwrap().index;
        assert_eq!(g.rule(p), Rule::Other);
        assert_eq!(g.label(p), "multiply");
    }
}
