//! Grammar file lexer.
//!
//! Grammar files hold one production per line:
//!
//! ```text
//! -- comment
//! addExpr: Expr -> Expr + Term
//! Term -> number
//! ```
//!
//! Upper-case words are non-terminals, lower-case words are terminals and a
//! single punctuation character is a terminal named through [`SYM_NAMES`]
//! (`+` is `plus`). A lower-case word followed by `:` labels the production.
//!
//! The raw tokens come from a [`logos`] lexer; [`tokenize_lines`] interns the
//! names and groups the tokens by source line.

use super::symtab::Symtab;
use anyhow::{Result, anyhow};
use logos::Logos;

/// Symbol tables filled while lexing.
#[derive(Default, Debug)]
pub struct LexContext {
    pub terms: Symtab,
    pub nonterms: Symtab,
    pub labels: Symtab,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `name:`
    Label(usize),
    NonTerm(usize),
    /// `->`
    Arrow,
    Term(usize),
}

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\f\r]+")]
enum LogosToken {
    #[regex(r"\n")]
    LineFeed,

    #[regex(r"--[^\n]*")]
    Comment,

    #[token("->")]
    Arrow,

    #[regex(r"[a-z_][a-zA-Z0-9_]*:")]
    Label,

    #[regex(r"[a-z_][a-zA-Z0-9_]*")]
    Atom,

    #[regex(r"[A-Z][a-zA-Z0-9_]*")]
    Var,

    #[regex(r###"[-~`!@#$%^&*+=|\\<>?/;\(\)\[\]{},\.'":]"###)]
    Sym,
}

/// Names of single-character terminals.
pub const SYM_NAMES: &[(char, &str)] = &[
    ('.', "dot"),
    ('-', "minus"),
    ('~', "tilde"),
    ('`', "backtick"),
    ('!', "exclamation"),
    ('@', "at"),
    ('#', "hash"),
    ('$', "dollar"),
    ('%', "percent"),
    ('^', "caret"),
    ('&', "ampersand"),
    ('*', "asterisk"),
    ('+', "plus"),
    ('=', "equals"),
    ('|', "pipe"),
    ('\\', "backslash"),
    ('<', "lessThan"),
    ('>', "greaterThan"),
    ('?', "question"),
    ('/', "slash"),
    (';', "semicolon"),
    ('(', "leftParen"),
    (')', "rightParen"),
    ('[', "leftBrack"),
    (']', "rightBrack"),
    ('{', "leftBrace"),
    ('}', "rightBrace"),
    (',', "comma"),
    ('\'', "singleQuote"),
    ('"', "doubleQuote"),
    (':', "colon"),
];

/// Terminal name of a punctuation character.
pub fn sym_name(c: char) -> Option<&'static str> {
    SYM_NAMES.iter().find(|(s, _)| *s == c).map(|(_, n)| *n)
}

/// One source line worth of tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    pub tokens: Vec<Token>,
}

/// Tokenize `input`, interning names into `ctx`. Blank and comment-only
/// lines are dropped.
pub fn tokenize_lines(input: &str, ctx: &mut LexContext) -> Result<Vec<Line>> {
    let mut lex = LogosToken::lexer(input);
    let mut lines = Vec::new();
    let mut current = Line {
        number: 1,
        tokens: Vec::new(),
    };
    while let Some(kind) = lex.next() {
        let slice = lex.slice();
        let kind = kind.map_err(|_| anyhow!("line {}: unexpected {:?}", current.number, slice))?;
        let token = match kind {
            LogosToken::LineFeed => {
                let next = Line {
                    number: current.number + 1,
                    tokens: Vec::new(),
                };
                let done = std::mem::replace(&mut current, next);
                if !done.tokens.is_empty() {
                    lines.push(done);
                }
                continue;
            }
            LogosToken::Comment => continue,
            LogosToken::Arrow => Token::Arrow,
            LogosToken::Label => Token::Label(ctx.labels.add(&slice[..slice.len() - 1])),
            LogosToken::Atom => Token::Term(ctx.terms.add(slice)),
            LogosToken::Var => Token::NonTerm(ctx.nonterms.add(slice)),
            LogosToken::Sym => {
                let name = slice
                    .chars()
                    .next()
                    .and_then(sym_name)
                    .ok_or_else(|| anyhow!("line {}: unknown symbol {:?}", current.number, slice))?;
                Token::Term(ctx.terms.add(name))
            }
        };
        current.tokens.push(token);
    }
    if !current.tokens.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_and_lines() {
        let mut ctx = LexContext::default();
        let input = "\n\n\nfoo: XYZ -> +& () bar x123 ABC -- hello\n\n-- only a comment\nXYZ ->\n";
        let lines = tokenize_lines(input, &mut ctx).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 4);
        assert_eq!(lines[0].tokens.len(), 10);
        assert_eq!(lines[1].number, 7);
        assert_eq!(lines[1].tokens, vec![Token::NonTerm(0), Token::Arrow]);
        assert_eq!(
            ctx.terms.iter().collect::<Vec<_>>(),
            vec!["plus", "ampersand", "leftParen", "rightParen", "bar", "x123"]
        );
        assert_eq!(ctx.labels.name(0), Some("foo"));
    }

    #[test]
    fn punctuation_and_underscores() {
        let mut ctx = LexContext::default();
        let lines = tokenize_lines("S -> { ; } _Bool_x", &mut ctx).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            ctx.terms.iter().collect::<Vec<_>>(),
            vec!["leftBrace", "semicolon", "rightBrace", "_Bool_x"]
        );
    }

    #[test]
    fn lexical_error_names_line() {
        let mut ctx = LexContext::default();
        let err = tokenize_lines("S -> a\nS -> 1\n", &mut ctx).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }
}
