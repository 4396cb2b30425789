//! Production parser over one line of grammar tokens.

use super::lexer::Token;
use btlr::Symbol;
use chumsky::prelude::*;

/// A production as written, before augmentation and labelling.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProduction {
    pub label: Option<usize>,
    pub lhs: usize,
    pub rhs: Vec<Symbol>,
}

/// `[label:] Lhs -> sym*`
pub fn parser<'a>() -> impl Parser<'a, &'a [Token], RawProduction> {
    let symbol = select! {
        Token::Term(t) => Symbol::Term(t),
        Token::NonTerm(n) => Symbol::NonTerm(n),
    }
    .labelled("symbol");

    let label = select! { Token::Label(l) => l }.labelled("label");
    let lhs = select! { Token::NonTerm(n) => n }.labelled("left");
    let arrow = select! { Token::Arrow => () }.labelled("arrow");

    label
        .or_not()
        .then(lhs)
        .then_ignore(arrow)
        .then(symbol.repeated().collect::<Vec<_>>())
        .then_ignore(end())
        .map(|((label, lhs), rhs)| RawProduction { label, lhs, rhs })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_production() {
        let tokens = vec![
            Token::Label(0),
            Token::NonTerm(1),
            Token::Arrow,
            Token::Term(2),
            Token::NonTerm(3),
        ];
        let p = parser().parse(&tokens).into_result().unwrap();
        assert_eq!(p.label, Some(0));
        assert_eq!(p.lhs, 1);
        assert_eq!(p.rhs, vec![Symbol::Term(2), Symbol::NonTerm(3)]);
    }

    #[test]
    fn empty_rhs_without_label() {
        let tokens = vec![Token::NonTerm(4), Token::Arrow];
        let p = parser().parse(&tokens).into_result().unwrap();
        assert_eq!(p.label, None);
        assert!(p.rhs.is_empty());
    }

    #[test]
    fn malformed_lines() {
        let missing_arrow = vec![Token::NonTerm(0), Token::Term(1)];
        assert!(parser().parse(&missing_arrow).into_result().is_err());
        let terminal_lhs = vec![Token::Term(0), Token::Arrow];
        assert!(parser().parse(&terminal_lhs).into_result().is_err());
        let two_arrows = vec![Token::NonTerm(0), Token::Arrow, Token::Arrow];
        assert!(parser().parse(&two_arrows).into_result().is_err());
    }
}
