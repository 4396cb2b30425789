//! Identifiers and keywords.

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use btlr::{Automaton, Recognizer, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    Word,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    Nondigit,
    Digit,
}

/// `[A-Za-z_]`
pub fn is_nondigit(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// `[A-Za-z0-9_]`
pub fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `[A-Za-z_][A-Za-z0-9_]*`; reserved words become keyword tokens.
pub struct IdentRecognizer(Automaton<State, Cond>);

impl IdentRecognizer {
    pub fn new() -> Self {
        Self(
            Automaton::builder("identifier", State::Start)
                .condition(Cond::Nondigit, is_nondigit)
                .condition(Cond::Digit, |b| b.is_ascii_digit())
                .edge(State::Start, Cond::Nondigit, State::Word)
                .edge(State::Word, Cond::Nondigit, State::Word)
                .edge(State::Word, Cond::Digit, State::Word)
                .accept(State::Word)
                .build(),
        )
    }
}

impl Default for IdentRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for IdentRecognizer {
    type State = State;
    type Cond = Cond;
    type Output = Token;
    type Error = LexError;

    fn automaton(&self) -> &Automaton<State, Cond> {
        &self.0
    }

    fn build(&self, lexeme: &[u8], span: Span, _state: State) -> Result<Token, LexError> {
        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier);
        // the automaton only accepts ASCII
        let text: std::string::String = lexeme.iter().map(|&b| b as char).collect();
        Ok(Token::new(kind, &text, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btlr::{Cursor, span};

    fn scan(src: &str) -> Token {
        IdentRecognizer::new().scan(&mut Cursor::new(src.as_bytes())).unwrap()
    }

    #[test]
    fn identifiers_stop_at_non_word_bytes() {
        let t = scan("foo_1+x");
        assert_eq!(t.kind, TokenKind::Identifier);
        assert_eq!(t.text.as_str(), "foo_1");
        assert_eq!(t.span, span!(1, 1, 1, 6));
    }

    #[test]
    fn keywords_are_recognized_whole() {
        assert_eq!(scan("while(").kind, TokenKind::While);
        assert_eq!(scan("whilex").kind, TokenKind::Identifier);
        assert_eq!(scan("_Bool").kind, TokenKind::Bool);
        assert_eq!(scan("typedef ").kind, TokenKind::Typedef);
    }
}
