//! Character constants.

use super::escape;
use super::string::{Cond, State, is_single_quote, quoted};
use crate::error::{ErrorKind, LexError};
use crate::token::{LiteralValue, Token, TokenKind};
use btlr::{Automaton, Recognizer, Span};

/// `'c'` or `'\e'`: exactly one byte after decoding. Multi-character
/// constants are not accepted.
pub struct CharRecognizer(Automaton<State, Cond>);

impl CharRecognizer {
    pub fn new() -> Self {
        Self(quoted("char", is_single_quote))
    }
}

impl Default for CharRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for CharRecognizer {
    type State = State;
    type Cond = Cond;
    type Output = Token;
    type Error = LexError;

    fn automaton(&self) -> &Automaton<State, Cond> {
        &self.0
    }

    fn build(&self, lexeme: &[u8], span: Span, _state: State) -> Result<Token, LexError> {
        let bytes = escape::decode(&lexeme[1..lexeme.len() - 1], span)?;
        let &[byte] = bytes.as_slice() else {
            return Err(LexError::new(ErrorKind::UnidentifiedToken, span));
        };
        let text = std::string::String::from_utf8_lossy(lexeme);
        Ok(Token::new(TokenKind::CharacterConstant, &text, span).with_value(LiteralValue::Char(byte)))
    }
}
