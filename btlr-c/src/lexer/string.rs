//! String literals.

use super::escape;
use crate::error::LexError;
use crate::token::{LiteralValue, Token, TokenKind};
use btlr::{Automaton, Condition, Recognizer, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    Body,
    Escape,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    Quote,
    Backslash,
    Newline,
    Any,
}

/// `"..."` on a single line. The body is decoded with [`escape::decode`].
pub struct StringRecognizer(Automaton<State, Cond>);

impl StringRecognizer {
    pub fn new() -> Self {
        Self(quoted("string", is_double_quote))
    }
}

pub(super) fn is_double_quote(b: u8) -> bool {
    b == b'"'
}

pub(super) fn is_single_quote(b: u8) -> bool {
    b == b'\''
}

/// Automaton for a literal delimited by the bytes `is_quote` accepts; shared
/// with character constants.
pub(super) fn quoted(name: &'static str, is_quote: Condition) -> Automaton<State, Cond> {
    Automaton::builder(name, State::Start)
        .condition(Cond::Quote, is_quote)
        .condition(Cond::Backslash, |b| b == b'\\')
        .condition(Cond::Newline, |b| b == b'\n')
        .condition(Cond::Any, |_| true)
        .edge(State::Start, Cond::Quote, State::Body)
        .edge(State::Body, Cond::Quote, State::Closed)
        .edge(State::Body, Cond::Backslash, State::Escape)
        .edge(State::Body, Cond::Any, State::Body)
        .edge(State::Escape, Cond::Quote, State::Body)
        .edge(State::Escape, Cond::Backslash, State::Body)
        .edge(State::Escape, Cond::Any, State::Body)
        .forbid(State::Body, Cond::Newline)
        .forbid(State::Escape, Cond::Newline)
        .accept(State::Closed)
        .build()
}

impl Default for StringRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for StringRecognizer {
    type State = State;
    type Cond = Cond;
    type Output = Token;
    type Error = LexError;

    fn automaton(&self) -> &Automaton<State, Cond> {
        &self.0
    }

    fn build(&self, lexeme: &[u8], span: Span, _state: State) -> Result<Token, LexError> {
        let bytes = escape::decode(&lexeme[1..lexeme.len() - 1], span)?;
        let text = std::string::String::from_utf8_lossy(lexeme);
        Ok(Token::new(TokenKind::StringLiteral, &text, span).with_value(LiteralValue::Bytes(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use btlr::{Cursor, span};

    fn scan(src: &str) -> Result<Token, LexError> {
        StringRecognizer::new().scan(&mut Cursor::new(src.as_bytes()))
    }

    #[test]
    fn decodes_escapes() {
        let t = scan(r#""a\"b\n" rest"#).unwrap();
        assert_eq!(t.text.as_str(), r#""a\"b\n""#);
        assert_eq!(t.value, Some(LiteralValue::Bytes(b"a\"b\n".to_vec())));
        assert_eq!(t.span, span!(1, 1, 1, 9));
    }

    #[test]
    fn only_the_double_quote_closes() {
        let t = scan(r#""it's" x"#).unwrap();
        assert_eq!(t.value, Some(LiteralValue::Bytes(b"it's".to_vec())));
        assert!(is_single_quote(b'\'') && !is_single_quote(b'"'));
        assert!(is_double_quote(b'"') && !is_double_quote(b'\''));
    }

    #[test]
    fn empty_string() {
        assert_eq!(scan(r#""""#).unwrap().value, Some(LiteralValue::Bytes(vec![])));
    }

    #[test]
    fn newline_inside_is_invalid() {
        let e = scan("\"ab\ncd\"").unwrap_err();
        assert_eq!(e.kind, ErrorKind::InvalidCharacter);
        assert_eq!(e.span.start, btlr::Position::new(1, 1));
    }

    #[test]
    fn unterminated_is_unidentified() {
        assert_eq!(scan("\"abc").unwrap_err().kind, ErrorKind::UnidentifiedToken);
    }

    #[test]
    fn escape_out_of_range() {
        assert_eq!(scan(r#""\777""#).unwrap_err().kind, ErrorKind::EscapeOutOfRange);
    }
}
