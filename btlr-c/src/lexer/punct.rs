//! Punctuators.
//!
//! Every accepting state is the punctuator recognized so far, so the
//! automaton reads off the token kind directly. The only non-accepting
//! intermediate state is `..`, which the automaton backs out of when no third
//! `.` follows.

use crate::error::{ErrorKind, LexError};
use crate::token::{Token, TokenKind};
use btlr::{Automaton, Condition, Recognizer, Span};

/// `At(kind)` is the state after reading the punctuator `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    DotDot,
    At(TokenKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Dot,
    Ampersand,
    Asterisk,
    Plus,
    Minus,
    Tilde,
    Exclamation,
    Slash,
    Percent,
    Less,
    Greater,
    Caret,
    Pipe,
    Question,
    Colon,
    Semicolon,
    Equal,
    Comma,
    Hash,
}

/// Conditions with the single-character punctuator each one starts.
const SINGLE: &[(Cond, Condition, TokenKind)] = &[
    (Cond::LeftBracket, |b| b == b'[', TokenKind::LeftBracket),
    (Cond::RightBracket, |b| b == b']', TokenKind::RightBracket),
    (Cond::LeftParen, |b| b == b'(', TokenKind::LeftParen),
    (Cond::RightParen, |b| b == b')', TokenKind::RightParen),
    (Cond::LeftBrace, |b| b == b'{', TokenKind::LeftBrace),
    (Cond::RightBrace, |b| b == b'}', TokenKind::RightBrace),
    (Cond::Dot, |b| b == b'.', TokenKind::Dot),
    (Cond::Ampersand, |b| b == b'&', TokenKind::Ampersand),
    (Cond::Asterisk, |b| b == b'*', TokenKind::Asterisk),
    (Cond::Plus, |b| b == b'+', TokenKind::Plus),
    (Cond::Minus, |b| b == b'-', TokenKind::Minus),
    (Cond::Tilde, |b| b == b'~', TokenKind::Tilde),
    (Cond::Exclamation, |b| b == b'!', TokenKind::Exclamation),
    (Cond::Slash, |b| b == b'/', TokenKind::Slash),
    (Cond::Percent, |b| b == b'%', TokenKind::Percent),
    (Cond::Less, |b| b == b'<', TokenKind::Less),
    (Cond::Greater, |b| b == b'>', TokenKind::Greater),
    (Cond::Caret, |b| b == b'^', TokenKind::Caret),
    (Cond::Pipe, |b| b == b'|', TokenKind::Pipe),
    (Cond::Question, |b| b == b'?', TokenKind::Question),
    (Cond::Colon, |b| b == b':', TokenKind::Colon),
    (Cond::Semicolon, |b| b == b';', TokenKind::Semicolon),
    (Cond::Equal, |b| b == b'=', TokenKind::Equal),
    (Cond::Comma, |b| b == b',', TokenKind::Comma),
    (Cond::Hash, |b| b == b'#', TokenKind::Hash),
];

/// `(from, next character, to)` for the punctuators longer than one byte.
const LONGER: &[(TokenKind, Cond, TokenKind)] = &[
    (TokenKind::Minus, Cond::Greater, TokenKind::Arrow),
    (TokenKind::Minus, Cond::Minus, TokenKind::Decrement),
    (TokenKind::Minus, Cond::Equal, TokenKind::MinusEqual),
    (TokenKind::Plus, Cond::Plus, TokenKind::Increment),
    (TokenKind::Plus, Cond::Equal, TokenKind::PlusEqual),
    (TokenKind::Ampersand, Cond::Ampersand, TokenKind::AndAnd),
    (TokenKind::Ampersand, Cond::Equal, TokenKind::AndEqual),
    (TokenKind::Pipe, Cond::Pipe, TokenKind::OrOr),
    (TokenKind::Pipe, Cond::Equal, TokenKind::PipeEqual),
    (TokenKind::Asterisk, Cond::Equal, TokenKind::StarEqual),
    (TokenKind::Slash, Cond::Equal, TokenKind::SlashEqual),
    (TokenKind::Percent, Cond::Equal, TokenKind::PercentEqual),
    (TokenKind::Caret, Cond::Equal, TokenKind::CaretEqual),
    (TokenKind::Exclamation, Cond::Equal, TokenKind::NotEqual),
    (TokenKind::Equal, Cond::Equal, TokenKind::EqualEqual),
    (TokenKind::Less, Cond::Less, TokenKind::LeftShift),
    (TokenKind::Less, Cond::Equal, TokenKind::LessEqual),
    (TokenKind::LeftShift, Cond::Equal, TokenKind::LeftShiftEqual),
    (TokenKind::Greater, Cond::Greater, TokenKind::RightShift),
    (TokenKind::Greater, Cond::Equal, TokenKind::GreaterEqual),
    (TokenKind::RightShift, Cond::Equal, TokenKind::RightShiftEqual),
    (TokenKind::Hash, Cond::Hash, TokenKind::HashHash),
];

/// All C punctuators by maximal munch.
pub struct PunctRecognizer(Automaton<State, Cond>);

impl PunctRecognizer {
    pub fn new() -> Self {
        let mut builder = Automaton::builder("punctuator", State::Start).backtrack();
        for &(cond, test, kind) in SINGLE {
            builder = builder
                .condition(cond, test)
                .edge(State::Start, cond, State::At(kind))
                .accept(State::At(kind));
        }
        for &(from, cond, to) in LONGER {
            builder = builder
                .edge(State::At(from), cond, State::At(to))
                .accept(State::At(to));
        }
        builder = builder
            .edge(State::At(TokenKind::Dot), Cond::Dot, State::DotDot)
            .edge(State::DotDot, Cond::Dot, State::At(TokenKind::Ellipsis))
            .accept(State::At(TokenKind::Ellipsis));
        Self(builder.build())
    }
}

impl Default for PunctRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for PunctRecognizer {
    type State = State;
    type Cond = Cond;
    type Output = Token;
    type Error = LexError;

    fn automaton(&self) -> &Automaton<State, Cond> {
        &self.0
    }

    fn build(&self, lexeme: &[u8], span: Span, state: State) -> Result<Token, LexError> {
        let text: std::string::String = lexeme.iter().map(|&b| b as char).collect();
        match state {
            State::At(kind) => Ok(Token::new(kind, &text, span)),
            // never accepting
            State::Start | State::DotDot => Err(LexError::new(ErrorKind::UnidentifiedToken, span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btlr::Cursor;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let p = PunctRecognizer::new();
        let mut cursor = Cursor::new(src.as_bytes());
        let mut out = vec![];
        while !cursor.is_eof() {
            out.push(p.scan(&mut cursor).unwrap().kind);
        }
        out
    }

    #[test]
    fn maximal_munch() {
        use TokenKind::*;
        assert_eq!(kinds("<<="), [LeftShiftEqual]);
        assert_eq!(kinds("<<<="), [LeftShift, LessEqual]);
        assert_eq!(kinds("->>"), [Arrow, Greater]);
        assert_eq!(kinds("+++"), [Increment, Plus]);
        assert_eq!(kinds("&&&="), [AndAnd, AndEqual]);
        assert_eq!(kinds("##"), [HashHash]);
        assert_eq!(kinds("...."), [Ellipsis, Dot]);
    }

    #[test]
    fn two_dots_back_out_to_one() {
        use TokenKind::*;
        let p = PunctRecognizer::new();
        let mut cursor = Cursor::new(b"..x");
        let t = p.scan(&mut cursor).unwrap();
        assert_eq!(t.kind, Dot);
        assert_eq!(cursor.offset(), 1);
        assert_eq!(kinds(".."), [Dot, Dot]);
    }

    #[test]
    fn unknown_byte() {
        let e = PunctRecognizer::new().scan(&mut Cursor::new(b"@")).unwrap_err();
        assert_eq!(e.kind, ErrorKind::UnidentifiedToken);
    }
}
