//! The C lexer.
//!
//! [`Lexer`] skips whitespace and comments, looks at the first byte of the
//! next lexeme and hands the cursor to one of five recognizers: identifiers
//! and keywords, numbers, string literals, character constants and
//! punctuators. Each recognizer is an automaton built once and shared.
//! The token stream always ends with a single [`TokenKind::End`].

pub mod charlit;
pub mod escape;
pub mod ident;
pub mod number;
pub mod punct;
pub mod string;

use crate::error::{ErrorKind, LexError};
use crate::token::{Token, TokenKind};
use btlr::{Cursor, Recognizer, Span};
use charlit::CharRecognizer;
use ident::IdentRecognizer;
use number::NumberRecognizer;
use once_cell::sync::Lazy;
use punct::PunctRecognizer;
use string::StringRecognizer;

static IDENT: Lazy<IdentRecognizer> = Lazy::new(IdentRecognizer::new);
static NUMBER: Lazy<NumberRecognizer> = Lazy::new(NumberRecognizer::new);
static STRING: Lazy<StringRecognizer> = Lazy::new(StringRecognizer::new);
static CHAR: Lazy<CharRecognizer> = Lazy::new(CharRecognizer::new);
static PUNCT: Lazy<PunctRecognizer> = Lazy::new(PunctRecognizer::new);

/// Token iterator over a source buffer.
///
/// Yields `Err` at most once; iteration stops after the first error or after
/// the end token.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Lexer over `src`, positioned at line 1, column 1.
    pub fn new(src: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(src),
            done: false,
        }
    }

    /// Skip whitespace, `/* */` and `//` comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.cursor.peek(), self.cursor.peek_at(1)) {
                (Some(b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c), _) => {
                    self.cursor.advance();
                }
                (Some(b'/'), Some(b'*')) => {
                    let begin = self.cursor.mark();
                    self.cursor.advance();
                    self.cursor.advance();
                    loop {
                        match (self.cursor.peek(), self.cursor.peek_at(1)) {
                            (Some(b'*'), Some(b'/')) => {
                                self.cursor.advance();
                                self.cursor.advance();
                                break;
                            }
                            (Some(_), _) => {
                                self.cursor.advance();
                            }
                            (None, _) => {
                                return Err(LexError::new(
                                    ErrorKind::UnidentifiedToken,
                                    self.cursor.span_from(begin),
                                ));
                            }
                        }
                    }
                }
                (Some(b'/'), Some(b'/')) => {
                    while !matches!(self.cursor.peek(), None | Some(b'\n')) {
                        self.cursor.advance();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;
        let Some(b) = self.cursor.peek() else {
            return Ok(Token::end(Span::at(self.cursor.position())));
        };
        let token = match b {
            b'"' => STRING.scan(&mut self.cursor)?,
            b'\'' => CHAR.scan(&mut self.cursor)?,
            _ if ident::is_nondigit(b) => IDENT.scan(&mut self.cursor)?,
            b'0'..=b'9' => self.number()?,
            b'.' if self.cursor.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.number()?,
            _ => PUNCT.scan(&mut self.cursor)?,
        };
        Ok(token)
    }

    /// A number may not run straight into an identifier (`12ab`, `0x1g`).
    fn number(&mut self) -> Result<Token, LexError> {
        let begin = self.cursor.mark();
        let token = NUMBER.scan(&mut self.cursor)?;
        if self.cursor.peek().is_some_and(ident::is_ident_char) {
            while self.cursor.peek().is_some_and(ident::is_ident_char) {
                self.cursor.advance();
            }
            return Err(LexError::new(
                ErrorKind::UnidentifiedToken,
                self.cursor.span_from(begin),
            ));
        }
        Ok(token)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.kind == TokenKind::End => self.done = true,
            Ok(token) => log::trace!("token {:?} {} at {}", token.kind, token, token.span),
            Err(e) => {
                log::debug!("lexer stopped: {e}");
                self.done = true;
            }
        }
        Some(result)
    }
}

/// Tokenize `src` completely; the last token is [`TokenKind::End`].
pub fn tokenize(src: &[u8]) -> Result<Vec<Token>, LexError> {
    Lexer::new(src).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::LiteralValue;
    use btlr::span;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src.as_bytes()).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn error(src: &str) -> LexError {
        tokenize(src.as_bytes()).unwrap_err()
    }

    #[test]
    fn dispatches_to_every_recognizer() {
        use TokenKind::*;
        assert_eq!(
            kinds("int x = 'a' + 0x1f * 2.5; s = \"hi\";"),
            [
                Int,
                Identifier,
                Equal,
                CharacterConstant,
                Plus,
                IntegerConstant,
                Asterisk,
                FloatingConstant,
                Semicolon,
                Identifier,
                Equal,
                StringLiteral,
                Semicolon,
                End
            ]
        );
    }

    #[test]
    fn leading_dot_number_versus_member_access() {
        use TokenKind::*;
        assert_eq!(kinds("a.b"), [Identifier, Dot, Identifier, End]);
        assert_eq!(kinds("x=.5"), [Identifier, Equal, FloatingConstant, End]);
        assert_eq!(kinds("f(...)"), [Identifier, LeftParen, Ellipsis, RightParen, End]);
    }

    #[test]
    fn comments_and_positions() {
        let tokens = tokenize(b"/* one\n two */ a // three\n  b").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].span, span!(2, 9, 2, 10));
        assert_eq!(tokens[1].span, span!(3, 3, 3, 4));
        assert_eq!(tokens[2].kind, TokenKind::End);
        assert_eq!(tokens[2].span, span!(3, 4, 3, 4));
    }

    #[test]
    fn empty_input_is_just_end() {
        assert_eq!(kinds(""), [TokenKind::End]);
        assert_eq!(kinds("  \n\t// nothing"), [TokenKind::End]);
    }

    #[test]
    fn literal_values_survive() {
        let tokens = tokenize(br#"'\n' "a\tb" 7u"#).unwrap();
        assert_eq!(tokens[0].value, Some(LiteralValue::Char(b'\n')));
        assert_eq!(tokens[1].value, Some(LiteralValue::Bytes(b"a\tb".to_vec())));
        assert!(matches!(tokens[2].value, Some(LiteralValue::Int { value: 7, .. })));
    }

    #[test]
    fn lexical_errors() {
        let e = error("a = \"abc\ndef\";");
        assert_eq!(e.kind, ErrorKind::InvalidCharacter);
        assert_eq!(e.span.start, btlr::Position::new(1, 5));

        let e = error("x = 12ab;");
        assert_eq!(e.kind, ErrorKind::UnidentifiedToken);
        assert_eq!(e.span, span!(1, 5, 1, 9));

        assert_eq!(error("a @ b").kind, ErrorKind::UnidentifiedToken);
        assert_eq!(error("/* open").kind, ErrorKind::UnidentifiedToken);
        assert_eq!(error("c = '\\777';").kind, ErrorKind::EscapeOutOfRange);
    }

    #[test]
    fn stops_after_first_error() {
        let items: Vec<_> = Lexer::new(b"a @ b").collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }
}
