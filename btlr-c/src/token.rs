//! Lexical tokens of C.
//!
//! [`TokenKind`] enumerates every token category the lexer produces. The
//! discriminants are stable (`u16`, see [`num_enum`]) so kinds can be stored
//! compactly and mapped back, and every kind knows the terminal name it has
//! in the grammar ([`TokenKind::terminal_name`]).

use btlr::Span;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use smartstring::alias::String;
use std::fmt;

/// Kinds of C tokens: literals, then keywords, then punctuators. The ranges
/// of [`TokenKind::is_keyword`] and [`TokenKind::is_punctuator`] rely on
/// that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum TokenKind {
    End,
    Identifier,
    IntegerConstant,
    FloatingConstant,
    CharacterConstant,
    StringLiteral,

    Auto,
    Bool,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Restrict,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,

    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Dot,
    Arrow,
    Increment,
    Decrement,
    Ampersand,
    Asterisk,
    Plus,
    Minus,
    Tilde,
    Exclamation,
    Slash,
    Percent,
    LeftShift,
    RightShift,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    EqualEqual,
    NotEqual,
    Caret,
    Pipe,
    AndAnd,
    OrOr,
    Question,
    Colon,
    Semicolon,
    Ellipsis,
    Equal,
    StarEqual,
    SlashEqual,
    PercentEqual,
    PlusEqual,
    MinusEqual,
    LeftShiftEqual,
    RightShiftEqual,
    AndEqual,
    CaretEqual,
    PipeEqual,
    Comma,
    Hash,
    HashHash,
}

/// Reserved words and their kinds.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("_Bool", TokenKind::Bool),
    ("auto", TokenKind::Auto),
    ("break", TokenKind::Break),
    ("case", TokenKind::Case),
    ("char", TokenKind::Char),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("default", TokenKind::Default),
    ("do", TokenKind::Do),
    ("double", TokenKind::Double),
    ("else", TokenKind::Else),
    ("enum", TokenKind::Enum),
    ("extern", TokenKind::Extern),
    ("float", TokenKind::Float),
    ("for", TokenKind::For),
    ("goto", TokenKind::Goto),
    ("if", TokenKind::If),
    ("inline", TokenKind::Inline),
    ("int", TokenKind::Int),
    ("long", TokenKind::Long),
    ("register", TokenKind::Register),
    ("restrict", TokenKind::Restrict),
    ("return", TokenKind::Return),
    ("short", TokenKind::Short),
    ("signed", TokenKind::Signed),
    ("sizeof", TokenKind::Sizeof),
    ("static", TokenKind::Static),
    ("struct", TokenKind::Struct),
    ("switch", TokenKind::Switch),
    ("typedef", TokenKind::Typedef),
    ("union", TokenKind::Union),
    ("unsigned", TokenKind::Unsigned),
    ("void", TokenKind::Void),
    ("volatile", TokenKind::Volatile),
    ("while", TokenKind::While),
];

impl TokenKind {
    /// Keyword kind of `word`, if it is reserved.
    pub fn keyword(word: &[u8]) -> Option<TokenKind> {
        KEYWORDS
            .binary_search_by(|(k, _)| k.as_bytes().cmp(word))
            .ok()
            .map(|i| KEYWORDS[i].1)
    }

    /// `auto` through `while`, `_Bool` included.
    pub fn is_keyword(self) -> bool {
        (TokenKind::Auto..=TokenKind::While).contains(&self)
    }

    /// Operators and punctuation, `#` and `##` included.
    pub fn is_punctuator(self) -> bool {
        self >= TokenKind::LeftBracket
    }

    /// Name of the terminal this kind stands for in the C grammar.
    pub fn terminal_name(self) -> &'static str {
        use TokenKind::*;
        match self {
            End => "end",
            Identifier => "identifier",
            IntegerConstant => "integerConstant",
            FloatingConstant => "floatingConstant",
            CharacterConstant => "characterConstant",
            StringLiteral => "stringLiteral",
            Auto => "auto",
            Bool => "_Bool",
            Break => "break",
            Case => "case",
            Char => "char",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Do => "do",
            Double => "double",
            Else => "else",
            Enum => "enum",
            Extern => "extern",
            Float => "float",
            For => "for",
            Goto => "goto",
            If => "if",
            Inline => "inline",
            Int => "int",
            Long => "long",
            Register => "register",
            Restrict => "restrict",
            Return => "return",
            Short => "short",
            Signed => "signed",
            Sizeof => "sizeof",
            Static => "static",
            Struct => "struct",
            Switch => "switch",
            Typedef => "typedef",
            Union => "union",
            Unsigned => "unsigned",
            Void => "void",
            Volatile => "volatile",
            While => "while",
            LeftBracket => "leftBrack",
            RightBracket => "rightBrack",
            LeftParen => "leftParen",
            RightParen => "rightParen",
            LeftBrace => "leftBrace",
            RightBrace => "rightBrace",
            Dot => "dot",
            Arrow => "arrow",
            Increment => "increment",
            Decrement => "decrement",
            Ampersand => "ampersand",
            Asterisk => "asterisk",
            Plus => "plus",
            Minus => "minus",
            Tilde => "tilde",
            Exclamation => "exclamation",
            Slash => "slash",
            Percent => "percent",
            LeftShift => "leftShift",
            RightShift => "rightShift",
            Less => "lessThan",
            Greater => "greaterThan",
            LessEqual => "lessEqual",
            GreaterEqual => "greaterEqual",
            EqualEqual => "equalEqual",
            NotEqual => "notEqual",
            Caret => "caret",
            Pipe => "pipe",
            AndAnd => "andAnd",
            OrOr => "orOr",
            Question => "question",
            Colon => "colon",
            Semicolon => "semicolon",
            Ellipsis => "ellipsis",
            Equal => "equals",
            StarEqual => "mulAssign",
            SlashEqual => "divAssign",
            PercentEqual => "modAssign",
            PlusEqual => "addAssign",
            MinusEqual => "subAssign",
            LeftShiftEqual => "leftShiftAssign",
            RightShiftEqual => "rightShiftAssign",
            AndEqual => "andAssign",
            CaretEqual => "xorAssign",
            PipeEqual => "orAssign",
            Comma => "comma",
            Hash => "hash",
            HashHash => "hashHash",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.terminal_name())
    }
}

/// Storage an integer constant gets from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntRepr {
    /// no suffix
    I32,
    /// `u`
    U32,
    /// `l` or `ll`
    I64,
    /// `ul`, `ull` and permutations
    U64,
}

impl IntRepr {
    /// Largest value of the type.
    pub fn max(self) -> u64 {
        match self {
            IntRepr::I32 => i32::MAX as u64,
            IntRepr::U32 => u32::MAX as u64,
            IntRepr::I64 => i64::MAX as u64,
            IntRepr::U64 => u64::MAX,
        }
    }
}

/// Type of a floating constant: `f` suffix or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatRepr {
    /// `f` suffix
    F32,
    /// no suffix, or `l`
    F64,
}

/// Decoded value of a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int { value: u64, repr: IntRepr },
    Float { value: f64, repr: FloatRepr },
    /// A character constant, decoded to its single byte.
    Char(u8),
    /// A string literal, decoded, without the terminating NUL.
    Bytes(Vec<u8>),
}

/// A token with its source text and range.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text; empty for [`TokenKind::End`].
    pub text: String,
    /// Decoded value of a literal.
    pub value: Option<LiteralValue>,
    pub span: Span,
}

impl Token {
    /// Token without a value.
    pub fn new(kind: TokenKind, text: &str, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            value: None,
            span,
        }
    }

    /// Attach the decoded literal value.
    pub fn with_value(mut self, value: LiteralValue) -> Self {
        self.value = Some(value);
        self
    }

    /// End-of-input marker placed at `span`.
    pub fn end(span: Span) -> Self {
        Self::new(TokenKind::End, "", span)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => f.write_str("end of input"),
            _ => write!(f, "`{}`", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_sorted() {
        assert!(KEYWORDS.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(KEYWORDS.len(), 35);
        for (word, kind) in KEYWORDS {
            assert_eq!(TokenKind::keyword(word.as_bytes()), Some(*kind));
            assert!(kind.is_keyword());
        }
        assert_eq!(TokenKind::keyword(b"main"), None);
        assert_eq!(TokenKind::keyword(b"Int"), None);
    }

    #[test]
    fn kinds_convert_to_and_from_u16() {
        let raw: u16 = TokenKind::Semicolon.into();
        assert_eq!(TokenKind::try_from(raw).unwrap(), TokenKind::Semicolon);
        let last: u16 = TokenKind::HashHash.into();
        assert!(TokenKind::try_from(last + 1).is_err());
    }

    #[test]
    fn categories() {
        assert!(TokenKind::LeftShiftEqual.is_punctuator());
        assert!(!TokenKind::While.is_punctuator());
        assert!(!TokenKind::Identifier.is_keyword());
        assert_eq!(TokenKind::Less.terminal_name(), "lessThan");
        assert_eq!(TokenKind::Bool.to_string(), "_Bool");
    }
}
