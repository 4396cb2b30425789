//! Integer and floating constants.
//!
//! The automaton accepts decimal, octal and hex integers with `u`/`l`
//! suffixes, and decimal and hex floats with `f`/`l` suffixes. Whether an
//! accepted lexeme is an integer or a float follows from the state it ended
//! in; the value and its representation are computed afterwards from the
//! text.

use crate::error::{ErrorKind, LexError};
use crate::token::{FloatRepr, IntRepr, LiteralValue, Token, TokenKind};
use btlr::{Automaton, Recognizer, Span};

/// States of the number automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,
    /// `0`
    Zero,
    /// `0` followed by digits; octal unless it turns into a float
    Octal,
    Decimal,
    /// `0x`
    HexPrefix,
    Hex,
    /// `0x.`
    HexDot,
    /// hex digits with a `.`; needs an exponent
    HexFraction,
    HexExpStart,
    HexExpSign,
    HexExp,
    /// `.` with no digits yet
    LeadingDot,
    Fraction,
    ExpStart,
    ExpSign,
    Exp,
    IntSuffix,
    FloatSuffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    Zero,
    Digit,
    HexDigit,
    X,
    Dot,
    E,
    P,
    Sign,
    U,
    L,
    F,
}

/// Integer and floating constants, value included.
pub struct NumberRecognizer(Automaton<State, Cond>);

impl NumberRecognizer {
    pub fn new() -> Self {
        use State::*;
        let ints = [Zero, Octal, Decimal, Hex];
        Self(
            Automaton::builder("number", Start)
                .condition(Cond::Zero, |b| b == b'0')
                .condition(Cond::Digit, |b| b.is_ascii_digit())
                .condition(Cond::HexDigit, |b| b.is_ascii_hexdigit())
                .condition(Cond::X, |b| b == b'x' || b == b'X')
                .condition(Cond::Dot, |b| b == b'.')
                .condition(Cond::E, |b| b == b'e' || b == b'E')
                .condition(Cond::P, |b| b == b'p' || b == b'P')
                .condition(Cond::Sign, |b| b == b'+' || b == b'-')
                .condition(Cond::U, |b| b == b'u' || b == b'U')
                .condition(Cond::L, |b| b == b'l' || b == b'L')
                .condition(Cond::F, |b| b == b'f' || b == b'F')
                .edge(Start, Cond::Zero, Zero)
                .edge(Start, Cond::Digit, Decimal)
                .edge(Start, Cond::Dot, LeadingDot)
                .edge(Zero, Cond::Digit, Octal)
                .edge(Zero, Cond::X, HexPrefix)
                .edge(Octal, Cond::Digit, Octal)
                .edge(Decimal, Cond::Digit, Decimal)
                .edges(&[Zero, Octal, Decimal], Cond::Dot, Fraction)
                .edges(&[Zero, Octal, Decimal], Cond::E, ExpStart)
                .edge(LeadingDot, Cond::Digit, Fraction)
                .edge(Fraction, Cond::Digit, Fraction)
                .edge(Fraction, Cond::E, ExpStart)
                .edge(ExpStart, Cond::Sign, ExpSign)
                .edges(&[ExpStart, ExpSign, Exp], Cond::Digit, Exp)
                .edge(HexPrefix, Cond::HexDigit, Hex)
                .edge(HexPrefix, Cond::Dot, HexDot)
                .edge(Hex, Cond::HexDigit, Hex)
                .edge(Hex, Cond::Dot, HexFraction)
                .edges(&[HexDot, HexFraction], Cond::HexDigit, HexFraction)
                .edges(&[Hex, HexFraction], Cond::P, HexExpStart)
                .edge(HexExpStart, Cond::Sign, HexExpSign)
                .edges(&[HexExpStart, HexExpSign, HexExp], Cond::Digit, HexExp)
                .edges(&ints, Cond::U, IntSuffix)
                .edges(&ints, Cond::L, IntSuffix)
                .edge(IntSuffix, Cond::U, IntSuffix)
                .edge(IntSuffix, Cond::L, IntSuffix)
                .edges(&[Fraction, Exp, HexExp], Cond::F, FloatSuffix)
                .edges(&[Fraction, Exp, HexExp], Cond::L, FloatSuffix)
                .accept(Zero)
                .accept(Octal)
                .accept(Decimal)
                .accept(Hex)
                .accept(IntSuffix)
                .accept(Fraction)
                .accept(Exp)
                .accept(HexExp)
                .accept(FloatSuffix)
                .build(),
        )
    }
}

impl Default for NumberRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for NumberRecognizer {
    type State = State;
    type Cond = Cond;
    type Output = Token;
    type Error = LexError;

    fn automaton(&self) -> &Automaton<State, Cond> {
        &self.0
    }

    fn build(&self, lexeme: &[u8], span: Span, state: State) -> Result<Token, LexError> {
        let text: std::string::String = lexeme.iter().map(|&b| b as char).collect();
        let bad = || LexError::new(ErrorKind::UnidentifiedToken, span);
        match state {
            State::Zero | State::Octal | State::Decimal | State::Hex | State::IntSuffix => {
                let value = integer_value(&text).ok_or_else(bad)?;
                Ok(Token::new(TokenKind::IntegerConstant, &text, span).with_value(value))
            }
            _ => {
                let value = float_value(&text).ok_or_else(bad)?;
                Ok(Token::new(TokenKind::FloatingConstant, &text, span).with_value(value))
            }
        }
    }
}

fn integer_value(text: &str) -> Option<LiteralValue> {
    let digits_end = text.trim_end_matches(['u', 'U', 'l', 'L']).len();
    let (digits, suffix) = text.split_at(digits_end);
    let repr = int_repr(suffix)?;
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<u64>().ok()?
    };
    (value <= repr.max()).then_some(LiteralValue::Int { value, repr })
}

fn int_repr(suffix: &str) -> Option<IntRepr> {
    Some(match suffix {
        "" => IntRepr::I32,
        "u" | "U" => IntRepr::U32,
        "l" | "L" | "ll" | "LL" => IntRepr::I64,
        _ => {
            // a single `u` on either side of the long part
            let long = suffix
                .strip_prefix(['u', 'U'])
                .or_else(|| suffix.strip_suffix(['u', 'U']))?;
            match long {
                "l" | "L" | "ll" | "LL" => IntRepr::U64,
                _ => return None,
            }
        }
    })
}

fn float_value(text: &str) -> Option<LiteralValue> {
    let (body, repr) = match text.as_bytes().last() {
        // hex floats end in exponent digits, so a trailing `f` is a suffix
        Some(b'f' | b'F') => (&text[..text.len() - 1], FloatRepr::F32),
        Some(b'l' | b'L') => (&text[..text.len() - 1], FloatRepr::F64),
        _ => (text, FloatRepr::F64),
    };
    let value = if is_hex(body) {
        hex_float(&body[2..])?
    } else {
        body.parse::<f64>().ok()?
    };
    let value = match repr {
        FloatRepr::F32 => f64::from(value as f32),
        FloatRepr::F64 => value,
    };
    value.is_finite().then_some(LiteralValue::Float { value, repr })
}

fn is_hex(text: &str) -> bool {
    text.starts_with("0x") || text.starts_with("0X")
}

/// Value of `h.hp±d` without the `0x` prefix.
fn hex_float(text: &str) -> Option<f64> {
    let (mantissa, exponent) = text.split_once(['p', 'P'])?;
    let exponent: i32 = exponent.parse().ok()?;
    let mut value = 0f64;
    let mut fraction_digits = 0i32;
    let mut seen_dot = false;
    for c in mantissa.chars() {
        if c == '.' {
            seen_dot = true;
            continue;
        }
        value = value * 16.0 + f64::from(c.to_digit(16)?);
        if seen_dot {
            fraction_digits += 1;
        }
    }
    Some(value * 2f64.powi(exponent.checked_sub(fraction_digits.checked_mul(4)?)?))
}
