//! Escape sequences in character constants and string literals.

use crate::error::{ErrorKind, LexError};
use btlr::Span;

/// Decode the body of a quoted literal (the bytes between the quotes).
///
/// Simple escapes map to their byte; `\ooo` takes one to three octal digits
/// and `\x` any number of hex digits. Either fails with
/// [`ErrorKind::EscapeOutOfRange`] above 255. An unknown escape letter, or
/// `\x` without digits, is [`ErrorKind::UnidentifiedToken`].
pub fn decode(body: &[u8], span: Span) -> Result<Vec<u8>, LexError> {
    let mut out = Vec::with_capacity(body.len());
    let mut i = 0;
    while i < body.len() {
        let b = body[i];
        i += 1;
        if b != b'\\' {
            out.push(b);
            continue;
        }
        let Some(&e) = body.get(i) else {
            return Err(LexError::new(ErrorKind::UnidentifiedToken, span));
        };
        i += 1;
        let byte = match e {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0c,
            b'v' => 0x0b,
            b'\\' | b'\'' | b'"' | b'?' => e,
            b'0'..=b'7' => {
                let mut value = u32::from(e - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match body.get(i) {
                        Some(&d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            i += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                in_range(value, span)?
            }
            b'x' => {
                let start = i;
                let mut value: u32 = 0;
                while let Some(d) = body.get(i).and_then(|&d| (d as char).to_digit(16)) {
                    value = value.saturating_mul(16).saturating_add(d);
                    i += 1;
                }
                if i == start {
                    return Err(LexError::new(ErrorKind::UnidentifiedToken, span));
                }
                in_range(value, span)?
            }
            _ => return Err(LexError::new(ErrorKind::UnidentifiedToken, span)),
        };
        out.push(byte);
    }
    Ok(out)
}

fn in_range(value: u32, span: Span) -> Result<u8, LexError> {
    u8::try_from(value).map_err(|_| LexError::new(ErrorKind::EscapeOutOfRange, span))
}

/// Spell `bytes` as literal body text that [`decode`] turns back into
/// `bytes`. Printable ASCII stays as is, the usual control characters use
/// their letter escapes and everything else a three-digit octal escape.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\t' => out.push_str("\\t"),
            b'\r' => out.push_str("\\r"),
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            b'"' => out.push_str("\\\""),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out
}
