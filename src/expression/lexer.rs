use crate::expression::error::InvalidExpression;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),

    LParen,
    RParen,
    Comma,
    Dot,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,

    /// Any character outside the grammar. Kept as a token so that the pre-check can report
    /// keywords and private names ahead of stray punctuation.
    Stray(char),

    Eof,
}

/// Whether the `.` at `dot` belongs to the digits before it: `1.5`, `1.`, `1.e3`, but not
/// `1.max`.
fn dot_continues_number(bytes: &[u8], dot: usize) -> bool {
    let at = |k: usize| bytes.get(k).map(|&b| b as char);
    match at(dot + 1) {
        None => true,
        Some(c) if c.is_ascii_digit() => true,
        Some('e' | 'E') => match at(dot + 2) {
            Some('+' | '-') => at(dot + 3).is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        },
        Some(c) => !(c.is_ascii_alphabetic() || c == '_'),
    }
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, InvalidExpression> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        // Number: [0-9]+(.[0-9]*)?([eE][+-]?[0-9]+)? or .[0-9]+([eE][+-]?[0-9]+)?
        if c.is_ascii_digit()
            || (c == '.' && i + 1 < bytes.len() && (bytes[i + 1] as char).is_ascii_digit())
        {
            if c == '.' {
                i += 1;
            } else {
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                if i < bytes.len() && (bytes[i] as char) == '.' && dot_continues_number(bytes, i)
                {
                    i += 1;
                }
            }

            while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }

            if i < bytes.len() && matches!(bytes[i] as char, 'e' | 'E') {
                let e_pos = i;
                i += 1;
                if i < bytes.len() && matches!(bytes[i] as char, '+' | '-') {
                    i += 1;
                }
                let exp_start = i;
                while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                    i += 1;
                }
                if exp_start == i {
                    return Err(InvalidExpression::syntax(
                        e_pos,
                        "invalid number exponent (expected digits)",
                    ));
                }
            }

            let s = &input[start..i];
            let v: f64 = s
                .parse()
                .map_err(|_| InvalidExpression::syntax(start, "invalid number"))?;
            if !v.is_finite() {
                return Err(InvalidExpression::syntax(start, "number literal out of range"));
            }
            out.push(Token {
                kind: TokenKind::Number(v),
                span: Span { start, end: i },
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            i += 1;
            while i < bytes.len() {
                let ch = bytes[i] as char;
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    i += 1;
                } else {
                    break;
                }
            }
            out.push(Token {
                kind: TokenKind::Ident(input[start..i].to_owned()),
                span: Span { start, end: i },
            });
            continue;
        }

        if input[i..].starts_with("**") {
            i += 2;
            out.push(Token {
                kind: TokenKind::StarStar,
                span: Span { start, end: i },
            });
            continue;
        }

        // Non-ASCII input is never part of the grammar; step over the whole char.
        let ch = input[i..].chars().next().unwrap_or(c);
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            other => TokenKind::Stray(other),
        };
        i += ch.len_utf8();
        out.push(Token {
            kind,
            span: Span { start, end: i },
        });
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
    });

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/expression/lexer.rs"]
mod tests;
