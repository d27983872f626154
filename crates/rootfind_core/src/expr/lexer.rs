//! Tokeniser for formula text.

use crate::types::ParseError;

/// Lexical token kinds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    /// `^` or `**`
    Caret,
    LParen,
    RParen,
}

/// A token together with the byte offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

/// Split `input` into tokens.
///
/// Numeric literals accept integer, decimal and scientific forms
/// (`2`, `2.5`, `.5`, `1e-3`, `6.02E23`).
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == b'.' {
            i = scan_number(bytes, i)?;
            let text = &input[start..i];
            let value: f64 = text
                .parse()
                .map_err(|_| ParseError::at(start, format!("invalid number '{}'", text)))?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                pos: start,
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(input[start..i].to_string()),
                pos: start,
            });
            continue;
        }

        let kind = match c {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 1;
                TokenKind::Caret
            }
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'^' => TokenKind::Caret,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(ParseError::at(start, format!("unexpected character '{}'", ch)));
            }
        };
        i += 1;
        tokens.push(Token { kind, pos: start });
    }

    Ok(tokens)
}

/// Advance over a numeric literal starting at `start`, returning the end offset.
fn scan_number(bytes: &[u8], start: usize) -> Result<usize, ParseError> {
    let mut i = start;
    let mut digits = 0;

    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return Err(ParseError::at(start, "expected digits in number"));
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == exp_start {
            return Err(ParseError::at(i, "malformed exponent in number"));
        }
        i = j;
    }

    Ok(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_arithmetic() {
        assert_eq!(
            kinds("x*x - 2"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Star,
                TokenKind::Ident("x".to_string()),
                TokenKind::Minus,
                TokenKind::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_double_star_is_power() {
        assert_eq!(
            kinds("x**2"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Caret,
                TokenKind::Number(2.0),
            ]
        );
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(kinds("2.5"), vec![TokenKind::Number(2.5)]);
        assert_eq!(kinds(".5"), vec![TokenKind::Number(0.5)]);
        assert_eq!(kinds("1e-3"), vec![TokenKind::Number(1e-3)]);
        assert_eq!(kinds("6.02E23"), vec![TokenKind::Number(6.02e23)]);
        assert_eq!(kinds("3."), vec![TokenKind::Number(3.0)]);
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = tokenize("  sin( x )").unwrap();
        assert_eq!(tokens[0].pos, 2);
        assert_eq!(tokens[1].pos, 5);
        assert_eq!(tokens[2].pos, 7);
        assert_eq!(tokens[3].pos, 9);
    }

    #[test]
    fn test_malformed_exponent() {
        let err = tokenize("1e+").unwrap_err();
        assert_eq!(err.position, Some(1));
    }

    #[test]
    fn test_lone_dot_rejected() {
        assert!(tokenize(".").is_err());
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("x # 2").unwrap_err();
        assert_eq!(err.position, Some(2));
        assert!(err.message.contains('#'));
    }
}
