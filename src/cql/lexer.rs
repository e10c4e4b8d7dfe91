//! Tokenizer for CQL predicates

use crate::errors::CqlError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Bare or double-quoted attribute name
    Ident(String),
    /// Single-quoted string literal, escapes resolved
    Str(String),
    Number(f64),
    /// Comparison operator as written (`=`, `<>`, `!=`, `<`, `<=`, `>`, `>=`)
    Op(&'static str),
    And,
    Or,
    Not,
    Between,
    Like,
    LParen,
    RParen,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "{}", name),
            TokenKind::Str(text) => write!(f, "'{}'", text),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Op(op) => write!(f, "{}", op),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Not => write!(f, "NOT"),
            TokenKind::Between => write!(f, "BETWEEN"),
            TokenKind::Like => write!(f, "LIKE"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, CqlError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|(_, c)| *c);

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let kind = match c {
            '(' => {
                i += 1;
                TokenKind::LParen
            }
            ')' => {
                i += 1;
                TokenKind::RParen
            }
            '=' => {
                i += 1;
                TokenKind::Op("=")
            }
            '<' => match next {
                Some('=') => {
                    i += 2;
                    TokenKind::Op("<=")
                }
                Some('>') => {
                    i += 2;
                    TokenKind::Op("<>")
                }
                _ => {
                    i += 1;
                    TokenKind::Op("<")
                }
            },
            '>' => {
                if next == Some('=') {
                    i += 2;
                    TokenKind::Op(">=")
                } else {
                    i += 1;
                    TokenKind::Op(">")
                }
            }
            '!' if next == Some('=') => {
                i += 2;
                TokenKind::Op("!=")
            }
            '\'' => {
                let (text, consumed) = read_string(&chars[i..], offset)?;
                i += consumed;
                TokenKind::Str(text)
            }
            '"' => {
                let (name, consumed) = read_quoted_ident(&chars[i..], offset)?;
                i += consumed;
                TokenKind::Ident(name)
            }
            c if c.is_ascii_digit()
                || (c == '-' && next.map_or(false, |n| n.is_ascii_digit() || n == '.'))
                || (c == '.' && next.map_or(false, |n| n.is_ascii_digit())) =>
            {
                let (number, consumed) = read_number(&chars[i..], offset)?;
                i += consumed;
                TokenKind::Number(number)
            }
            c if is_ident_start(c) => {
                let start = i;
                while i < chars.len() && is_ident_part(chars[i].1) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().map(|(_, c)| *c).collect();
                keyword(&word).unwrap_or(TokenKind::Ident(word))
            }
            other => {
                return Err(CqlError::UnexpectedChar {
                    found: other,
                    offset,
                })
            }
        };

        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':' || c == '.'
}

fn keyword(word: &str) -> Option<TokenKind> {
    match word.to_ascii_uppercase().as_str() {
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "NOT" => Some(TokenKind::Not),
        "BETWEEN" => Some(TokenKind::Between),
        "LIKE" => Some(TokenKind::Like),
        _ => None,
    }
}

/// Reads `'...'`; `\'` and `''` both stand for a single quote, `\\` for a
/// backslash
fn read_string(chars: &[(usize, char)], offset: usize) -> Result<(String, usize), CqlError> {
    let mut text = String::new();
    let mut i = 1;
    while i < chars.len() {
        let c = chars[i].1;
        let next = chars.get(i + 1).map(|(_, c)| *c);
        match (c, next) {
            ('\\', Some('\'')) | ('\'', Some('\'')) => {
                text.push('\'');
                i += 2;
            }
            ('\\', Some('\\')) => {
                text.push('\\');
                i += 2;
            }
            ('\'', _) => return Ok((text, i + 1)),
            _ => {
                text.push(c);
                i += 1;
            }
        }
    }
    Err(CqlError::Unterminated {
        kind: "string",
        offset,
    })
}

/// Reads `"..."`; `""` stands for a double quote
fn read_quoted_ident(chars: &[(usize, char)], offset: usize) -> Result<(String, usize), CqlError> {
    let mut name = String::new();
    let mut i = 1;
    while i < chars.len() {
        let c = chars[i].1;
        match (c, chars.get(i + 1).map(|(_, c)| *c)) {
            ('"', Some('"')) => {
                name.push('"');
                i += 2;
            }
            ('"', _) => return Ok((name, i + 1)),
            _ => {
                name.push(c);
                i += 1;
            }
        }
    }
    Err(CqlError::Unterminated {
        kind: "identifier",
        offset,
    })
}

fn read_number(chars: &[(usize, char)], offset: usize) -> Result<(f64, usize), CqlError> {
    let mut i = 0;
    if chars[0].1 == '-' {
        i += 1;
    }
    while i < chars.len() {
        let c = chars[i].1;
        let exponent_sign = (c == '-' || c == '+')
            && i > 0
            && matches!(chars[i - 1].1, 'e' | 'E');
        if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || exponent_sign {
            i += 1;
        } else {
            break;
        }
    }
    let literal: String = chars[..i].iter().map(|(_, c)| *c).collect();
    literal
        .parse::<f64>()
        .map(|n| (n, i))
        .map_err(|_| CqlError::UnexpectedToken {
            found: literal,
            expected: "number",
            offset,
        })
}
