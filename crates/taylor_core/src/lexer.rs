use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident,
    /// One of `+ - * / ^`.
    Operator(char),
    LParen,
    RParen,
    Comma,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Character offset of the first character of the token.
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// How the token reads in an error message.
    pub(crate) fn describe(&self) -> String {
        match self.kind {
            TokenKind::End => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Splits `source` into tokens. The returned sequence always ends with a
/// single `End` token positioned at the input length.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        if c.is_whitespace() {
            pos += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let (token, next) = lex_number(&chars, pos)?;
            tokens.push(token);
            pos = next;
        } else if c.is_ascii_alphabetic() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_alphanumeric() {
                pos += 1;
            }
            let ident: String = chars[start..pos].iter().collect();
            tokens.push(Token::new(TokenKind::Ident, ident, start));
        } else {
            let kind = match c {
                '+' | '-' | '*' | '/' | '^' => TokenKind::Operator(c),
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ',' => TokenKind::Comma,
                _ => {
                    return Err(EngineError::syntax(
                        pos,
                        format!("unexpected character '{c}'"),
                    ))
                }
            };
            tokens.push(Token::new(kind, c.to_string(), pos));
            pos += 1;
        }
    }

    tokens.push(Token::new(TokenKind::End, "", chars.len()));
    Ok(tokens)
}

/// Reads `digits [. digits] [(e|E) [+|-] digits]` starting at `start`.
/// An exponent marker without digits after it is left for the identifier
/// rule, so `2e` lexes as `2` followed by `e`.
fn lex_number(chars: &[char], start: usize) -> Result<(Token, usize)> {
    let digits_from = |mut p: usize| {
        while p < chars.len() && chars[p].is_ascii_digit() {
            p += 1;
        }
        p
    };

    let mut pos = digits_from(start);
    if pos < chars.len() && chars[pos] == '.' {
        pos = digits_from(pos + 1);
    }

    if pos < chars.len() && (chars[pos] == 'e' || chars[pos] == 'E') {
        let mut exp = pos + 1;
        if exp < chars.len() && (chars[exp] == '+' || chars[exp] == '-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            pos = exp_end;
        }
    }

    let text: String = chars[start..pos].iter().collect();
    let value: f64 = text
        .parse()
        .map_err(|_| EngineError::syntax(start, format!("malformed number '{text}'")))?;
    Ok((Token::new(TokenKind::Number(value), text, start), pos))
}
