//! Tokenizer for the expression language.

use std::fmt;

use crate::error::EvalError;
use crate::units::parse_number;

/// Expression token types.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprTokenKind {
    /// Numeric literal, already scaled
    Number(f64),
    /// Identifier or function name, lowercased
    Word(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Not,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
    Question,
    Colon,
    Comma,
    LeftParen,
    RightParen,
    End,
}

impl fmt::Display for ExprTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Number(value) => return write!(f, "number {}", value),
            Self::Word(word) => return write!(f, "'{}'", word),
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Not => "!",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Question => "?",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::End => return f.write_str("end of expression"),
        };
        write!(f, "'{}'", symbol)
    }
}

/// A token with its 1-indexed column in the expression text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprToken {
    pub kind: ExprTokenKind,
    pub column: usize,
}

/// Split expression text into tokens, ending with [`ExprTokenKind::End`].
pub fn tokenize(input: &str) -> Result<Vec<ExprToken>, EvalError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let column = i + 1;

        if ch.is_whitespace() {
            i += 1;
            continue;
        }

        let next = chars.get(i + 1).copied();
        let (kind, len) = match (ch, next) {
            ('=', Some('=')) => (ExprTokenKind::Equal, 2),
            ('!', Some('=')) => (ExprTokenKind::NotEqual, 2),
            ('<', Some('=')) => (ExprTokenKind::LessEqual, 2),
            ('>', Some('=')) => (ExprTokenKind::GreaterEqual, 2),
            ('&', Some('&')) => (ExprTokenKind::And, 2),
            ('|', Some('|')) => (ExprTokenKind::Or, 2),
            ('+', _) => (ExprTokenKind::Plus, 1),
            ('-', _) => (ExprTokenKind::Minus, 1),
            ('*', _) => (ExprTokenKind::Star, 1),
            ('/', _) => (ExprTokenKind::Slash, 1),
            ('%', _) => (ExprTokenKind::Percent, 1),
            ('!', _) => (ExprTokenKind::Not, 1),
            ('<', _) => (ExprTokenKind::Less, 1),
            ('>', _) => (ExprTokenKind::Greater, 1),
            ('?', _) => (ExprTokenKind::Question, 1),
            (':', _) => (ExprTokenKind::Colon, 1),
            (',', _) => (ExprTokenKind::Comma, 1),
            ('(', _) => (ExprTokenKind::LeftParen, 1),
            (')', _) => (ExprTokenKind::RightParen, 1),
            _ if ch.is_ascii_digit() || (ch == '.' && next.is_some_and(|c| c.is_ascii_digit())) => {
                let len = number_length(&chars[i..]);
                let text: String = chars[i..i + len].iter().collect();
                let value = parse_number(&text)
                    .map(|n| n.value())
                    .ok_or(EvalError::InvalidNumber { text, column })?;
                (ExprTokenKind::Number(value), len)
            }
            _ if ch.is_alphabetic() => {
                let len = chars[i..]
                    .iter()
                    .take_while(|c| c.is_alphanumeric() || **c == '_')
                    .count();
                let word: String = chars[i..i + len].iter().collect();
                (ExprTokenKind::Word(word.to_lowercase()), len)
            }
            _ => {
                return Err(EvalError::syntax(
                    column,
                    format!("unexpected character '{}'", ch),
                ))
            }
        };

        tokens.push(ExprToken { kind, column });
        i += len;
    }

    tokens.push(ExprToken {
        kind: ExprTokenKind::End,
        column: chars.len() + 1,
    });
    Ok(tokens)
}

/// Length of the numeric literal at the start of `chars`: the mantissa, then
/// either an exponent or a run of suffix letters.
fn number_length(chars: &[char]) -> usize {
    let mut i = chars.iter().take_while(|c| c.is_ascii_digit()).count();
    if chars.get(i) == Some(&'.') {
        i += 1;
        i += chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
    }

    if matches!(chars.get(i), Some('e') | Some('E')) {
        let mut j = i + 1;
        if matches!(chars.get(j), Some('+') | Some('-')) {
            j += 1;
        }
        if chars.get(j).is_some_and(|c| c.is_ascii_digit()) {
            return j + chars[j..].iter().take_while(|c| c.is_ascii_digit()).count();
        }
    }

    i + chars[i..].iter().take_while(|c| c.is_ascii_alphabetic()).count()
}
