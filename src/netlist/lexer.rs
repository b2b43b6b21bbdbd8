//! Lexer (tokenizer) for netlist text.

use std::fmt;

use crate::error::{NetlistError, Result};
use crate::units::{parse_number, Number};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text (unescaped for strings, without delimiters for
    /// expressions and references)
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a netlist.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Alphanumeric word starting with a letter (`R1`, `subckt`, `vdd`)
    Word,
    /// Numeric literal, eagerly parsed
    Value(Number),
    /// Double-quoted string
    String,
    /// Word-like run that does not start with a letter (`-in`, `_n1`)
    Identifier,
    /// `@name`
    Reference,
    /// `{...}` expression literal
    Expression,
    /// Structural punctuation
    Punctuation(Punct),
    /// Line terminator (`\n`, `\r` or `\r\n`)
    Newline,
    /// End of input
    Eof,
}

/// Punctuation recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    /// `.` introducing a dot statement
    Dot,
    /// `+` continuation marker
    Plus,
    Equals,
    Comma,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
}

impl Punct {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '=' => Some(Self::Equals),
            ',' => Some(Self::Comma),
            '(' => Some(Self::LeftParen),
            ')' => Some(Self::RightParen),
            '[' => Some(Self::LeftBracket),
            ']' => Some(Self::RightBracket),
            _ => None,
        }
    }

    /// Source spelling.
    pub fn as_char(&self) -> char {
        match self {
            Self::Dot => '.',
            Self::Plus => '+',
            Self::Equals => '=',
            Self::Comma => ',',
            Self::LeftParen => '(',
            Self::RightParen => ')',
            Self::LeftBracket => '[',
            Self::RightBracket => ']',
        }
    }
}

impl Token {
    /// Create a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }

    /// Leaf tokens can appear as parameters.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Word
                | TokenKind::Value(_)
                | TokenKind::String
                | TokenKind::Identifier
                | TokenKind::Reference
                | TokenKind::Expression
        )
    }

    /// Check for a specific punctuation token.
    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punctuation(punct)
    }

    /// Line breaks and end of input both terminate a statement.
    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, TokenKind::Newline | TokenKind::Eof)
    }

    /// Lowercase-folded text, used for all keyword and name matching.
    pub fn folded(&self) -> String {
        self.text.to_lowercase()
    }

    /// Lowercased text of a word, `None` for other kinds.
    pub fn word(&self) -> Option<String> {
        match self.kind {
            TokenKind::Word => Some(self.folded()),
            _ => None,
        }
    }

    /// Parsed literal of a value token.
    pub fn number(&self) -> Option<&Number> {
        match &self.kind {
            TokenKind::Value(number) => Some(number),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Word | TokenKind::Value(_) | TokenKind::Identifier => {
                f.write_str(&self.text)
            }
            TokenKind::String => {
                f.write_str("\"")?;
                for ch in self.text.chars() {
                    match ch {
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        '\u{8}' => f.write_str("\\b")?,
                        '\u{c}' => f.write_str("\\f")?,
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        _ => write!(f, "{}", ch)?,
                    }
                }
                f.write_str("\"")
            }
            TokenKind::Reference => write!(f, "@{}", self.text),
            TokenKind::Expression => write!(f, "{{{}}}", self.text),
            TokenKind::Punctuation(punct) => write!(f, "{}", punct.as_char()),
            TokenKind::Newline => f.write_str("\n"),
            TokenKind::Eof => Ok(()),
        }
    }
}

/// Characters allowed inside words, identifiers and values.
fn is_run_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | ':' | '!' | '%' | '#' | '-')
}

/// Whether `text` is a mantissa followed by `e`/`E`, so that a `+` continues
/// the run as the exponent sign (`1e+3`).
fn awaits_exponent(text: &str) -> bool {
    let mantissa = match text.strip_suffix(|c: char| c == 'e' || c == 'E') {
        Some(mantissa) => mantissa.strip_prefix('-').unwrap_or(mantissa),
        None => return false,
    };
    mantissa.bytes().any(|b| b.is_ascii_digit())
        && mantissa.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && mantissa.bytes().filter(|&b| b == b'.').count() <= 1
}

/// Lexer for tokenizing netlist input.
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    column: usize,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
            at_line_start: true,
        }
    }

    /// Lex the remaining input, excluding the final end-of-input token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_blanks_and_comments();

        let line = self.line;
        let column = self.column;
        let ch = match self.peek_char() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenKind::Eof, "", line, column)),
        };

        let starts_line = self.at_line_start;
        self.at_line_start = false;

        let token = match ch {
            '\n' | '\r' => {
                self.consume_line_break();
                self.at_line_start = true;
                Token::new(TokenKind::Newline, "\n", line, column)
            }
            '"' => self.read_string(line, column)?,
            '{' => self.read_expression(line, column)?,
            '@' => {
                self.advance();
                let text = self.read_run();
                if !text.starts_with(|c: char| c.is_alphabetic()) {
                    return Err(NetlistError::lexer(
                        line,
                        column,
                        format!("@{}", text),
                        "expected a word after '@'",
                    ));
                }
                Token::new(TokenKind::Reference, text, line, column)
            }
            '+' if !starts_line && self.starts_number(1) => {
                self.advance();
                let text = format!("+{}", self.read_run());
                match parse_number(&text) {
                    Some(number) => Token::new(TokenKind::Value(number), text, line, column),
                    None => {
                        return Err(NetlistError::lexer(
                            line,
                            column,
                            text,
                            "invalid numeric literal",
                        ))
                    }
                }
            }
            '+' => {
                self.advance();
                Token::new(TokenKind::Punctuation(Punct::Plus), "+", line, column)
            }
            '.' if !self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.advance();
                Token::new(TokenKind::Punctuation(Punct::Dot), ".", line, column)
            }
            _ if is_run_char(ch) => {
                let text = self.read_run();
                self.classify_run(text, line, column)
            }
            _ => {
                if let Some(punct) = Punct::from_char(ch) {
                    self.advance();
                    Token::new(TokenKind::Punctuation(punct), ch.to_string(), line, column)
                } else {
                    return Err(NetlistError::lexer(
                        line,
                        column,
                        ch.to_string(),
                        format!("unexpected character '{}'", ch),
                    ));
                }
            }
        };

        Ok(token)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, ch)| ch)
    }

    fn position(&mut self) -> usize {
        self.chars.peek().map(|&(pos, _)| pos).unwrap_or(self.input.len())
    }

    /// Whether a (sign-less) number starts `offset` characters ahead.
    fn starts_number(&self, offset: usize) -> bool {
        match self.peek_nth(offset) {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_nth(offset + 1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (_, ch) = self.chars.next()?;
        self.column += 1;
        Some(ch)
    }

    /// Consume one `\n`, `\r` or `\r\n`.
    fn consume_line_break(&mut self) {
        if self.advance() == Some('\r') && self.peek_char() == Some('\n') {
            self.chars.next();
        }
        self.line += 1;
        self.column = 1;
    }

    fn skip_blanks_and_comments(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' | '\t' => {
                    self.advance();
                }
                '*' if self.at_line_start => {
                    // Comment line: skip through its terminator
                    while let Some(c) = self.peek_char() {
                        if c == '\n' || c == '\r' {
                            self.consume_line_break();
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_run(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek_char() {
            let exponent_sign = ch == '+'
                && awaits_exponent(&text)
                && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit());
            if is_run_char(ch) || exponent_sign {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn classify_run(&self, text: String, line: usize, column: usize) -> Token {
        if let Some(number) = parse_number(&text) {
            Token::new(TokenKind::Value(number), text, line, column)
        } else if text.starts_with(|c: char| c.is_alphabetic()) {
            Token::new(TokenKind::Word, text, line, column)
        } else {
            Token::new(TokenKind::Identifier, text, line, column)
        }
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<Token> {
        self.advance(); // opening quote
        let mut text = String::new();

        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return Ok(Token::new(TokenKind::String, text, line, column));
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('b') => '\u{8}',
                        Some('r') => '\r',
                        Some('f') => '\u{c}',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('\n') | Some('\r') => {
                            self.consume_line_break();
                            continue;
                        }
                        Some(other) => {
                            return Err(NetlistError::lexer(
                                self.line,
                                self.column - 1,
                                format!("\\{}", other),
                                "invalid escape sequence",
                            ))
                        }
                        None => break,
                    };
                    self.advance();
                    text.push(escaped);
                }
                Some('\n') | Some('\r') | None => break,
                Some(ch) => {
                    self.advance();
                    text.push(ch);
                }
            }
        }

        Err(NetlistError::lexer(
            line,
            column,
            format!("\"{}", text),
            "unterminated string literal",
        ))
    }

    fn read_expression(&mut self, line: usize, column: usize) -> Result<Token> {
        self.advance(); // opening brace
        let start = self.position();

        loop {
            match self.peek_char() {
                Some('}') => {
                    let end = self.position();
                    self.advance();
                    let text = &self.input[start..end];
                    return Ok(Token::new(TokenKind::Expression, text, line, column));
                }
                Some('{') => {
                    return Err(NetlistError::lexer(
                        self.line,
                        self.column,
                        "{",
                        "nested braces are not allowed in an expression literal",
                    ))
                }
                Some('\n') | Some('\r') => self.consume_line_break(),
                Some(_) => {
                    self.advance();
                }
                None => {
                    let end = self.position();
                    return Err(NetlistError::lexer(
                        line,
                        column,
                        format!("{{{}", &self.input[start..end]),
                        "unterminated expression literal",
                    ));
                }
            }
        }
    }
}
