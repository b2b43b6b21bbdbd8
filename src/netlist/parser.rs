//! Recursive-descent parser for netlists.
//!
//! The parser keeps the current token plus at most one peeked token, which is
//! all the lookahead the grammar needs: `.` + keyword selects a dot statement,
//! line break + `+` selects a continuation, and a leaf followed by `(`, `[`,
//! `,` or `=` selects the parameter production.

use tracing::{debug, trace};

use super::ast::*;
use super::lexer::{Lexer, Punct, Token, TokenKind};
use crate::error::{NetlistError, Result};

/// Parser for netlist documents.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peeked: Option<Token>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            peeked: None,
            depth: 0,
        })
    }

    /// Parse the entire netlist document.
    pub fn parse(&mut self) -> Result<NetlistAst> {
        debug!("parsing netlist");
        let statements = self.parse_block(None)?;
        debug!(statements = statements.len(), "parsed netlist");
        Ok(NetlistAst { statements })
    }

    /// Parse a single parameter, e.g. `r1(a,b)=5`.
    ///
    /// Used for parameters on their own; the rest of the line must be empty.
    pub fn parse_single_parameter(&mut self) -> Result<ParameterToken> {
        let parameter = self.parse_parameter(false)?;
        if !self.current.is_terminator() {
            return Err(self.unexpected("expected end of parameter"));
        }
        Ok(parameter)
    }

    fn advance(&mut self) -> Result<Token> {
        let next = match self.peeked.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn peek(&mut self) -> Result<&Token> {
        let tok = match self.peeked.take() {
            Some(tok) => tok,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(tok))
    }

    fn unexpected(&self, message: &str) -> NetlistError {
        let lexeme = match self.current.kind {
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            _ => self.current.to_string(),
        };
        NetlistError::syntax(self.current.line, self.current.column, lexeme, message)
    }

    /// Parse statements until end of input, `.end`, or (inside a subcircuit)
    /// the matching `.ends`.
    fn parse_block(&mut self, enclosing: Option<&Token>) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();

        loop {
            match &self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                }
                TokenKind::Eof => return self.close_block(enclosing, statements),
                TokenKind::Punctuation(Punct::Dot) => {
                    let keyword = self.peek()?.word();
                    match keyword.as_deref() {
                        Some("end") => return self.close_block(enclosing, statements),
                        Some("ends") => {
                            let name = match enclosing {
                                Some(name) => name,
                                None => {
                                    return Err(NetlistError::UnmatchedEnds {
                                        line: self.current.line,
                                        column: self.current.column,
                                    })
                                }
                            };
                            self.finish_subcircuit(name)?;
                            return Ok(statements);
                        }
                        Some(_) => {
                            let statement = self.parse_dot_statement()?;
                            trace!(kind = statement.kind_name(), line = statement.line(), "statement");
                            statements.push(statement);
                        }
                        None => {
                            self.advance()?;
                            return Err(self.unexpected("expected a statement name after '.'"));
                        }
                    }
                }
                TokenKind::Word => {
                    let statement = self.parse_component()?;
                    trace!(kind = statement.kind_name(), line = statement.line(), "statement");
                    statements.push(statement);
                }
                _ => return Err(self.unexpected("expected a statement")),
            }
        }
    }

    /// End of the document was reached; only valid at the top level.
    fn close_block(&self, enclosing: Option<&Token>, statements: Vec<Statement>) -> Result<Vec<Statement>> {
        match enclosing {
            None => Ok(statements),
            Some(name) => Err(NetlistError::UnterminatedSubcircuit {
                name: name.text.clone(),
                line: name.line,
                column: name.column,
            }),
        }
    }

    /// Consume `.ends [name]`.
    fn finish_subcircuit(&mut self, name: &Token) -> Result<()> {
        self.advance()?; // '.'
        self.advance()?; // 'ends'

        if self.current.is_leaf() {
            if !self.current.text.eq_ignore_ascii_case(&name.text) {
                return Err(self.unexpected(&format!(
                    ".ends does not match subcircuit '{}'",
                    name.text
                )));
            }
            self.advance()?;
        }

        if !self.current.is_terminator() {
            return Err(self.unexpected("expected end of line after .ends"));
        }
        Ok(())
    }

    fn parse_dot_statement(&mut self) -> Result<Statement> {
        self.advance()?; // '.'
        let keyword = self.advance()?;

        match keyword.folded().as_str() {
            "subckt" => self.parse_subcircuit(),
            "model" => self.parse_model(keyword),
            _ => {
                let parameters = self.parse_parameters()?;
                Ok(Statement::Control {
                    name: keyword,
                    parameters,
                })
            }
        }
    }

    fn parse_subcircuit(&mut self) -> Result<Statement> {
        if !is_name(&self.current) {
            return Err(self.unexpected("expected a subcircuit name"));
        }
        let name = self.advance()?;
        let parameters = self.parse_parameters()?;

        self.depth += 1;
        debug!(name = %name.text, depth = self.depth, "entering subcircuit");
        let body = self.parse_block(Some(&name))?;
        debug!(name = %name.text, statements = body.len(), "leaving subcircuit");
        self.depth -= 1;

        Ok(Statement::Subcircuit {
            name,
            parameters,
            body,
        })
    }

    fn parse_model(&mut self, keyword: Token) -> Result<Statement> {
        let mut parameters = self.parse_parameters()?;
        if parameters.len() < 2 {
            return Err(NetlistError::MalformedModel {
                line: keyword.line,
                column: keyword.column,
                found: parameters.len(),
            });
        }

        match parameters.remove(0) {
            ParameterToken::Plain(name) if is_name(&name) => Ok(Statement::Model { name, parameters }),
            other => {
                let (line, column) = other.begin();
                Err(NetlistError::syntax(
                    line,
                    column,
                    other.to_string(),
                    "expected a model name",
                ))
            }
        }
    }

    fn parse_component(&mut self) -> Result<Statement> {
        let name = self.advance()?;
        let parameters = self.parse_parameters()?;
        Ok(Statement::Component { name, parameters })
    }

    /// Collect parameters up to the end of the logical line, merging
    /// continuation lines.
    fn parse_parameters(&mut self) -> Result<Vec<ParameterToken>> {
        let mut parameters = Vec::new();

        loop {
            if self.skip_continuation()? {
                continue;
            }
            if self.current.is_terminator() {
                return Ok(parameters);
            }
            parameters.push(self.parse_parameter(false)?);
        }
    }

    /// Skip a line break followed by `+`. Returns whether one was skipped.
    fn skip_continuation(&mut self) -> Result<bool> {
        if self.current.kind == TokenKind::Newline && self.peek()?.is_punct(Punct::Plus) {
            self.advance()?;
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn parse_parameter(&mut self, in_group: bool) -> Result<ParameterToken> {
        let first = self.expect_leaf()?;

        if let Some(delimiter) = self.open_delimiter() {
            let group = self.parse_group(first, delimiter)?;
            return self.parse_assignment_tail(group, in_group);
        }

        let atom = self.finish_atom(first, in_group)?;
        if self.open_delimiter().is_some() {
            return Err(self.unexpected("a bracket group must follow a single token"));
        }
        self.parse_assignment_tail(atom, in_group)
    }

    fn parse_assignment_tail(&mut self, left: ParameterToken, in_group: bool) -> Result<ParameterToken> {
        if !self.current.is_punct(Punct::Equals) {
            return Ok(left);
        }
        self.advance()?;
        let first = self.expect_leaf()?;
        let right = self.finish_atom(first, in_group)?;
        Ok(ParameterToken::Assignment {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Collapse comma-joined leaves into a vector. Inside bracket groups
    /// commas separate children instead.
    fn finish_atom(&mut self, first: Token, in_group: bool) -> Result<ParameterToken> {
        if in_group || !self.current.is_punct(Punct::Comma) {
            return Ok(ParameterToken::Plain(first));
        }

        let mut tokens = vec![first];
        while self.current.is_punct(Punct::Comma) {
            self.advance()?;
            tokens.push(self.expect_leaf()?);
        }
        Ok(ParameterToken::Vector(tokens))
    }

    fn parse_group(&mut self, head: Token, delimiter: Delimiter) -> Result<ParameterToken> {
        let close = match delimiter {
            Delimiter::Paren => Punct::RightParen,
            Delimiter::Bracket => Punct::RightBracket,
        };
        self.advance()?; // opening delimiter

        let mut children = Vec::new();
        loop {
            if self.skip_continuation()? {
                continue;
            }
            if self.current.is_punct(close) {
                self.advance()?;
                break;
            }
            if self.current.is_punct(Punct::Comma) {
                self.advance()?;
                continue;
            }
            if self.current.is_terminator() {
                return Err(self.unexpected(&format!("expected '{}'", close.as_char())));
            }
            children.push(self.parse_parameter(true)?);
        }

        Ok(ParameterToken::Bracketed {
            head,
            delimiter,
            children,
        })
    }

    fn open_delimiter(&self) -> Option<Delimiter> {
        match self.current.kind {
            TokenKind::Punctuation(Punct::LeftParen) => Some(Delimiter::Paren),
            TokenKind::Punctuation(Punct::LeftBracket) => Some(Delimiter::Bracket),
            _ => None,
        }
    }

    fn expect_leaf(&mut self) -> Result<Token> {
        if self.current.is_leaf() {
            self.advance()
        } else {
            Err(self.unexpected("expected a parameter"))
        }
    }
}

/// Subcircuit and model names: any word-like run, including ones that also
/// read as numbers (`555timer`, `1mf`).
fn is_name(token: &Token) -> bool {
    matches!(
        token.kind,
        TokenKind::Word | TokenKind::Identifier | TokenKind::Value(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::parse;

    fn parameter(text: &str) -> ParameterToken {
        Parser::new(Lexer::new(text))
            .unwrap()
            .parse_single_parameter()
            .unwrap()
    }

    #[test]
    fn test_parse_resistor() {
        let ast = parse("R1 in out 10k").unwrap();
        assert_eq!(ast.statements.len(), 1);
        match &ast.statements[0] {
            Statement::Component { name, parameters } => {
                assert_eq!(name.text, "R1");
                assert_eq!(parameters.len(), 3);
                assert_eq!(parameters[0].as_token().map(|t| t.text.as_str()), Some("in"));
                let value = parameters[2].as_token().and_then(|t| t.number()).map(|n| n.value());
                assert_eq!(value, Some(10_000.0));
            }
            other => panic!("expected component, got {other:?}"),
        }
    }

    #[test]
    fn test_bracketed_assignment() {
        match parameter("r1(a,b)=5") {
            ParameterToken::Assignment { left, right } => {
                match *left {
                    ParameterToken::Bracketed {
                        head,
                        delimiter,
                        children,
                    } => {
                        assert_eq!(head.text, "r1");
                        assert_eq!(delimiter, Delimiter::Paren);
                        assert_eq!(children.len(), 2);
                        assert_eq!(children[0].as_token().map(|t| t.text.as_str()), Some("a"));
                        assert_eq!(children[1].as_token().map(|t| t.text.as_str()), Some("b"));
                    }
                    other => panic!("expected bracketed left side, got {other:?}"),
                }
                assert_eq!(right.as_token().map(|t| t.text.as_str()), Some("5"));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_square_bracket_group() {
        match parameter("@m1[gm]") {
            ParameterToken::Bracketed {
                head,
                delimiter,
                children,
            } => {
                assert_eq!(head.kind, TokenKind::Reference);
                assert_eq!(delimiter, Delimiter::Bracket);
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected bracketed group, got {other:?}"),
        }
    }

    #[test]
    fn test_vector_collapsing() {
        match parameter("a,b,c") {
            ParameterToken::Vector(tokens) => {
                let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
                assert_eq!(texts, vec!["a", "b", "c"]);
            }
            other => panic!("expected vector, got {other:?}"),
        }

        assert!(matches!(parameter("a"), ParameterToken::Plain(ref t) if t.text == "a"));
    }

    #[test]
    fn test_plain_assignment_and_vector_value() {
        let (name, value) = match parameter("w=1u") {
            ParameterToken::Assignment { left, right } => (*left, *right),
            other => panic!("expected assignment, got {other:?}"),
        };
        assert_eq!(name.as_token().map(|t| t.text.as_str()), Some("w"));
        assert!(matches!(value, ParameterToken::Plain(_)));

        match parameter("ic=1,2") {
            ParameterToken::Assignment { right, .. } => {
                assert!(matches!(*right, ParameterToken::Vector(ref v) if v.len() == 2))
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_groups() {
        match parameter("pulse(0 1 f(a, g(b)) c=2)") {
            ParameterToken::Bracketed { children, .. } => {
                assert_eq!(children.len(), 4);
                assert!(matches!(children[2], ParameterToken::Bracketed { ref children, .. } if children.len() == 2));
                assert!(matches!(children[3], ParameterToken::Assignment { .. }));
            }
            other => panic!("expected bracketed group, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_group() {
        assert!(matches!(
            parameter("f()"),
            ParameterToken::Bracketed { ref children, .. } if children.is_empty()
        ));
    }

    #[test]
    fn test_unclosed_group() {
        let err = parse("R1 a b f(1 2\nR2 a b 1").unwrap_err();
        assert!(matches!(err, NetlistError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_bracket_after_vector_is_rejected() {
        let err = parse("X1 a,b(c)").unwrap_err();
        assert!(matches!(err, NetlistError::Syntax { .. }));
    }

    #[test]
    fn test_missing_vector_element() {
        let err = parse("X1 a, =").unwrap_err();
        assert!(matches!(err, NetlistError::Syntax { .. }));
    }
}
