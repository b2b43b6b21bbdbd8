//! Expression parsing using recursive descent.
//!
//! ```text
//! expression     = conditional
//! conditional    = logical_or ['?' conditional ':' conditional]
//! logical_or     = logical_and { '||' logical_and }
//! logical_and    = relational { '&&' relational }
//! relational     = additive { ('<' | '>' | '<=' | '>=' | '==' | '!=') additive }
//! additive       = multiplicative { ('+' | '-') multiplicative }
//! multiplicative = unary { ('*' | '/' | '%') unary }
//! unary          = ('-' | '+' | '!') unary | primary
//! primary        = number | word '(' [expression { ',' expression }] ')'
//!                | word | '(' expression ')'
//! ```

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::functions::Builtin;
use super::lexer::{tokenize, ExprToken, ExprTokenKind};
use crate::error::EvalError;

/// Parse expression text into an [`Expr`].
pub fn parse_expression(input: &str) -> Result<Expr, EvalError> {
    let tokens = tokenize(input)?;
    let mut parser = ExprParser { tokens, pos: 0 };
    let expr = parser.parse_conditional()?;
    match parser.peek() {
        ExprTokenKind::End => Ok(expr),
        other => Err(EvalError::syntax(
            parser.column(),
            format!("unexpected {} after expression", other),
        )),
    }
}

impl Expr {
    /// Parse expression text; see [`parse_expression`].
    pub fn parse(input: &str) -> Result<Self, EvalError> {
        parse_expression(input)
    }
}

struct ExprParser {
    tokens: Vec<ExprToken>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> &ExprTokenKind {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &ExprTokenKind {
        // The token list always ends with End
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn column(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].column
    }

    fn advance(&mut self) -> ExprToken {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: ExprTokenKind, what: &str) -> Result<(), EvalError> {
        if *self.peek() == kind {
            self.advance();
            Ok(())
        } else {
            Err(EvalError::syntax(self.column(), format!("expected {}", what)))
        }
    }

    fn parse_conditional(&mut self) -> Result<Expr, EvalError> {
        let test = self.parse_or()?;
        if *self.peek() != ExprTokenKind::Question {
            return Ok(test);
        }
        self.advance();
        let then = self.parse_conditional()?;
        self.expect(ExprTokenKind::Colon, "':' in conditional")?;
        let otherwise = self.parse_conditional()?;
        Ok(Expr::Conditional {
            test: Box::new(test),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    /// Parse a left-associative chain of the operators `ops` over `next`.
    fn parse_binary(
        &mut self,
        ops: fn(&ExprTokenKind) -> Option<BinaryOp>,
        next: fn(&mut Self) -> Result<Expr, EvalError>,
    ) -> Result<Expr, EvalError> {
        let mut left = next(self)?;
        while let Some(op) = ops(self.peek()) {
            self.advance();
            let right = next(self)?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, EvalError> {
        self.parse_binary(
            |kind| match kind {
                ExprTokenKind::Or => Some(BinaryOp::Or),
                _ => None,
            },
            Self::parse_and,
        )
    }

    fn parse_and(&mut self) -> Result<Expr, EvalError> {
        self.parse_binary(
            |kind| match kind {
                ExprTokenKind::And => Some(BinaryOp::And),
                _ => None,
            },
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Result<Expr, EvalError> {
        self.parse_binary(
            |kind| match kind {
                ExprTokenKind::Less => Some(BinaryOp::Less),
                ExprTokenKind::Greater => Some(BinaryOp::Greater),
                ExprTokenKind::LessEqual => Some(BinaryOp::LessEqual),
                ExprTokenKind::GreaterEqual => Some(BinaryOp::GreaterEqual),
                ExprTokenKind::Equal => Some(BinaryOp::Equal),
                ExprTokenKind::NotEqual => Some(BinaryOp::NotEqual),
                _ => None,
            },
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<Expr, EvalError> {
        self.parse_binary(
            |kind| match kind {
                ExprTokenKind::Plus => Some(BinaryOp::Add),
                ExprTokenKind::Minus => Some(BinaryOp::Sub),
                _ => None,
            },
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, EvalError> {
        self.parse_binary(
            |kind| match kind {
                ExprTokenKind::Star => Some(BinaryOp::Mul),
                ExprTokenKind::Slash => Some(BinaryOp::Div),
                ExprTokenKind::Percent => Some(BinaryOp::Rem),
                _ => None,
            },
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            ExprTokenKind::Minus => UnaryOp::Neg,
            ExprTokenKind::Plus => UnaryOp::Plus,
            ExprTokenKind::Not => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        let token = self.advance();
        match token.kind {
            ExprTokenKind::Number(value) => Ok(Expr::Number(value)),
            ExprTokenKind::Word(name) => {
                if *self.peek() == ExprTokenKind::LeftParen {
                    self.parse_call(name, token.column)
                } else {
                    Ok(Expr::Parameter {
                        name,
                        column: token.column,
                    })
                }
            }
            ExprTokenKind::LeftParen => {
                let expr = self.parse_conditional()?;
                self.expect(ExprTokenKind::RightParen, "')'")?;
                Ok(expr)
            }
            ExprTokenKind::End => Err(EvalError::syntax(
                token.column,
                "unexpected end of expression",
            )),
            other => Err(EvalError::syntax(
                token.column,
                format!("unexpected {}", other),
            )),
        }
    }

    fn parse_call(&mut self, name: String, column: usize) -> Result<Expr, EvalError> {
        let function = Builtin::from_name(&name)
            .ok_or_else(|| EvalError::UnknownFunction {
                name: name.clone(),
                column,
            })?;
        self.advance(); // '('

        let mut args = Vec::new();
        if *self.peek() != ExprTokenKind::RightParen {
            args.push(self.parse_conditional()?);
            while *self.peek() == ExprTokenKind::Comma {
                self.advance();
                args.push(self.parse_conditional()?);
            }
        }
        self.expect(ExprTokenKind::RightParen, "')' after function arguments")?;

        function.check_arity(args.len(), column)?;
        Ok(Expr::Call {
            function,
            args,
            column,
        })
    }
}
