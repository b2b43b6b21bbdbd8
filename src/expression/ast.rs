//! Expression tree and its evaluation.

use super::functions::Builtin;
use super::symbols::Symbols;
use crate::error::EvalError;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `!x`
    Not,
}

/// Binary operators, all left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
}

/// Parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal (suffix already applied)
    Number(f64),
    /// Symbol-table lookup by lowercase name
    Parameter { name: String, column: usize },
    UnaryOp { op: UnaryOp, operand: Box<Expr> },
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `test ? then : otherwise`
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Built-in call
    Call {
        function: Builtin,
        args: Vec<Expr>,
        column: usize,
    },
}

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

impl Expr {
    /// Evaluate against a symbol table.
    ///
    /// Every subexpression is evaluated, including the branch a conditional
    /// does not select, so an unknown parameter anywhere is reported.
    pub fn eval<S: Symbols + ?Sized>(&self, symbols: &S) -> Result<f64, EvalError> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Parameter { name, column } => {
                symbols
                    .lookup(name)
                    .ok_or_else(|| EvalError::UnknownParameter {
                        name: name.clone(),
                        column: *column,
                    })
            }
            Expr::UnaryOp { op, operand } => {
                let value = operand.eval(symbols)?;
                Ok(match op {
                    UnaryOp::Neg => -value,
                    UnaryOp::Plus => value,
                    UnaryOp::Not => truth(value == 0.0),
                })
            }
            Expr::BinaryOp { op, left, right } => {
                let a = left.eval(symbols)?;
                let b = right.eval(symbols)?;
                Ok(op.apply(a, b))
            }
            Expr::Conditional {
                test,
                then,
                otherwise,
            } => {
                let test = test.eval(symbols)?;
                let then = then.eval(symbols)?;
                let otherwise = otherwise.eval(symbols)?;
                Ok(if test > 0.0 { then } else { otherwise })
            }
            Expr::Call {
                function,
                args,
                column,
            } => {
                let values = args
                    .iter()
                    .map(|arg| arg.eval(symbols))
                    .collect::<Result<Vec<_>, _>>()?;
                function.call(&values, *column)
            }
        }
    }
}

impl BinaryOp {
    /// Apply the operator to evaluated operands.
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Mul => a * b,
            Self::Div => a / b,
            Self::Rem => a % b,
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Less => truth(a < b),
            Self::Greater => truth(a > b),
            Self::LessEqual => truth(a <= b),
            Self::GreaterEqual => truth(a >= b),
            Self::Equal => truth(a == b),
            Self::NotEqual => truth(a != b),
            Self::And => truth(a > 0.0 && b > 0.0),
            Self::Or => truth(a > 0.0 || b > 0.0),
        }
    }
}
