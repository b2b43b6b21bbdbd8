//! Arithmetic expressions embedded in netlists as `{...}` literals.
//!
//! Supports expressions like:
//! - `2 * w + 1u` - parameters with unit-suffixed literals
//! - `temp > 25 ? r * 1.1 : r` - conditionals
//! - `max(a, b, 1k)` - built-in functions
//!
//! # Operators
//!
//! | Precedence | Operators | Result |
//! |------------|-----------|--------|
//! | lowest | `?:` | selected branch, test is true when `> 0` |
//! | | `\|\|` | `1` or `0` |
//! | | `&&` | `1` or `0` |
//! | | `< > <= >= == !=` | `1` or `0` |
//! | | `+ -` | |
//! | | `* / %` | |
//! | highest | unary `- + !` | `!x` is `1` when `x == 0` |
//!
//! Identifiers and function names are case-insensitive. Identifiers are
//! resolved through a [`Symbols`] table supplied by the caller; nothing is
//! cached between calls.

mod ast;
mod functions;
mod lexer;
mod parser;
mod symbols;

pub use ast::{BinaryOp, Expr, UnaryOp};
pub use functions::{Arity, Builtin};
pub use lexer::{tokenize, ExprToken, ExprTokenKind};
pub use parser::parse_expression;
pub use symbols::{ParameterTable, Symbols};

use tracing::trace;

use crate::error::EvalError;

/// Parse and evaluate expression text in one step.
pub fn evaluate<S: Symbols + ?Sized>(input: &str, symbols: &S) -> Result<f64, EvalError> {
    let value = parse_expression(input)?.eval(symbols)?;
    trace!(expression = input, value, "evaluated expression");
    Ok(value)
}
