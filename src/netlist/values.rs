//! Resolving parsed tokens into numbers and strings for consumers.
//!
//! Value tokens carry their number from the lexer. Expression literals stay
//! raw text until a consumer resolves them here against its symbol table.

use tracing::debug;

use super::ast::{ParameterToken, Statement};
use super::lexer::{Token, TokenKind};
use crate::error::{NetlistError, Result};
use crate::expression::{evaluate, ParameterTable, Symbols};

impl Token {
    /// Numeric value of a value token or an evaluated expression literal.
    ///
    /// Expression errors are reported at this token's position.
    pub fn resolve<S: Symbols + ?Sized>(&self, symbols: &S) -> Result<f64> {
        match &self.kind {
            TokenKind::Value(number) => Ok(number.value()),
            TokenKind::Expression => {
                evaluate(&self.text, symbols).map_err(|source| NetlistError::Eval {
                    line: self.line,
                    column: self.column,
                    source,
                })
            }
            _ => Err(NetlistError::NotNumeric {
                lexeme: self.to_string(),
                line: self.line,
                column: self.column,
            }),
        }
    }

    /// Text of a word or the contents of a string.
    pub fn text_value(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Word | TokenKind::String => Some(&self.text),
            _ => None,
        }
    }
}

impl ParameterToken {
    /// Resolve a plain value or expression parameter.
    pub fn resolve<S: Symbols + ?Sized>(&self, symbols: &S) -> Result<f64> {
        match self {
            Self::Plain(token) => token.resolve(symbols),
            other => {
                let (line, column) = other.begin();
                Err(NetlistError::NotNumeric {
                    lexeme: other.to_string(),
                    line,
                    column,
                })
            }
        }
    }
}

impl ParameterTable<'_> {
    /// Apply the `name=value` assignments of a `.param` statement in order.
    ///
    /// Each value may refer to parameters defined earlier, including ones
    /// from the same statement.
    pub fn apply_param_statement(&mut self, statement: &Statement) -> Result<()> {
        for parameter in statement.parameters() {
            let (name, value) = match parameter.as_assignment() {
                Some((name, value)) if matches!(name.kind, TokenKind::Word) => (name, value),
                _ => {
                    let (line, column) = parameter.begin();
                    return Err(NetlistError::syntax(
                        line,
                        column,
                        parameter.to_string(),
                        "expected name=value",
                    ));
                }
            };
            let resolved = value.resolve(&*self)?;
            debug!(name = %name.text, value = resolved, "defined parameter");
            self.insert(&name.text, resolved);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::netlist::parse;

    #[test]
    fn test_resolve_value_and_expression() {
        let ast = parse("R1 a b 2k {rval * 2} c").unwrap();
        let parameters = ast.statements[0].parameters();
        let mut table = ParameterTable::new();
        table.insert("rval", 50.0);

        assert_eq!(parameters[2].resolve(&table).unwrap(), 2000.0);
        assert_eq!(parameters[3].resolve(&table).unwrap(), 100.0);
        assert!(matches!(
            parameters[4].resolve(&table),
            Err(NetlistError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_expression_error_positioned_at_token() {
        let ast = parse("R1 a b\n+ {missing + 1}").unwrap();
        let parameters = ast.statements[0].parameters();
        match parameters[2].resolve(&ParameterTable::new()) {
            Err(NetlistError::Eval { line, column, source }) => {
                assert_eq!((line, column), (2, 3));
                assert!(matches!(source, EvalError::UnknownParameter { .. }));
            }
            other => panic!("expected eval error, got {other:?}"),
        }
    }

    #[test]
    fn test_text_value() {
        let ast = parse(".options method=gear title=\"my circuit\"").unwrap();
        let parameters = ast.statements[0].parameters();
        let (_, method) = parameters[0].as_assignment().unwrap();
        let (_, title) = parameters[1].as_assignment().unwrap();
        assert_eq!(method.as_token().and_then(|t| t.text_value()), Some("gear"));
        assert_eq!(title.as_token().and_then(|t| t.text_value()), Some("my circuit"));
    }

    #[test]
    fn test_param_statements() {
        let ast = parse(".param vdd=3.3 half={vdd/2}\n.param Gain={half * 2}").unwrap();
        let mut table = ParameterTable::new();
        for statement in ast.controls("param") {
            table.apply_param_statement(statement).unwrap();
        }
        assert_eq!(table.get("vdd"), Some(3.3));
        assert_eq!(table.get("half"), Some(1.65));
        assert_eq!(table.get("gain"), Some(3.3));
    }

    #[test]
    fn test_param_statement_requires_assignments() {
        let ast = parse(".param x").unwrap();
        let err = ParameterTable::new()
            .apply_param_statement(&ast.statements[0])
            .unwrap_err();
        assert!(matches!(err, NetlistError::Syntax { .. }));
    }
}
