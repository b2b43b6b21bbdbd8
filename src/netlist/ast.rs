//! Abstract Syntax Tree types for netlists.
//!
//! The tree is built once by the parser and handed read-only to consumers.
//! Every node renders back to netlist text through [`fmt::Display`]; parsing
//! that text again yields the same tree.

use std::fmt;

use super::lexer::Token;

/// Complete AST of a parsed netlist document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetlistAst {
    /// Top-level statements in source order
    pub statements: Vec<Statement>,
}

impl NetlistAst {
    /// Create a new empty AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level subcircuit definitions.
    pub fn subcircuits(&self) -> impl Iterator<Item = &Statement> {
        self.statements
            .iter()
            .filter(|s| matches!(s, Statement::Subcircuit { .. }))
    }

    /// Find a top-level subcircuit definition by name (case-insensitive).
    pub fn subcircuit(&self, name: &str) -> Option<&Statement> {
        self.subcircuits()
            .find(|s| s.name().text.eq_ignore_ascii_case(name))
    }

    /// Top-level control statements with the given name (`param`, `tran`, ...).
    pub fn controls<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Statement> + 'a {
        self.statements.iter().filter(move |s| {
            matches!(s, Statement::Control { name: n, .. } if n.text.eq_ignore_ascii_case(name))
        })
    }
}

impl fmt::Display for NetlistAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

/// One parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Element line, e.g. `R1 in out 10k`
    Component {
        name: Token,
        parameters: Vec<ParameterToken>,
    },
    /// `.subckt <name> <header> ... .ends`
    Subcircuit {
        name: Token,
        parameters: Vec<ParameterToken>,
        body: Vec<Statement>,
    },
    /// `.model <name> <type> ...`; the name is removed from `parameters`
    Model {
        name: Token,
        parameters: Vec<ParameterToken>,
    },
    /// Any other dot statement; `name` is the word after the dot
    Control {
        name: Token,
        parameters: Vec<ParameterToken>,
    },
}

impl Statement {
    /// The statement's name token.
    pub fn name(&self) -> &Token {
        match self {
            Self::Component { name, .. }
            | Self::Subcircuit { name, .. }
            | Self::Model { name, .. }
            | Self::Control { name, .. } => name,
        }
    }

    /// The statement's parameters.
    pub fn parameters(&self) -> &[ParameterToken] {
        match self {
            Self::Component { parameters, .. }
            | Self::Subcircuit { parameters, .. }
            | Self::Model { parameters, .. }
            | Self::Control { parameters, .. } => parameters,
        }
    }

    /// Nested statements of a subcircuit; empty for everything else.
    pub fn body(&self) -> &[Statement] {
        match self {
            Self::Subcircuit { body, .. } => body,
            _ => &[],
        }
    }

    /// Short name of the statement kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Component { .. } => "component",
            Self::Subcircuit { .. } => "subcircuit",
            Self::Model { .. } => "model",
            Self::Control { .. } => "control",
        }
    }

    /// Source line of the statement's name.
    pub fn line(&self) -> usize {
        self.name().line
    }
}

fn write_parameters(f: &mut fmt::Formatter<'_>, parameters: &[ParameterToken]) -> fmt::Result {
    for parameter in parameters {
        write!(f, " {}", parameter)?;
    }
    Ok(())
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component { name, parameters } => {
                write!(f, "{}", name)?;
                write_parameters(f, parameters)
            }
            Self::Subcircuit {
                name,
                parameters,
                body,
            } => {
                write!(f, ".subckt {}", name)?;
                write_parameters(f, parameters)?;
                writeln!(f)?;
                for statement in body {
                    writeln!(f, "{}", statement)?;
                }
                write!(f, ".ends {}", name)
            }
            Self::Model { name, parameters } => {
                write!(f, ".model {}", name)?;
                write_parameters(f, parameters)
            }
            Self::Control { name, parameters } => {
                write!(f, ".{}", name)?;
                write_parameters(f, parameters)
            }
        }
    }
}

/// Delimiter of a bracketed parameter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `( ... )`
    Paren,
    /// `[ ... ]`
    Bracket,
}

impl Delimiter {
    /// Opening and closing characters.
    pub fn chars(&self) -> (char, char) {
        match self {
            Self::Paren => ('(', ')'),
            Self::Bracket => ('[', ']'),
        }
    }
}

/// A parsed statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterToken {
    /// A single leaf token
    Plain(Token),
    /// `head(children...)` or `head[children...]`
    Bracketed {
        head: Token,
        delimiter: Delimiter,
        children: Vec<ParameterToken>,
    },
    /// `left=right`
    Assignment {
        left: Box<ParameterToken>,
        right: Box<ParameterToken>,
    },
    /// Comma-joined leaves, `a,b,c`
    Vector(Vec<Token>),
}

impl ParameterToken {
    /// The leaf token, if this is a plain parameter.
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Plain(token) => Some(token),
            _ => None,
        }
    }

    /// Name and value of an assignment whose left side is a plain token.
    pub fn as_assignment(&self) -> Option<(&Token, &ParameterToken)> {
        match self {
            Self::Assignment { left, right } => left.as_token().map(|name| (name, right.as_ref())),
            _ => None,
        }
    }

    /// First source token (line, column) of the parameter.
    pub fn begin(&self) -> (usize, usize) {
        match self {
            Self::Plain(token) | Self::Bracketed { head: token, .. } => (token.line, token.column),
            Self::Assignment { left, .. } => left.begin(),
            Self::Vector(tokens) => tokens
                .first()
                .map(|t| (t.line, t.column))
                .unwrap_or((0, 0)),
        }
    }

    /// Start (line, column) of the parameter's last source token.
    ///
    /// Tokens do not record where they end; string tokens keep only their
    /// unescaped text, so the end column cannot be recovered from them.
    pub fn end(&self) -> (usize, usize) {
        match self {
            Self::Plain(token) => (token.line, token.column),
            Self::Bracketed { head, children, .. } => children
                .last()
                .map(|c| c.end())
                .unwrap_or((head.line, head.column)),
            Self::Assignment { right, .. } => right.end(),
            Self::Vector(tokens) => tokens
                .last()
                .map(|t| (t.line, t.column))
                .unwrap_or((0, 0)),
        }
    }
}

impl fmt::Display for ParameterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(token) => write!(f, "{}", token),
            Self::Bracketed {
                head,
                delimiter,
                children,
            } => {
                let (open, close) = delimiter.chars();
                write!(f, "{}{}", head, open)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, "{}", close)
            }
            Self::Assignment { left, right } => write!(f, "{}={}", left, right),
            Self::Vector(tokens) => {
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", token)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::parse_parameter;

    #[test]
    fn test_begin_and_end_span_lines() {
        let parameter = parse_parameter("pulse(0 1\n+ 2n  4n)").unwrap();
        assert_eq!(parameter.begin(), (1, 1));
        assert_eq!(parameter.end(), (2, 7));
    }

    #[test]
    fn test_end_of_assignment_and_vector() {
        let parameter = parse_parameter("ic=1,22,333").unwrap();
        assert_eq!(parameter.begin(), (1, 1));
        assert_eq!(parameter.end(), (1, 9));

        let parameter = parse_parameter("f()").unwrap();
        assert_eq!(parameter.end(), (1, 1));
    }
}
