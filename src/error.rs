//! Error types for netlist parsing and expression evaluation.
//!
//! [`NetlistError`] covers everything that can go wrong while lexing and
//! parsing a netlist document. [`EvalError`] covers the expression language;
//! it is returned as-is by [`crate::expression`] and wrapped with the source
//! position of the offending token when a netlist token is resolved.

use thiserror::Error;

/// Result type alias using [`NetlistError`].
pub type Result<T> = std::result::Result<T, NetlistError>;

/// Broad classification of a [`NetlistError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unrecognized character sequence or unterminated literal
    Lex,
    /// Grammar violation or structural malformation
    Syntax,
    /// Expression evaluation failure
    Eval,
    /// File access (CLI only)
    Io,
}

/// Error type for netlist lexing and parsing.
#[derive(Error, Debug)]
pub enum NetlistError {
    // ============ Lexical Errors ============
    /// Unrecognized character sequence or unterminated literal
    #[error("Lexer error at line {line}, column {column} near '{text}': {message}")]
    Lexer {
        line: usize,
        column: usize,
        text: String,
        message: String,
    },

    // ============ Syntax Errors ============
    /// Unexpected token where a specific construct was required
    #[error("Syntax error at line {line}, column {column} near '{lexeme}': {message}")]
    Syntax {
        line: usize,
        column: usize,
        lexeme: String,
        message: String,
    },

    /// `.model` line with fewer than two parameters or an invalid name
    #[error("Malformed model at line {line}, column {column}: expected a name and a type, got {found} parameter(s)")]
    MalformedModel {
        line: usize,
        column: usize,
        found: usize,
    },

    /// `.subckt` without a matching `.ends`
    #[error("Subcircuit '{name}' opened at line {line}, column {column} is never closed with .ends")]
    UnterminatedSubcircuit {
        name: String,
        line: usize,
        column: usize,
    },

    /// `.ends` outside any subcircuit definition
    #[error("Unmatched .ends at line {line}, column {column}")]
    UnmatchedEnds { line: usize, column: usize },

    // ============ Value Resolution Errors ============
    /// Expression literal failed to evaluate
    #[error("Expression error at line {line}, column {column}: {source}")]
    Eval {
        line: usize,
        column: usize,
        #[source]
        source: EvalError,
    },

    /// Token is neither a value nor an expression literal
    #[error("Value or expression expected at line {line}, column {column}, found '{lexeme}'")]
    NotNumeric {
        lexeme: String,
        line: usize,
        column: usize,
    },

    // ============ I/O Errors ============
    /// Error reading a netlist file
    #[cfg(feature = "cli")]
    #[error("Failed to read netlist file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl NetlistError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Lexer {
            line,
            column,
            text: text.into(),
            message: message.into(),
        }
    }

    /// Create a syntax error
    pub fn syntax(line: usize, column: usize, lexeme: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            column,
            lexeme: lexeme.into(),
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lexer { .. } => ErrorKind::Lex,
            Self::Syntax { .. }
            | Self::MalformedModel { .. }
            | Self::UnterminatedSubcircuit { .. }
            | Self::UnmatchedEnds { .. } => ErrorKind::Syntax,
            Self::Eval { .. } | Self::NotNumeric { .. } => ErrorKind::Eval,
            #[cfg(feature = "cli")]
            Self::FileRead { .. } => ErrorKind::Io,
        }
    }

    /// Source line of the error, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lexer { line, .. }
            | Self::Syntax { line, .. }
            | Self::MalformedModel { line, .. }
            | Self::UnterminatedSubcircuit { line, .. }
            | Self::UnmatchedEnds { line, .. }
            | Self::Eval { line, .. }
            | Self::NotNumeric { line, .. } => Some(*line),
            #[cfg(feature = "cli")]
            Self::FileRead { .. } => None,
        }
    }
}

/// Error type for the expression language.
///
/// Columns are 1-indexed offsets into the expression text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Identifier not present in the symbol table
    #[error("Could not find parameter \"{name}\" (column {column})")]
    UnknownParameter { name: String, column: usize },

    /// Call to a function outside the built-in table
    #[error("Unrecognized function \"{name}\" (column {column})")]
    UnknownFunction { name: String, column: usize },

    /// Built-in called with the wrong number of arguments
    #[error("{function} expects {expected} argument(s), got {found} (column {column})")]
    Arity {
        function: String,
        expected: String,
        found: usize,
        column: usize,
    },

    /// Grammar violation inside the expression
    #[error("Syntax error at column {column}: {message}")]
    Syntax { column: usize, message: String },

    /// Numeric literal that does not match the literal grammar
    #[error("Invalid numeric literal '{text}' (column {column})")]
    InvalidNumber { text: String, column: usize },
}

impl EvalError {
    /// Create an expression syntax error
    pub fn syntax(column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            column,
            message: message.into(),
        }
    }

    /// Column of the offending construct within the expression text.
    pub fn column(&self) -> usize {
        match self {
            Self::UnknownParameter { column, .. }
            | Self::UnknownFunction { column, .. }
            | Self::Arity { column, .. }
            | Self::Syntax { column, .. }
            | Self::InvalidNumber { column, .. } => *column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(NetlistError::lexer(1, 2, "$", "unexpected").kind(), ErrorKind::Lex);
        assert_eq!(NetlistError::syntax(1, 2, "=", "unexpected").kind(), ErrorKind::Syntax);
        assert_eq!(
            NetlistError::UnmatchedEnds { line: 4, column: 1 }.kind(),
            ErrorKind::Syntax
        );
        let eval = NetlistError::Eval {
            line: 3,
            column: 9,
            source: EvalError::syntax(1, "bad"),
        };
        assert_eq!(eval.kind(), ErrorKind::Eval);
        assert_eq!(eval.line(), Some(3));
    }

    #[test]
    fn test_messages_carry_position() {
        let err = NetlistError::syntax(7, 12, ")", "expected parameter");
        let message = err.to_string();
        assert!(message.contains("line 7"));
        assert!(message.contains("column 12"));
        assert!(message.contains("')'"));
    }
}
