//! # Netlist Core
//!
//! A front end for SPICE circuit netlists.
//!
//! This library provides:
//! - A lexer and recursive-descent parser producing a typed statement tree
//! - An evaluator for the `{...}` arithmetic expressions netlists embed
//! - Unit-suffixed numeric literals (`10k`, `2.5meg`, `100n`)
//! - Scoped parameter tables for resolving `.param` definitions
//!
//! ## Architecture
//!
//! - [`netlist`] - Lexer, parser and AST for netlist documents
//! - [`expression`] - Expression parser, evaluator and built-in functions
//! - [`units`] - Numeric literals with SPICE scale suffixes
//! - [`error`] - Error types shared by the modules above
//!
//! ## Usage
//!
//! ```
//! use netlist_core::{netlist, ParameterTable};
//!
//! let ast = netlist::parse(".param rval=2k\nR1 in out {rval * 2}\n").unwrap();
//!
//! let mut params = ParameterTable::new();
//! for statement in ast.controls("param") {
//!     params.apply_param_statement(statement).unwrap();
//! }
//!
//! let resistance = ast.statements[1].parameters()[2].resolve(&params).unwrap();
//! assert_eq!(resistance, 4000.0);
//! ```
//!
//! The parser never evaluates expressions. Expression literals stay as text
//! in the tree until a consumer resolves them against its own symbols.

pub mod error;
pub mod expression;
pub mod netlist;
pub mod units;

// Re-export main types for convenience
pub use error::{EvalError, NetlistError, Result};
pub use expression::{evaluate, ParameterTable, Symbols};
pub use netlist::{parse, NetlistAst, ParameterToken, Statement};
