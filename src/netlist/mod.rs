//! Parser for SPICE netlists.
//!
//! Netlists are line-oriented. Each logical line is one statement; a line that
//! starts with `+` continues the previous one. Lines whose first non-blank
//! character is `*` are comments.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { statement | newline } [ '.end' ]
//! statement   = subcircuit | model | control | component
//! subcircuit  = '.subckt' name { parameter } newline { statement } '.ends' [name]
//! model       = '.model' name parameter { parameter }
//! control     = '.' word { parameter }
//! component   = word { parameter }
//!
//! parameter   = leaf [ group ] [ '=' value ]
//! group       = ('(' | '[') { parameter [','] } (')' | ']')
//! value       = leaf { ',' leaf }
//! leaf        = word | value | string | identifier | reference | expression
//! ```
//!
//! # Statements
//!
//! | Kind | Example |
//! |------|---------|
//! | Component | `R1 in out 10k` |
//! | Subcircuit | `.subckt amp in out gain=2` ... `.ends amp` |
//! | Model | `.model dmod d is=1e-14 n=1.05` |
//! | Control | `.tran 1n 100n`, `.param vdd=3.3` |
//!
//! # Example
//!
//! ```text
//! * RC low-pass
//! .param rval=1k
//! V1 in 0 pulse(0 1 0 1n 1n
//! + 5u 10u)
//! R1 in out {rval * 10}
//! C1 out 0 100n
//! .tran 1n 20u
//! .end
//! ```

mod ast;
mod lexer;
mod parser;
mod values;

pub use ast::*;
pub use lexer::{Lexer, Punct, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<NetlistAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a single parameter such as `r1(a,b)=5`.
pub fn parse_parameter(input: &str) -> Result<ParameterToken> {
    let mut parser = Parser::new(Lexer::new(input))?;
    parser.parse_single_parameter()
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<NetlistAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::NetlistError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetlistError;

    #[test]
    fn test_subcircuit_nesting() {
        let input = "\
.subckt outer a b
R1 a mid 1k
.subckt inner x y
C1 x y 1p
.ends inner
X1 mid b inner
.ends outer
V1 1 0 5
";
        let ast = parse(input).unwrap();
        assert_eq!(ast.statements.len(), 2);

        let outer = ast.subcircuit("OUTER").unwrap();
        assert_eq!(outer.parameters().len(), 2);
        assert_eq!(outer.body().len(), 3);
        assert_eq!(outer.body()[1].kind_name(), "subcircuit");
        assert_eq!(outer.body()[1].body().len(), 1);
        assert_eq!(ast.statements[1].name().text, "V1");
    }

    #[test]
    fn test_unterminated_inner_subcircuit() {
        let input = ".subckt outer a\n.subckt inner b\nR1 a b 1\n.ends outer\n";
        let err = parse(input).unwrap_err();
        assert!(matches!(err, NetlistError::Syntax { line: 4, .. }));

        let err = parse(".subckt outer a\n.subckt inner b\nR1 a b 1\n.ends inner\n").unwrap_err();
        match err {
            NetlistError::UnterminatedSubcircuit { name, line, .. } => {
                assert_eq!(name, "outer");
                assert_eq!(line, 1);
            }
            other => panic!("expected unterminated subcircuit, got {other:?}"),
        }
    }

    #[test]
    fn test_ends_without_name() {
        let ast = parse(".subckt buf in out\nE1 out 0 in 0 1\n.ends\n").unwrap();
        assert_eq!(ast.statements[0].body().len(), 1);
    }

    #[test]
    fn test_unmatched_ends() {
        let err = parse("R1 a b 1\n.ends\n").unwrap_err();
        assert!(matches!(err, NetlistError::UnmatchedEnds { line: 2, column: 1 }));
    }

    #[test]
    fn test_continuation_lines() {
        let input = "V1 in 0 pulse(0 1\n+ 0 1n\n* rise and fall\n+ 1n) dc=0\nR1 in 0 1k\n";
        let ast = parse(input).unwrap();
        assert_eq!(ast.statements.len(), 2);

        let parameters = ast.statements[0].parameters();
        assert_eq!(parameters.len(), 4);
        match &parameters[2] {
            ParameterToken::Bracketed { children, .. } => assert_eq!(children.len(), 5),
            other => panic!("expected bracketed group, got {other:?}"),
        }
        assert!(parameters[3].as_assignment().is_some());
    }

    #[test]
    fn test_model_name_extraction() {
        let ast = parse(".model dmod d(is=1e-14 n=1.05)").unwrap();
        match &ast.statements[0] {
            Statement::Model { name, parameters } => {
                assert_eq!(name.text, "dmod");
                assert_eq!(parameters.len(), 1);
                assert!(matches!(parameters[0], ParameterToken::Bracketed { .. }));
            }
            other => panic!("expected model, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_model() {
        let err = parse(".model dmod").unwrap_err();
        assert!(matches!(err, NetlistError::MalformedModel { found: 1, .. }));

        let err = parse(".model \"dmod\" d is=1e-14").unwrap_err();
        match err {
            NetlistError::Syntax { lexeme, column, .. } => {
                assert_eq!(lexeme, "\"dmod\"");
                assert_eq!(column, 8);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_numeric_looking_names() {
        let input = ".subckt 555timer trig out\nR1 trig out 1k\n.ends 555timer\nX1 a b 555timer";
        let ast = parse(input).unwrap();
        assert_eq!(ast.subcircuit("555TIMER").map(|s| s.body().len()), Some(1));

        let ast = parse(".model 1mf d is=1e-14").unwrap();
        match &ast.statements[0] {
            Statement::Model { name, parameters } => {
                assert_eq!(name.text, "1mf");
                assert_eq!(parameters.len(), 2);
            }
            other => panic!("expected model, got {other:?}"),
        }
    }

    #[test]
    fn test_model_with_signed_exponent() {
        let ast = parse(".model d1 d is=2.5e+2").unwrap();
        let parameters = ast.statements[0].parameters();
        assert_eq!(parameters.len(), 2);
        let (name, value) = parameters[1].as_assignment().unwrap();
        assert_eq!(name.text, "is");
        let value = value.as_token().and_then(|t| t.number()).map(|n| n.value());
        assert_eq!(value, Some(250.0));
    }

    #[test]
    fn test_end_stops_parsing() {
        let ast = parse("R1 a b 1\n.end\nthis is ignored (\n").unwrap();
        assert_eq!(ast.statements.len(), 1);
    }

    #[test]
    fn test_blank_lines_and_comments() {
        let ast = parse("\n\n* title\n   \nR1 a b 1\r\n\r\n* done\n").unwrap();
        assert_eq!(ast.statements.len(), 1);
        assert_eq!(parse("").unwrap(), NetlistAst::new());
    }

    #[test]
    fn test_control_statements() {
        let ast = parse(".tran 1n 100n\n.param a=1 b={a+1}\n.PARAM c=3").unwrap();
        assert_eq!(ast.controls("param").count(), 2);
        assert_eq!(ast.controls("tran").next().map(|s| s.parameters().len()), Some(2));
    }

    #[test]
    fn test_display_is_idempotent() {
        let input = "\
* amplifier
.param vdd=3.3 ic=1,2
.subckt amp in out gain={2*vdd}
M1 out in 0 0 nmos w=1u l=180n
.ends amp
V1 in 0 pulse(0 1 0 1n
+ 1n 5u 10u)
.model nmos nmos(level=1 vto=0.7)
.print tran v(out) @m1[gm] \"label \\\"a\\\"\"
";
        let first = parse(input).unwrap().to_string();
        let second = parse(&first).unwrap().to_string();
        assert_eq!(first, second);
        assert!(first.contains(".subckt amp in out gain={2*vdd}\n"));
        assert!(first.contains("V1 in 0 pulse(0, 1, 0, 1n, 1n, 5u, 10u)\n"));
        assert!(first.contains(".model nmos nmos(level=1, vto=0.7)\n"));
    }

    #[test]
    fn test_parse_parameter() {
        let parameter = parse_parameter("v(out,0)").unwrap();
        assert_eq!(parameter.to_string(), "v(out, 0)");
        assert!(parse_parameter("a b").is_err());
    }
}
