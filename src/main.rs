//! netlist - SPICE netlist inspector
//!
//! Parses a netlist, applies its top-level `.param` statements and prints the
//! normalized netlist, the statement tree, the parameter table, or the value
//! of an expression.
//!
//! # Usage
//!
//! ```bash
//! netlist amp.cir --params -D vdd=5
//! netlist amp.cir --eval "vdd / 2"
//! RUST_LOG=netlist_core=debug netlist amp.cir --tree
//! ```

use std::path::PathBuf;

use clap::Parser;
use netlist_core::{
    error::Result,
    expression::{evaluate, ParameterTable},
    netlist::{self, Token, TokenKind},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Parse and inspect SPICE netlists
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file
    #[arg(value_name = "NETLIST")]
    netlist: PathBuf,

    /// Define a parameter before `.param` statements are applied
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE", value_parser = parse_define)]
    defines: Vec<(String, f64)>,

    /// Evaluate an expression against the netlist parameters
    #[arg(long, value_name = "EXPR")]
    eval: Option<String>,

    /// Print the evaluated parameter table
    #[arg(long)]
    params: bool,

    /// Print the statement tree instead of the normalized netlist
    #[arg(long)]
    tree: bool,
}

fn parse_define(text: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", text))?;
    let value = evaluate(value, &ParameterTable::new()).map_err(|e| e.to_string())?;
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let ast = netlist::parse_file(&args.netlist)?;
    info!(
        path = %args.netlist.display(),
        statements = ast.statements.len(),
        "parsed netlist"
    );

    let mut params: ParameterTable = args.defines.into_iter().collect();
    for statement in ast.controls("param") {
        params.apply_param_statement(statement)?;
    }

    if let Some(expression) = &args.eval {
        // Position errors as if the expression were a one-line netlist literal
        let literal = Token::new(TokenKind::Expression, expression.as_str(), 1, 1);
        let value = literal.resolve(&params)?;
        println!("{}", value);
        return Ok(());
    }

    if args.params {
        for (name, value) in params.merged() {
            println!("{} = {}", name, value);
        }
        return Ok(());
    }

    if args.tree {
        println!("{:#?}", ast);
    } else {
        print!("{}", ast);
    }

    Ok(())
}
