use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use wires_core::lexer::tokenize;
use wires_core::parser::parse;
use wires_core::{CoreError, Diagnostic, Graph, Order};

/// Evaluate a wire circuit description and print the resulting signals.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(value_name = "FILE", help = "Circuit description to evaluate (`-` reads stdin)")]
    input: String,

    #[arg(value_name = "WIRE", help = "Wires to report, in this order (defaults to all wires)")]
    wires: Vec<String>,

    #[arg(
        long,
        value_enum,
        default_value_t = ListOrder::Name,
        help = "Order used when every wire is reported"
    )]
    order: ListOrder,

    #[arg(long, conflicts_with = "ast", help = "Print the token stream and exit")]
    tokens: bool,

    #[arg(long, help = "Print the parsed schematic tree and exit")]
    ast: bool,

    #[arg(short, long, help = "Report stage summaries on stderr")]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ListOrder {
    /// Ascending wire name
    Name,
    /// First mention in the source
    Source,
}

impl From<ListOrder> for Order {
    fn from(order: ListOrder) -> Self {
        match order {
            ListOrder::Name => Order::Name,
            ListOrder::Source => Order::Source,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let source = read_source(&cli.input)?;
    let fail = |err: CoreError| anyhow!(Diagnostic::from(&err).render(&source));

    let tokens = tokenize(&source).map_err(|err| fail(err.into()))?;
    if cli.verbose {
        eprintln!("lexed {} tokens", tokens.len());
    }
    if cli.tokens {
        let mut out = io::stdout().lock();
        for token in &tokens {
            writeln!(out, "{token}")?;
        }
        return Ok(());
    }

    let schematic = parse(tokens).map_err(|err| fail(err.into()))?;
    if cli.verbose {
        eprintln!("parsed {} statements", schematic.statements.len());
    }
    if cli.ast {
        print!("{schematic}");
        return Ok(());
    }

    let mut graph = Graph::build(&schematic).map_err(|err| fail(err.into()))?;
    if cli.verbose {
        eprintln!("built graph with {} wires", graph.len());
    }

    if !cli.wires.is_empty() && cli.order != ListOrder::Name {
        let warning = Diagnostic::warning("--order is ignored when wires are listed", None);
        eprint!("{}", warning.render(&source));
    }
    let resolved = if cli.wires.is_empty() {
        graph.resolve_all(cli.order.into())
    } else {
        graph.resolve_wires(&cli.wires)
    };
    let values = resolved.map_err(|err| fail(err.into()))?;
    if cli.verbose {
        eprintln!(
            "resolved {} wires with {} gate evaluations",
            values.len(),
            graph.gate_evaluations()
        );
    }

    let mut out = io::stdout().lock();
    for (name, value) in values {
        writeln!(out, "{name}: {value}")?;
    }
    Ok(())
}

fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read circuit from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read input file {path}"))
}
