// Expressions, one per argument or per input line:
//   t | f | !(<expr>) | &(<expr>, ...) | |(<expr>, ...)
// Whitespace is allowed inside the parentheses.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as _;
use descent::{BoolExpr, ParseError, Parser};

/// Boolean expression evaluator.
#[derive(clap::Parser)]
#[command(name = "boolexpr", version, about)]
struct Cli {
    /// Expressions to evaluate; read line by line from --file or stdin if omitted.
    exprs: Vec<String>,

    /// File with one expression per line.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Accept unparsed input after the expression and report it.
    #[arg(long)]
    partial: bool,

    /// Print the grammar before evaluating.
    #[arg(long)]
    show_grammar: bool,

    /// Maximum rule nesting depth.
    #[arg(long, default_value_t = descent::DEFAULT_DEPTH_LIMIT)]
    depth_limit: usize,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut expr = BoolExpr::new()?;
    expr.set_depth_limit(cli.depth_limit);
    if cli.show_grammar {
        let grammar = expr.grammar();
        if let Some(definition) = grammar.target(expr.root()) {
            println!("expr := {}", grammar.describe(definition));
        }
    }

    let inputs = if cli.exprs.is_empty() {
        read_lines(cli.file.as_deref())?
    } else {
        cli.exprs
    };
    let mut failed = 0usize;
    for input in &inputs {
        match evaluate(&expr, input, cli.partial) {
            Ok(result) => println!("{input} => {result}"),
            Err(error) => {
                failed += 1;
                eprintln!("{input} => error: {error}");
            }
        }
    }
    log::info!("evaluated {} expressions, {failed} failed", inputs.len());
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn evaluate(expr: &BoolExpr, input: &str, partial: bool) -> Result<String, ParseError> {
    if !partial {
        return expr.evaluate(input).map(|value| value.to_string());
    }
    let (remaining, value) = expr.parse(input)?;
    Ok(if remaining.is_empty() {
        value.to_string()
    } else {
        format!("{value} (unparsed: {remaining:?})")
    })
}

/// Non-blank lines of `file`, or of stdin without one
fn read_lines(file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let lines = match file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open '{}': {}", path.display(), e))?;
            BufReader::new(file).lines().collect::<Result<Vec<_>, _>>()?
        }
        None => std::io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?,
    };
    Ok(lines
        .into_iter()
        .map(|line| line.trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect())
}
