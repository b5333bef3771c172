use clap::{Parser as ClapParser, Subcommand};
use sprig_query::cli::{self, CheckOptions, CheckResult, CliError, RunOptions};
use sprig_query::output::{to_json, to_json_pretty};
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "sprig")]
#[command(about = "Sprig - parse nested selection queries and resolve them against JSON stores")]
#[command(version)]
struct Cli {
    /// Log parser and executor activity to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a query and print its selection tree
    Check {
        /// The query (reads from stdin if not provided)
        query: Option<String>,

        /// Print the token stream instead of the tree
        #[arg(long)]
        tokens: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Maximum nesting depth of field groups
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Resolve a query against stores loaded from a JSON data file
    Run {
        /// The query (reads from stdin if not provided)
        query: Option<String>,

        /// JSON file mapping store names to records keyed by id
        #[arg(short, long)]
        data: PathBuf,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Maximum nesting depth of field groups
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            query,
            tokens,
            pretty,
            max_depth,
        } => run_check(query, tokens, pretty, max_depth),
        Commands::Run {
            query,
            data,
            pretty,
            max_depth,
        } => run_run(query, data, pretty, max_depth),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "sprig_query=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_query(query: Option<String>) -> Result<String, CliError> {
    match query {
        Some(q) => Ok(q),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer.trim().to_string())
        }
        None => Err(CliError::NoQuery),
    }
}

fn run_check(
    query: Option<String>,
    tokens: bool,
    pretty: bool,
    max_depth: Option<usize>,
) -> Result<(), CliError> {
    let options = CheckOptions {
        query: read_query(query)?,
        max_depth,
        tokens,
    };

    match cli::execute_check(&options)? {
        CheckResult::Tokens(tokens) => {
            for token in tokens {
                println!("{}", token);
            }
        }
        CheckResult::Tree(tree) => {
            let json = if pretty {
                serde_json::to_string_pretty(&tree)?
            } else {
                serde_json::to_string(&tree)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_run(
    query: Option<String>,
    data: PathBuf,
    pretty: bool,
    max_depth: Option<usize>,
) -> Result<(), CliError> {
    let options = RunOptions {
        query: read_query(query)?,
        data,
        max_depth,
    };

    let record = cli::execute_run(&options)?;
    if pretty {
        println!("{}", to_json_pretty(&record));
    } else {
        println!("{}", to_json(&record));
    }
    Ok(())
}
