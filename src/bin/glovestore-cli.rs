//! GLOVESTORE CLI
//!
//! Loads a word vector file and answers nearest-neighbor queries,
//! one-shot or from an interactive shell.

use clap::{Parser, Subcommand};
use glovestore::{
    BatchConfig, Compression, DuplicatePolicy, Metric, Neighbor, QueryEngine, StoreConfig,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// GLOVESTORE CLI - Word Vector Nearest Neighbors
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Word vector file (`<word> <c1> ... <cD>` per line)
    path: PathBuf,

    /// Maximum number of vectors to load
    #[arg(short, long, default_value_t = 20_000)]
    capacity: usize,

    /// Components per vector
    #[arg(short, long, default_value_t = 200)]
    dimension: usize,

    /// File encoding
    #[arg(long, value_enum, default_value_t = Compression::Auto)]
    compression: Compression,

    /// Handling of repeated words
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Reject)]
    duplicates: DuplicatePolicy,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Words nearest to WORD
    Nearest {
        word: String,

        /// Number of results
        #[arg(short, default_value_t = 10)]
        n: usize,

        #[arg(short, long, value_enum, default_value_t = Metric::Cosine)]
        metric: Metric,
    },

    /// Print the vector of WORD
    Vector { word: String },

    /// Nearest neighbors for every word in FILE (one per line)
    Batch {
        file: PathBuf,

        /// Number of results per word
        #[arg(short, default_value_t = 10)]
        n: usize,

        #[arg(short, long, value_enum, default_value_t = Metric::Cosine)]
        metric: Metric,

        /// Worker threads (0 = auto-detect based on CPU cores)
        #[arg(long, default_value_t = 0)]
        workers: usize,
    },

    /// Interactive query shell
    Shell,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("glovestore=info".parse()?))
        .init();

    let args = Args::parse();

    let config = StoreConfig::new(args.capacity, args.dimension)
        .with_compression(args.compression)
        .with_duplicates(args.duplicates);

    let engine = QueryEngine::open(&args.path, &config)?;
    let report = engine.store().report();
    info!(
        "Store ready: {} words, {} records read{}",
        report.loaded,
        report.consumed,
        if report.at_capacity { " (capacity reached)" } else { "" }
    );

    match args.command {
        Cmd::Nearest { word, n, metric } => {
            print_neighbors(&engine.nearest_to_word(&word, n, metric)?);
        }

        Cmd::Vector { word } => {
            print_vector(engine.vector_of(&word)?);
        }

        Cmd::Batch {
            file,
            n,
            metric,
            workers,
        } => {
            let contents = fs::read_to_string(&file)?;
            let words: Vec<&str> = contents
                .lines()
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .collect();

            let batch = BatchConfig::default()
                .with_workers(workers)
                .with_n(n)
                .with_metric(metric);

            for (word, result) in words.iter().zip(engine.nearest_to_words(words.as_slice(), &batch)?) {
                println!("== {}", word);
                match result {
                    Ok(neighbors) => print_neighbors(&neighbors),
                    Err(e) => println!("  {}", e),
                }
            }
            eprintln!("{}", engine.metrics().summary());
        }

        Cmd::Shell => run_shell(&engine)?,
    }

    Ok(())
}

/// Commands understood by the interactive shell
#[derive(Debug, PartialEq)]
enum ShellCommand {
    Nearest { word: String, n: usize, metric: Metric },
    Vector { word: String },
    Stats,
}

fn run_shell(engine: &QueryEngine) -> anyhow::Result<()> {
    println!(
        "{} words loaded. Type 'help' for available commands, 'quit' to exit.\n",
        engine.store().len()
    );

    loop {
        print!("glove> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        match parse_command(input) {
            Ok(ShellCommand::Nearest { word, n, metric }) => {
                match engine.nearest_to_word(&word, n, metric) {
                    Ok(neighbors) => print_neighbors(&neighbors),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Ok(ShellCommand::Vector { word }) => match engine.vector_of(&word) {
                Ok(vector) => print_vector(vector),
                Err(e) => eprintln!("Error: {}", e),
            },
            Ok(ShellCommand::Stats) => println!("{}", engine.metrics().summary()),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn parse_command(input: &str) -> anyhow::Result<ShellCommand> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.is_empty() {
        anyhow::bail!("Empty command");
    }

    let cmd = parts[0].to_uppercase();

    match cmd.as_str() {
        "NEAREST" | "EUCLID" => {
            if parts.len() < 2 {
                anyhow::bail!("{} requires a word: {} <word> [n]", cmd, cmd);
            }
            let n = if parts.len() > 2 {
                parts[2].parse::<usize>()?
            } else {
                10
            };
            let metric = if cmd == "EUCLID" {
                Metric::Euclidean
            } else {
                Metric::Cosine
            };
            Ok(ShellCommand::Nearest {
                word: parts[1].to_string(),
                n,
                metric,
            })
        }

        "VEC" => {
            if parts.len() < 2 {
                anyhow::bail!("VEC requires a word: VEC <word>");
            }
            Ok(ShellCommand::Vector {
                word: parts[1].to_string(),
            })
        }

        "STATS" => Ok(ShellCommand::Stats),

        _ => anyhow::bail!("Unknown command: {}. Type 'help' for available commands.", cmd),
    }
}

fn print_neighbors(neighbors: &[Neighbor<'_>]) {
    for (rank, neighbor) in neighbors.iter().enumerate() {
        println!("  {:>3}. {:<24} {:.6}", rank + 1, neighbor.word, neighbor.score);
    }
}

fn print_vector(vector: &[f32]) {
    let formatted: Vec<String> = vector.iter().map(|c| format!("{:.6}", c)).collect();
    println!("[{}]", formatted.join(", "));
}

fn print_help() {
    println!(
        r#"
Available commands:

  NEAREST <word> [n]  - Words most similar to <word> by cosine similarity
  EUCLID <word> [n]   - Words nearest to <word> by Euclidean distance
  VEC <word>          - Print the vector of <word>
  STATS               - Query counters and latency

  help                - Show this help
  quit / exit         - Exit the shell

Examples:
  NEAREST frog
  EUCLID king 5
  VEC paris
"#
    );
}
