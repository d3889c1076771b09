//! Grades sudokus by solving them logically.
//!
//! Reads puzzles in line format, one per line, from the given files or stdin and
//! prints the rating of every puzzle next to it.
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;
use sudoku_logic::analysis::{Analyzer, AnalyzerConfig, Outcome};
use sudoku_logic::Grid;
use tracing::{error, Level};

#[derive(Parser)]
#[command(name = "sudoku-grade")]
#[command(about = "Rates sudokus by the hardest technique needed to solve them")]
struct Cli {
    /// Files with one puzzle per line. Reads stdin if none are given.
    files: Vec<PathBuf>,
    /// Print every step of the solution
    #[arg(long, short = 's')]
    steps: bool,
    /// Skip slow techniques
    #[arg(long)]
    ignore_slow: bool,
    /// Largest basic fish to search for
    #[arg(long, default_value_t = 4)]
    max_fish_size: u8,
    /// Maximum number of nodes in a chain
    #[arg(long, default_value_t = 20)]
    max_chain_length: usize,
    /// Place a digit from the solution when no technique applies
    #[arg(long)]
    brute_force: bool,
    /// Log applied steps, repeat for state transitions
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = AnalyzerConfig::default()
        .with_ignore_slow(cli.ignore_slow)
        .with_max_fish_size(cli.max_fish_size)
        .with_max_chain_length(cli.max_chain_length)
        .with_brute_force_fallback(cli.brute_force);
    let analyzer = Analyzer::new(config);

    let result = match cli.files.is_empty() {
        true => grade_all(&analyzer, io::stdin().lock(), cli.steps),
        false => cli.files.iter().try_for_each(|path| {
            let file = File::open(path)?;
            grade_all(&analyzer, BufReader::new(file), cli.steps)
        }),
    };
    if let Err(err) = result {
        error!("{}", err);
        process::exit(1);
    }
}

fn grade_all(analyzer: &Analyzer, input: impl BufRead, print_steps: bool) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let grid = match Grid::from_str_line(line) {
            Ok(grid) => grid,
            Err(err) => {
                error!(%line, "{}", err);
                continue;
            }
        };

        let result = analyzer.analyze(&grid);
        let status = match result.outcome() {
            Outcome::Solved => "solved".to_string(),
            Outcome::Stuck => "stuck".to_string(),
            Outcome::Cancelled => "cancelled".to_string(),
            Outcome::Failed(reason) => format!("failed: {}", reason),
        };
        let hardest = result
            .hardest_step()
            .map_or("-", |step| step.technique().name());
        println!("{}\t{}\t{}\t{}", grid.to_str_line(), result.max_difficulty(), hardest, status);
        if print_steps {
            for step in result.steps() {
                println!("  {}", step);
            }
        }
    }
    Ok(())
}
