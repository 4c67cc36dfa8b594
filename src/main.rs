//! Command-line entry point. With no flags, runs the UCI loop over
//! stdin/stdout. `--perft`/`--search` instead run a one-shot command
//! against `--fen` (or the starting position) and print a single-line
//! result, which is convenient for scripting and debugging without a UCI
//! GUI.

use std::io;
use std::time::Instant;

use clap::Parser;
use talon::chess::moves::Move;
use talon::chess::position::Position;
use talon::search::{self, SearchLimits};
use talon::Engine;

#[derive(Parser, Debug)]
#[command(version, about = "A UCI-compatible bitboard chess engine")]
struct Cli {
    /// Run the UCI loop over stdin/stdout. Implied when no other action
    /// flag is given; only useful to force the loop when `--fen` is also
    /// given (which otherwise just prints the loaded position).
    #[arg(long)]
    uci: bool,

    /// Load a position from FEN instead of the starting position.
    #[arg(long, value_name = "FEN")]
    fen: Option<String>,

    /// Run perft to the given depth from the loaded position and print the
    /// node count instead of starting the UCI loop.
    #[arg(long, value_name = "DEPTH")]
    perft: Option<u32>,

    /// Search the loaded position to the given depth and print the best
    /// move instead of starting the UCI loop.
    #[arg(long, value_name = "DEPTH")]
    search: Option<u8>,

    /// Bound `--search` by wall-clock time in milliseconds, in addition to
    /// (or instead of) `--search`'s depth.
    #[arg(long, value_name = "MS")]
    search_time: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = parse_cli_or_exit();
    let fen_given = cli.fen.is_some();

    let position = match cli.fen {
        Some(fen) => match Position::from_fen(&talon::util::sanitize_fen(&fen)) {
            Ok(position) => position,
            Err(error) => {
                eprintln!("error: {error}");
                std::process::exit(1);
            },
        },
        None => Position::starting(),
    };

    if let Some(depth) = cli.perft {
        run_perft(position, depth);
        return Ok(());
    }

    if cli.search.is_some() || cli.search_time.is_some() {
        run_search(position, cli.search, cli.search_time);
        return Ok(());
    }

    if fen_given && !cli.uci {
        print!("{position:?}");
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    Engine::new(position, &mut input, &mut output).run()
}

/// Parses CLI arguments, exiting with code `0` for `--help`/`--version`
/// and code `1` for a genuine argument error, rather than clap's default
/// exit code `2`.
fn parse_cli_or_exit() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // `error.print()` writes help/version text to stdout and
            // genuine usage errors to stderr, matching clap's own
            // stream convention.
            let _ = error.print();
            match error.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    std::process::exit(0)
                },
                _ => std::process::exit(1),
            }
        },
    }
}

fn run_perft(mut position: Position, depth: u32) {
    let started = Instant::now();
    let nodes = position.perft(depth);
    let elapsed = started.elapsed();
    println!("nodes {nodes}");
    println!("elapsed {:.3}s", elapsed.as_secs_f64());
}

fn run_search(mut position: Position, depth: Option<u8>, search_time: Option<u64>) {
    let limits =
        SearchLimits { max_depth: depth.unwrap_or(0), time_ms: search_time.unwrap_or(0), ..SearchLimits::default() };
    let result = search::search(&mut position, limits);
    let rendered = result.best_move.map_or_else(|| "0000".to_string(), Move::to_uci);
    println!("bestmove {rendered}");
    println!("info depth {} score cp {} nodes {}", result.depth_reached, result.score, result.nodes_visited);
}
