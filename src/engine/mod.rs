//! The engine puts the core pieces together behind a [Universal Chess
//! Interface] (UCI) text loop: read a line, parse it into a [`uci::Command`],
//! dispatch it against the owned [`Position`], write the response.
//!
//! The loop is synchronous and single-threaded by design (see
//! `DESIGN.md`): a `go` blocks the reader until the search returns, matching
//! the documented (rather than backgrounded) resolution of the concurrent
//! `isready`/`stop` open question. `stop` is still wired through an
//! [`AtomicBool`] so a future threaded `go` can reuse it without changing
//! this module's public surface.
//!
//! [Universal Chess Interface]: https://www.chessprogramming.org/UCI

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::chess::moves::Move;
use crate::chess::position::Position;
use crate::engine::uci::Command;
use crate::search::{self, SearchLimits};

mod uci;

/// A default depth substituted for `go infinite` in this synchronous
/// engine, which cannot service a `stop` command while a search is
/// in-flight on the same thread that reads it. Deeper than the UCI-default
/// search depth (see `search::DEFAULT_DEPTH`) since `infinite` signals the
/// caller wants a stronger search, but still bounded so the engine returns
/// in practice.
const INFINITE_GO_DEPTH: u8 = 6;

/// Drives the UCI text loop: owns the search root [`Position`] and the I/O
/// streams the protocol is read from / written to.
pub struct Engine<'a, R: BufRead, W: Write> {
    position: Position,
    debug: bool,
    stop: Arc<AtomicBool>,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates an engine rooted at `position`, reading UCI commands from
    /// `input` and writing responses to `output`.
    #[must_use]
    pub fn new(position: Position, input: &'a mut R, output: &'a mut W) -> Self {
        Self { position, debug: false, stop: Arc::new(AtomicBool::new(false)), input, output }
    }

    /// Runs the UCI loop until `quit` is received or the input stream is
    /// exhausted (EOF). Every response line is flushed immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from `input` or writing to `output`
    /// fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            tracing::debug!(command = trimmed, "uci command received");
            if self.debug {
                writeln!(self.output, "info string received: {trimmed}")?;
            }
            if !self.dispatch(Command::parse(trimmed))? {
                break;
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Executes a single parsed command. Returns `Ok(false)` when the loop
    /// should stop (`quit`).
    fn dispatch(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Uci => self.handshake()?,
            Command::Debug { on } => self.debug = on,
            Command::IsReady => writeln!(self.output, "readyok")?,
            Command::SetOption { name, value } => {
                // Non-goal: no tunable evaluation/search parameters exist.
                // UCI permits engines to silently ignore options they don't
                // recognize; matching that rather than rejecting the line
                // keeps GUIs that always send a boilerplate `setoption`
                // round from treating this engine as non-compliant.
                tracing::info!(option = %name, value = ?value, "setoption acknowledged but inert");
            },
            Command::SetPosition { fen, moves } => self.set_position(fen, moves),
            Command::NewGame => tracing::debug!("ucinewgame"),
            Command::Go { depth, movetime, nodes, infinite } => {
                self.go(depth, movetime, nodes, infinite)?;
            },
            Command::Stop => {
                // A `go` always runs to completion before the next line is
                // read in this synchronous loop, so by the time `stop` is
                // dispatched there is nothing left to interrupt.
                tracing::debug!("stop received after synchronous search already completed");
            },
            Command::Quit => return Ok(false),
            Command::Display => self.display()?,
            Command::Perft { depth } => self.perft(depth)?,
            Command::Unknown(line) => writeln!(self.output, "info string unsupported command: {line}")?,
        }
        Ok(true)
    }

    /// Responds to the `uci` handshake command by identifying the engine.
    fn handshake(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "id name {} {}", env!("CARGO_PKG_NAME"), crate::engine_version())?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(self.output, "uciok")?;
        Ok(())
    }

    /// `position [startpos | fen <fen>] [moves <mv>...]`: loads the base
    /// position, then silently skips any move in `moves` that is
    /// malformed or does not resolve to a legal move (Open Question 3: this
    /// preserves the source's original behaviour rather than surfacing a
    /// parse failure mid-stream).
    fn set_position(&mut self, fen: Option<String>, moves: Vec<String>) {
        let loaded = match fen {
            Some(fen) => Position::from_fen(&crate::util::sanitize_fen(&fen)),
            None => Ok(Position::starting()),
        };
        let mut position = match loaded {
            Ok(position) => position,
            Err(error) => {
                tracing::warn!(%error, "invalid position in 'position' command; keeping previous position");
                return;
            },
        };
        for candidate in moves {
            match position.move_from_string(&candidate) {
                Ok(Some(resolved)) => {
                    let _ = position.make_move(resolved);
                },
                Ok(None) => tracing::warn!(mv = candidate, "move is not legal in this position; skipped"),
                Err(error) => tracing::warn!(mv = candidate, %error, "malformed move string; skipped"),
            }
        }
        self.position = position;
    }

    /// `go [depth N] [movetime MS] [nodes N] [infinite]` → `bestmove <uci>`.
    fn go(&mut self, depth: Option<u8>, movetime: Option<u64>, nodes: Option<u64>, infinite: bool) -> anyhow::Result<()> {
        self.stop.store(false, Ordering::Release);
        let max_depth = if infinite { depth.unwrap_or(INFINITE_GO_DEPTH) } else { depth.unwrap_or(0) };
        let limits = SearchLimits {
            max_depth,
            time_ms: movetime.unwrap_or(0),
            node_limit: nodes.unwrap_or(0),
            stop: Some(Arc::clone(&self.stop)),
        };

        let started = Instant::now();
        let result = search::search(&mut self.position, limits);
        tracing::info!(
            depth = result.depth_reached,
            score = result.score,
            nodes = result.nodes_visited,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            aborted = result.aborted,
            "search finished"
        );

        let rendered = result.best_move.map_or_else(|| "0000".to_string(), Move::to_uci);
        writeln!(self.output, "bestmove {rendered}")?;
        Ok(())
    }

    /// Non-standard `d` command: prints the board and side to move.
    fn display(&mut self) -> anyhow::Result<()> {
        write!(self.output, "{:?}", self.position)?;
        writeln!(self.output, "Side to move: {}", self.position.side_to_move())?;
        Ok(())
    }

    /// Non-standard `perft N` command: prints `nodes <count>`.
    fn perft(&mut self, depth: u32) -> anyhow::Result<()> {
        let started = Instant::now();
        let nodes = self.position.perft(depth);
        tracing::debug!(
            depth,
            nodes,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "perft finished"
        );
        writeln!(self.output, "nodes {nodes}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Engine;
    use crate::chess::position::Position;

    fn run(position: Position, script: &str) -> String {
        let mut input = script.as_bytes();
        let mut output = Vec::new();
        let mut engine = Engine::new(position, &mut input, &mut output);
        engine.run().expect("engine run should not error on well-formed script");
        String::from_utf8(output).expect("engine output is valid UTF-8")
    }

    #[test]
    fn uci_handshake() {
        let out = run(Position::starting(), "uci\nquit\n");
        assert!(out.contains("id name"));
        assert!(out.contains("id author"));
        assert!(out.contains("uciok\n"));
    }

    #[test]
    fn isready_responds_readyok() {
        let out = run(Position::starting(), "isready\nquit\n");
        assert_eq!(out, "readyok\n");
    }

    #[test]
    fn perft_command_reports_node_count() {
        let out = run(Position::starting(), "perft 2\nquit\n");
        assert_eq!(out, "nodes 400\n");
    }

    #[test]
    fn go_depth_one_reports_a_bestmove() {
        let out = run(Position::starting(), "go depth 1\nquit\n");
        assert!(out.starts_with("bestmove "));
        assert_eq!(out.trim_end().len(), "bestmove e2e4".len());
    }

    #[test]
    fn position_moves_silently_skips_illegal_move() {
        // e2e5 is not a legal move from the starting position; the engine
        // must not panic and must keep the position usable.
        let out = run(Position::starting(), "position startpos moves e2e5\nd\nquit\n");
        assert!(out.contains("Side to move: w"));
    }

    #[test]
    fn setoption_is_acknowledged_without_error() {
        let out = run(Position::starting(), "setoption name Hash value 128\nisready\nquit\n");
        assert_eq!(out, "readyok\n");
    }
}
