//! Parses UCI protocol commands (`uci`, `isready`, `position`, `go`, ...)
//! plus the engine's small non-standard extensions (`d`, `perft N`) into a
//! [`Command`] the [`super::Engine`] dispatches on.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Command {
    Uci,
    Debug { on: bool },
    IsReady,
    SetOption { name: String, value: Option<String> },
    SetPosition { fen: Option<String>, moves: Vec<String> },
    NewGame,
    Go { depth: Option<u8>, movetime: Option<u64>, nodes: Option<u64>, infinite: bool },
    Stop,
    Quit,
    /// Non-standard: print the board and current FEN.
    Display,
    /// Non-standard: run perft to the given depth and print `nodes <count>`.
    Perft { depth: u32 },
    Unknown(String),
}

fn parse_go(parts: &[&str]) -> Command {
    let mut depth = None;
    let mut movetime = None;
    let mut nodes = None;
    let mut infinite = false;

    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" if i + 1 < parts.len() => {
                depth = parts[i + 1].parse().ok();
                i += 2;
            },
            "movetime" if i + 1 < parts.len() => {
                movetime = parts[i + 1].parse().ok();
                i += 2;
            },
            "nodes" if i + 1 < parts.len() => {
                nodes = parts[i + 1].parse().ok();
                i += 2;
            },
            "infinite" => {
                infinite = true;
                i += 1;
            },
            // wtime/btime/winc/binc/mate/ponder and other tokens are accepted but
            // ignored: this engine's time management is movetime/depth/nodes only.
            _ => i += 1,
        }
    }

    Command::Go { depth, movetime, nodes, infinite }
}

fn parse_setoption(parts: &[&str]) -> Command {
    if parts.len() > 2 && parts[1] == "name" {
        let value_index = parts.iter().position(|&x| x == "value");
        let name_end = value_index.unwrap_or(parts.len());
        let name = parts[2..name_end].join(" ");
        let value = value_index.map(|index| parts[index + 1..].join(" "));
        Command::SetOption { name, value }
    } else {
        Command::Unknown(parts.join(" "))
    }
}

fn parse_setposition(parts: &[&str]) -> Command {
    let fen_index = parts.iter().position(|&x| x == "fen");
    let moves_index = parts.iter().position(|&x| x == "moves");
    let fen = fen_index.map(|index| parts[index + 1..moves_index.unwrap_or(parts.len())].join(" "));
    let moves = moves_index.map_or_else(Vec::new, |index| {
        parts[index + 1..].iter().map(ToString::to_string).collect()
    });
    Command::SetPosition { fen, moves }
}

fn parse_perft(parts: &[&str]) -> Command {
    match parts.get(1).and_then(|s| s.parse().ok()) {
        Some(depth) => Command::Perft { depth },
        None => Command::Unknown(parts.join(" ")),
    }
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some(&keyword) = parts.first() else {
            return Self::Unknown(input.to_string());
        };

        match keyword {
            "uci" => Self::Uci,
            "debug" if parts.len() > 1 => Self::Debug { on: parts[1] == "on" },
            "isready" => Self::IsReady,
            "setoption" => parse_setoption(&parts),
            "position" => parse_setposition(&parts),
            "ucinewgame" => Self::NewGame,
            "go" => parse_go(&parts),
            "stop" => Self::Stop,
            "quit" => Self::Quit,
            "d" => Self::Display,
            "perft" => parse_perft(&parts),
            _ => Self::Unknown(input.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Command;

    #[test]
    fn parse_uci() {
        assert_eq!(Command::parse("uci"), Command::Uci);
    }

    #[test]
    fn parse_debug() {
        assert_eq!(Command::parse("debug on"), Command::Debug { on: true });
        assert_eq!(Command::parse("debug off"), Command::Debug { on: false });
    }

    #[test]
    fn parse_isready() {
        assert_eq!(Command::parse("isready"), Command::IsReady);
    }

    #[test]
    fn parse_setoption_is_accepted_but_inert() {
        assert_eq!(
            Command::parse("setoption name Hash value 128"),
            Command::SetOption { name: "Hash".to_string(), value: Some("128".to_string()) }
        );
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        assert_eq!(
            Command::parse("position startpos moves e2e4 e7e5"),
            Command::SetPosition { fen: None, moves: vec!["e2e4".to_string(), "e7e5".to_string()] }
        );
    }

    #[test]
    fn parse_position_fen_with_moves() {
        assert_eq!(
            Command::parse(
                "position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 moves e2e4 e7e5"
            ),
            Command::SetPosition {
                fen: Some("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string()),
                moves: vec!["e2e4".to_string(), "e7e5".to_string()],
            }
        );
    }

    #[test]
    fn ucinewgame() {
        assert_eq!(Command::parse("ucinewgame"), Command::NewGame);
    }

    #[test]
    fn parse_go_depth() {
        assert_eq!(
            Command::parse("go depth 10"),
            Command::Go { depth: Some(10), movetime: None, nodes: None, infinite: false }
        );
    }

    #[test]
    fn parse_go_movetime_and_nodes() {
        assert_eq!(
            Command::parse("go movetime 5000 nodes 100000"),
            Command::Go { depth: None, movetime: Some(5000), nodes: Some(100_000), infinite: false }
        );
    }

    #[test]
    fn parse_go_ignores_time_management_tokens() {
        assert_eq!(
            Command::parse("go wtime 300000 btime 300000 winc 1000 binc 1000 depth 6"),
            Command::Go { depth: Some(6), movetime: None, nodes: None, infinite: false }
        );
    }

    #[test]
    fn parse_go_infinite() {
        assert_eq!(
            Command::parse("go infinite"),
            Command::Go { depth: None, movetime: None, nodes: None, infinite: true }
        );
    }

    #[test]
    fn parse_stop_and_quit() {
        assert_eq!(Command::parse("stop"), Command::Stop);
        assert_eq!(Command::parse("quit"), Command::Quit);
    }

    #[test]
    fn parse_display_and_perft() {
        assert_eq!(Command::parse("d"), Command::Display);
        assert_eq!(Command::parse("perft 4"), Command::Perft { depth: 4 });
        assert_eq!(Command::parse("perft"), Command::Unknown("perft".to_string()));
    }

    #[test]
    fn unknown() {
        assert_eq!(Command::parse("unknown command"), Command::Unknown("unknown command".to_string()));
    }
}
