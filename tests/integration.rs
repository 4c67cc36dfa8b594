use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;

const BINARY_NAME: &str = "talon";

#[test]
fn uci_setup() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(
        cmd.write_stdin("uci\nquit\n")
            .assert()
            .success()
            .stdout(contains("id name").and(contains("id author")).and(contains("uciok"))),
    );
}

#[test]
fn uci_isready_and_position_roundtrip() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(
        cmd.write_stdin("isready\nposition startpos moves e2e4 e7e5\nd\nquit\n")
            .assert()
            .success()
            .stdout(contains("readyok").and(contains("Side to move: w"))),
    );
}

#[test]
fn uci_position_silently_skips_an_illegal_move_in_the_moves_list() {
    // Open Question 3 from the spec: a malformed/illegal move in `position
    // ... moves ...` is dropped rather than aborting the whole command.
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(
        cmd.write_stdin("position startpos moves e2e5 e2e4\nd\nquit\n")
            .assert()
            .success()
            .stdout(contains("Side to move: b")),
    );
}

#[test]
fn uci_perft_startpos_depth_three() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(cmd.write_stdin("perft 3\nquit\n").assert().success().stdout(contains("nodes 8902")));
}

#[test]
fn uci_go_depth_one_returns_a_bestmove() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(cmd.write_stdin("go depth 1\nquit\n").assert().success().stdout(contains("bestmove ")));
}

#[test]
fn cli_fen_without_further_action_prints_the_board() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(
        cmd.args(["--fen", "4k3/8/8/8/8/8/8/4K2R w K - 0 1"])
            .assert()
            .success()
            .stdout(contains("Position(")),
    );
}

#[test]
fn cli_perft_flag_prints_node_count() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(cmd.args(["--perft", "2"]).assert().success().stdout(contains("nodes 400")));
}

#[test]
fn cli_search_flag_prints_a_bestmove() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(cmd.args(["--search", "1"]).assert().success().stdout(contains("bestmove ")));
}

#[test]
fn cli_rejects_an_invalid_fen_with_exit_code_one() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(cmd.args(["--fen", "not-a-fen"]).assert().code(1));
}

#[test]
fn cli_rejects_an_unknown_flag_with_exit_code_one() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(cmd.args(["--not-a-real-flag"]).assert().code(1));
}

#[test]
fn cli_help_exits_zero() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("binary should be built");

    drop(cmd.arg("--help").assert().code(0));
}
