//! Perft reference counts for the full suite of standard test positions,
//! not just the startpos/Kiwipete pair already covered by
//! `chess::position`'s own unit tests.

use pretty_assertions::assert_eq;
use talon::chess::position::Position;

fn perft(fen: &str, depth: u32) -> u64 {
    Position::from_fen(fen).expect("fen is well-formed").perft(depth)
}

#[test]
fn startpos() {
    assert_eq!(perft("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 4), 197_281);
}

#[test]
fn kiwipete() {
    assert_eq!(perft("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 3), 97_862);
}

#[test]
fn cpw_position_3() {
    let fen = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    assert_eq!(perft(fen, 1), 14);
    assert_eq!(perft(fen, 2), 191);
    assert_eq!(perft(fen, 3), 2_812);
}

#[test]
fn cpw_position_4() {
    let fen = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2pP/R2Q1RK1 w kq - 0 1";
    assert_eq!(perft(fen, 1), 6);
    assert_eq!(perft(fen, 2), 264);
    assert_eq!(perft(fen, 3), 9_467);
}

#[test]
fn cpw_position_5() {
    let fen = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
    assert_eq!(perft(fen, 1), 44);
    assert_eq!(perft(fen, 2), 1_486);
    assert_eq!(perft(fen, 3), 62_379);
}
