//! Piece-wise attack sets (C3): given a source square and an occupancy,
//! compute every square a piece attacks.
//!
//! Sliding attacks (bishop/rook/queen) are computed by runtime ray-walking
//! (see [`crate::chess::bitboard`]) rather than precomputed magic/PEXT
//! tables: ray-walking is slower but needs no build-time codegen, and is
//! the reference implementation any faster substitute must agree with
//! bit-for-bit.

use crate::chess::bitboard::Bitboard;
use crate::chess::core::Side;

/// Attacks of a king standing on (exactly one bit of) `src`.
#[must_use]
pub fn king_attacks(src: Bitboard) -> Bitboard {
    src.north()
        | src.south()
        | src.east()
        | src.west()
        | src.north_east()
        | src.north_west()
        | src.south_east()
        | src.south_west()
}

/// Attacks of a knight standing on (exactly one bit of) `src`: the eight
/// `(±1, ±2)` leaps, built from single-step shifts of the double-step
/// intermediates.
#[must_use]
pub fn knight_attacks(src: Bitboard) -> Bitboard {
    let nn = src.north().north();
    let ss = src.south().south();
    let ee = src.east().east();
    let ww = src.west().west();
    nn.east() | nn.west() | ss.east() | ss.west() | ee.north() | ee.south() | ww.north() | ww.south()
}

/// Bishop attacks from `src` given board `occupancy`.
#[must_use]
pub fn bishop_attacks(src: Bitboard, occupancy: Bitboard) -> Bitboard {
    src.ray_north_east(occupancy)
        | src.ray_north_west(occupancy)
        | src.ray_south_east(occupancy)
        | src.ray_south_west(occupancy)
}

/// Rook attacks from `src` given board `occupancy`.
#[must_use]
pub fn rook_attacks(src: Bitboard, occupancy: Bitboard) -> Bitboard {
    src.ray_north(occupancy) | src.ray_south(occupancy) | src.ray_east(occupancy) | src.ray_west(occupancy)
}

/// Queen attacks from `src` given board `occupancy`: bishop union rook.
#[must_use]
pub fn queen_attacks(src: Bitboard, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(src, occupancy) | rook_attacks(src, occupancy)
}

/// Set-wise pawn attacks: every square attacked by any pawn in `pawns`,
/// given which `side` they belong to. White pawns attack north-east and
/// north-west of themselves; Black pawns attack south-east and south-west.
#[must_use]
pub fn pawn_attacks(pawns: Bitboard, side: Side) -> Bitboard {
    match side {
        Side::White => pawns.north_east() | pawns.north_west(),
        Side::Black => pawns.south_east() | pawns.south_west(),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
    use crate::chess::bitboard::Bitboard;
    use crate::chess::core::{Side, Square};

    #[test]
    fn king_in_the_corner() {
        let attacks = king_attacks(Bitboard::from(Square::A1));
        assert_eq!(attacks.count(), 3);
    }

    #[test]
    fn king_in_the_middle() {
        let attacks = king_attacks(Bitboard::from(Square::try_from("e4").unwrap()));
        assert_eq!(attacks.count(), 8);
    }

    #[test]
    fn knight_in_the_corner() {
        let attacks = knight_attacks(Bitboard::from(Square::A1));
        assert_eq!(attacks.count(), 2);
    }

    #[test]
    fn knight_in_the_middle() {
        let attacks = knight_attacks(Bitboard::from(Square::try_from("e4").unwrap()));
        assert_eq!(attacks.count(), 8);
    }

    #[test]
    fn rook_on_empty_board() {
        let attacks = rook_attacks(Bitboard::from(Square::A1), Bitboard::empty());
        assert_eq!(attacks.count(), 14);
    }

    #[test]
    fn bishop_stopped_by_blocker() {
        let blocker = Bitboard::from(Square::try_from("d4").unwrap());
        let attacks = bishop_attacks(Bitboard::from(Square::A1), blocker);
        assert!(attacks.contains(Square::try_from("d4").unwrap()));
        assert!(!attacks.contains(Square::try_from("e5").unwrap()));
    }

    #[test]
    fn pawn_set_attacks() {
        let mut pawns = Bitboard::empty();
        pawns.set(Square::try_from("e2").unwrap());
        pawns.set(Square::try_from("a2").unwrap());
        let attacks = pawn_attacks(pawns, Side::White);
        assert!(attacks.contains(Square::try_from("d3").unwrap()));
        assert!(attacks.contains(Square::try_from("f3").unwrap()));
        assert!(attacks.contains(Square::try_from("b3").unwrap()));
        assert!(!attacks.contains(Square::try_from("a3").unwrap()));
    }
}
