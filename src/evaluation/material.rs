//! Material-only evaluation using "[standard piece valuations]" in
//! centipawns.
//!
//! Not very useful in practice, but this evaluation function is great for
//! testing search and other infrastructure because it is stable, easy to
//! understand and deterministic.
//!
//! [standard piece valuations]: https://en.wikipedia.org/wiki/Chess_piece_relative_value

use crate::chess::core::{Piece, PieceKind, Side};
use crate::chess::position::Position;

const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;
const KING_VALUE: i32 = 20_000;

const fn value_of(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

fn side_material(position: &Position, side: Side) -> i32 {
    [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ]
    .into_iter()
    .map(|kind| position.piece_bb(Piece::new(side, kind)).count() as i32 * value_of(kind))
    .sum()
}

/// White material minus Black material, in centipawns. The king term
/// cancels under normal play (both sides always have exactly one) but is
/// kept so the sum is well-defined even on malformed positions used in
/// tests.
#[must_use]
pub(crate) fn material_advantage(position: &Position) -> i32 {
    side_material(position, Side::White) - side_material(position, Side::Black)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::material_advantage;
    use crate::chess::position::Position;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(material_advantage(&Position::starting()), 0);
    }

    #[test]
    fn white_material_advantage() {
        let position =
            Position::from_fen("rnb1kbnr/ppp2p1p/6p1/3pN1B1/3P4/2N5/PPP1PPPP/R2QKB1R b KQkq - 0 5").unwrap();
        assert_eq!(material_advantage(&position), 1000);
    }

    #[test]
    fn black_material_advantage() {
        let position =
            Position::from_fen("rn1qkbnr/ppp1pppp/8/8/2BP4/4P3/PP3PPP/RbBQK1NR w KQkq - 0 5").unwrap();
        assert_eq!(material_advantage(&position), -320);
    }
}
