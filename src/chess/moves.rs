//! [`Move`] records and the fixed-capacity [`MoveList`] buffer they are
//! generated into (C5).

use std::fmt;

use arrayvec::ArrayVec;

use crate::chess::core::{Piece, Square};
use crate::error::EngineError;

/// No legal chess position is known to generate more than 218 pseudo-legal
/// moves; 256 leaves comfortable headroom.
pub const MAX_MOVES: usize = 256;

/// A buffer of moves, capacity-bounded so it can live on the stack. Overflow
/// past [`MAX_MOVES`] is a programming error in the generator and is not
/// checked at runtime.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

bitflags::bitflags! {
    /// Flags describing the kind of a [`Move`]. Flags compose: a
    /// capture-promotion is `CAPTURE | PROMOTION`, and en-passant is always
    /// `ENPASSANT | CAPTURE`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct MoveFlags: u8 {
        const QUIET = 0;
        const CAPTURE = 1;
        const PROMOTION = 2;
        const ENPASSANT = 4;
        const CASTLE = 8;
        const DOUBLE_PUSH = 16;
    }
}

/// An immutable record of a single move: enough information to apply it and
/// to reverse it given an [`Undo`](crate::chess::position::Undo).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
    pub flags: MoveFlags,
}

impl Move {
    /// Coordinate notation: `from` + `to`, with an optional lowercase
    /// promotion-piece suffix (`q`, `r`, `b`, `n`). A "no move" sentinel
    /// renders as `"0000"` per the UCI boundary convention.
    #[must_use]
    pub fn to_uci(self) -> String {
        let mut result = format!("{}{}", self.from, self.to);
        if let Some(promotion) = self.promotion {
            result.push(promotion.algebraic_symbol().to_ascii_lowercase());
        }
        result
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Parses the `from`/`to`/promotion components of a coordinate move string,
/// without resolving it against any particular position's legal moves. The
/// caller (`Position::move_from_string`) matches the returned tuple against
/// the legal move list to recover `piece`/`captured`/`flags`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidMoveString`] if `input` is not 4 or 5
/// characters of the form `<file><rank><file><rank>[qrbn]`.
pub fn parse_uci_move(input: &str) -> Result<(Square, Square, Option<char>), EngineError> {
    let bytes = input.as_bytes();
    if bytes.len() != 4 && bytes.len() != 5 {
        return Err(EngineError::InvalidMoveString(format!(
            "expected 4 or 5 characters, got '{input}'"
        )));
    }
    let from = Square::try_from(&input[0..2])?;
    let to = Square::try_from(&input[2..4])?;
    let promotion = match bytes.get(4) {
        None => None,
        Some(&c) if matches!(c, b'q' | b'r' | b'b' | b'n') => Some(c as char),
        Some(&c) => {
            return Err(EngineError::InvalidMoveString(format!(
                "unknown promotion piece: expected one of \"qrbn\", got '{}'",
                c as char
            )))
        },
    };
    Ok((from, to, promotion))
}
