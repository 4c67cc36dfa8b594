//! Board primitives commonly used within [`crate::chess`]: squares, files,
//! ranks, sides, pieces and castling rights.
//!
//! Square numbering follows the source engine's convention rather than the
//! more common bottom-up layout: `a8 = 0, b8 = 1, ..., h8 = 7, a7 = 8, ...,
//! h1 = 63`. Rank 0 is the top (8th rank) of the board. This keeps `north`
//! a plain `>> 8` and `south` a plain `<< 8`, which is what the sliding-ray
//! code in [`crate::chess::bitboard`] relies on.

use std::{fmt, mem};

use crate::error::EngineError;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A column of the chessboard, conventionally written as a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = EngineError;

    fn try_from(file: char) -> Result<Self, Self::Error> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute(file as u8 - b'a') }),
            _ => Err(EngineError::InvalidFen(format!(
                "unknown file: expected within 'a'..='h', got '{file}'"
            ))),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = EngineError;

    fn try_from(column: u8) -> Result<Self, Self::Error> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute(column) }),
            _ => Err(EngineError::InvalidFen(format!(
                "unknown file: expected within 0..BOARD_WIDTH, got {column}"
            ))),
        }
    }
}

/// A row of the chessboard, one-indexed in chess notation but stored
/// zero-based here (`Rank::One` is rank 1).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl TryFrom<char> for Rank {
    type Error = EngineError;

    fn try_from(rank: char) -> Result<Self, Self::Error> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute(rank as u8 - b'1') }),
            _ => Err(EngineError::InvalidFen(format!(
                "unknown rank: expected within '1'..='8', got '{rank}'"
            ))),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = EngineError;

    fn try_from(row: u8) -> Result<Self, Self::Error> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute(row) }),
            _ => Err(EngineError::InvalidFen(format!(
                "unknown rank: expected within 0..BOARD_WIDTH, got {row}"
            ))),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// Board squares, `a8 = 0` through `h1 = 63` (top-down, left-to-right within
/// a rank).
///
/// ```
/// use talon::chess::core::Square;
///
/// assert_eq!(Square::A8 as u8, 0);
/// assert_eq!(Square::H8 as u8, 7);
/// assert_eq!(Square::A7 as u8, 8);
/// assert_eq!(Square::H1 as u8, 63);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub fn new(file: File, rank: Rank) -> Self {
        let index = file as u8 + (7 - rank as u8) * BOARD_WIDTH;
        unsafe { mem::transmute(index) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub fn rank(self) -> Rank {
        unsafe { mem::transmute(7 - self as u8 / BOARD_WIDTH) }
    }
}

impl TryFrom<u8> for Square {
    type Error = EngineError;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> Result<Self, Self::Error> {
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute(square_index) }),
            _ => Err(EngineError::InvalidFen(format!(
                "unknown square index: needs to be in 0..BOARD_SIZE, got {square_index}"
            ))),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = EngineError;

    fn try_from(square: &str) -> Result<Self, Self::Error> {
        let bytes = square.as_bytes();
        if bytes.len() != 2 {
            return Err(EngineError::InvalidMoveString(format!(
                "unknown square: should be two chars, got '{square}'"
            )));
        }
        let file = File::try_from(bytes[0] as char)?;
        let rank = Rank::try_from(bytes[1] as char)?;
        Ok(Self::new(file, rank))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// A standard game of chess is played between two sides: White (having the
/// advantage of the first move) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Black,
    White,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<char> for Side {
    type Error = EngineError;

    fn try_from(side: char) -> Result<Self, Self::Error> {
        match side {
            'w' => Ok(Self::White),
            'b' => Ok(Self::Black),
            _ => Err(EngineError::InvalidFen(format!(
                "unknown side: expected 'w' or 'b', got '{side}'"
            ))),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// A chess piece kind, independent of the side that owns it.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

/// One of the twelve distinct pieces on the board: a [`PieceKind`] owned by a
/// [`Side`]. The discriminant layout matches the source engine's `enum Piece
/// { WP, WR, WN, WB, WQ, WK, BP, BR, BN, BB, BQ, BK }`: `piece as u8 % 6`
/// recovers the [`PieceKind`] and `piece as u8 / 6` recovers the [`Side`]
/// (0 = White, 1 = Black).
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Piece {
    WP,
    WR,
    WN,
    WB,
    WQ,
    WK,
    BP,
    BR,
    BN,
    BB,
    BQ,
    BK,
}

impl Piece {
    #[must_use]
    pub fn new(side: Side, kind: PieceKind) -> Self {
        let index = match side {
            Side::White => 0,
            Side::Black => 6,
        } + kind as u8;
        unsafe { mem::transmute(index) }
    }

    #[must_use]
    pub fn kind(self) -> PieceKind {
        unsafe { mem::transmute(self as u8 % 6) }
    }

    #[must_use]
    pub fn side(self) -> Side {
        if (self as u8) < 6 {
            Side::White
        } else {
            Side::Black
        }
    }

    /// Algebraic notation symbol used in FEN. Uppercase for White, lowercase
    /// for Black.
    #[must_use]
    pub fn algebraic_symbol(self) -> char {
        let symbol = match self.kind() {
            PieceKind::Pawn => 'p',
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.side() {
            Side::White => symbol.to_ascii_uppercase(),
            Side::Black => symbol,
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = EngineError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        let (side, lower) = if symbol.is_ascii_uppercase() {
            (Side::White, symbol.to_ascii_lowercase())
        } else {
            (Side::Black, symbol)
        };
        let kind = match lower {
            'p' => PieceKind::Pawn,
            'r' => PieceKind::Rook,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => {
                return Err(EngineError::InvalidFen(format!(
                    "unknown piece symbol: expected within \"KQRBNPkqrbnp\", got '{symbol}'"
                )))
            },
        };
        Ok(Self::new(side, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.algebraic_symbol())
    }
}

bitflags::bitflags! {
    /// Tracks the ability to [castle] each side (kingside is often referred
    /// to as O-O, queenside as O-O-O). When the king moves, the side loses
    /// the ability to castle either way; when a rook moves (or is captured)
    /// from its origin square, the side loses the ability to castle that
    /// way.
    ///
    /// Bit layout matches the FEN/UCI convention: `1 = white kingside`,
    /// `2 = white queenside`, `4 = black kingside`, `8 = black queenside`.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        const WHITE_KINGSIDE = 1;
        const WHITE_QUEENSIDE = 2;
        const BLACK_KINGSIDE = 4;
        const BLACK_QUEENSIDE = 8;
    }
}

impl CastleRights {
    /// Parses the FEN castling field (`"-"` or a subset of `"KQkq"`).
    pub fn from_fen(field: &str) -> Result<Self, EngineError> {
        if field == "-" {
            return Ok(Self::empty());
        }
        let mut rights = Self::empty();
        for ch in field.chars() {
            rights |= match ch {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => {
                    return Err(EngineError::InvalidFen(format!(
                        "unknown castling rights: expected subset of \"KQkq\" or \"-\", got \
                         '{field}'"
                    )))
                },
            };
        }
        Ok(rights)
    }

    /// Renders the FEN castling field.
    #[must_use]
    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        let mut result = String::with_capacity(4);
        if self.contains(Self::WHITE_KINGSIDE) {
            result.push('K');
        }
        if self.contains(Self::WHITE_QUEENSIDE) {
            result.push('Q');
        }
        if self.contains(Self::BLACK_KINGSIDE) {
            result.push('k');
        }
        if self.contains(Self::BLACK_QUEENSIDE) {
            result.push('q');
        }
        result
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{CastleRights, File, Piece, PieceKind, Rank, Side, Square, BOARD_SIZE};

    #[test]
    fn square_numbering() {
        assert_eq!(Square::A8 as u8, 0);
        assert_eq!(Square::H8 as u8, 7);
        assert_eq!(Square::A7 as u8, 8);
        assert_eq!(Square::A1 as u8, 56);
        assert_eq!(Square::H1 as u8, 63);
    }

    #[test]
    fn file_and_rank_roundtrip() {
        for index in 0..BOARD_SIZE {
            let square = Square::try_from(index).unwrap();
            assert_eq!(Square::new(square.file(), square.rank()), square);
        }
    }

    #[test]
    fn square_display() {
        assert_eq!(Square::A8.to_string(), "a8");
        assert_eq!(Square::H1.to_string(), "h1");
        assert_eq!(Square::E4.to_string(), "e4");
    }

    #[test]
    fn square_from_str() {
        assert_eq!(Square::try_from("a8").unwrap(), Square::A8);
        assert_eq!(Square::try_from("h1").unwrap(), Square::H1);
        assert!(Square::try_from("i9").is_err());
        assert!(Square::try_from("a").is_err());
    }

    #[test]
    fn piece_kind_and_side() {
        assert_eq!(Piece::WP.kind(), PieceKind::Pawn);
        assert_eq!(Piece::WP.side(), Side::White);
        assert_eq!(Piece::BK.kind(), PieceKind::King);
        assert_eq!(Piece::BK.side(), Side::Black);
        assert_eq!(Piece::new(Side::White, PieceKind::Queen), Piece::WQ);
        assert_eq!(Piece::new(Side::Black, PieceKind::Knight), Piece::BN);
    }

    #[test]
    fn piece_from_char() {
        assert_eq!(Piece::try_from('P').unwrap(), Piece::WP);
        assert_eq!(Piece::try_from('k').unwrap(), Piece::BK);
        assert!(Piece::try_from('x').is_err());
    }

    #[test]
    fn castle_rights_fen() {
        assert_eq!(CastleRights::from_fen("-").unwrap(), CastleRights::empty());
        assert_eq!(CastleRights::from_fen("KQkq").unwrap(), CastleRights::all());
        assert_eq!(
            CastleRights::from_fen("Kq").unwrap(),
            CastleRights::WHITE_KINGSIDE | CastleRights::BLACK_QUEENSIDE
        );
        assert_eq!(CastleRights::all().to_fen(), "KQkq");
        assert_eq!(CastleRights::empty().to_fen(), "-");
        assert!(CastleRights::from_fen("x").is_err());
    }

    #[test]
    fn file_display() {
        assert_eq!(File::A.to_string(), "a");
        assert_eq!(File::H.to_string(), "h");
    }

    #[test]
    fn rank_display() {
        assert_eq!(Rank::One.to_string(), "1");
        assert_eq!(Rank::Eight.to_string(), "8");
    }
}
