//! [`Position`]: the mutable game state (C4), FEN parsing/emission,
//! pseudo-legal and legal move generation (C6, C8), reversible make/unmake
//! (C7) and perft (C9).

use std::fmt;

use crate::chess::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks};
use crate::chess::bitboard::{rank_mask, Bitboard};
use crate::chess::core::{CastleRights, Piece, PieceKind, Side, Square};
use crate::chess::moves::{Move, MoveFlags, MoveList};
use crate::error::EngineError;

const NUM_PIECES: usize = 12;

const WHITE_KING_ORIGIN: u8 = 60;
const WHITE_KINGSIDE_ROOK_ORIGIN: u8 = 63;
const WHITE_QUEENSIDE_ROOK_ORIGIN: u8 = 56;
const BLACK_KING_ORIGIN: u8 = 4;
const BLACK_KINGSIDE_ROOK_ORIGIN: u8 = 7;
const BLACK_QUEENSIDE_ROOK_ORIGIN: u8 = 0;

const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The minimal delta needed to reverse a single `make_move`: everything that
/// is not mechanically recoverable from the [`Move`] itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Undo {
    castling: CastleRights,
    ep_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    captured: Option<Piece>,
}

/// The full mutable state of a chess game: piece placement, side to move,
/// castling rights, en-passant target and move clocks.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    pieces: [Bitboard; NUM_PIECES],
    occ_white: Bitboard,
    occ_black: Bitboard,
    occ_all: Bitboard,
    side: Side,
    castling: CastleRights,
    ep_square: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Position {
    /// An empty board: no pieces, White to move, no castling rights, no
    /// en-passant target, clocks zeroed.
    #[must_use]
    pub fn clear() -> Self {
        Self {
            pieces: [Bitboard::empty(); NUM_PIECES],
            occ_white: Bitboard::empty(),
            occ_black: Bitboard::empty(),
            occ_all: Bitboard::empty(),
            side: Side::White,
            castling: CastleRights::empty(),
            ep_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The canonical starting position.
    #[must_use]
    pub fn starting() -> Self {
        Self::from_fen(STARTING_FEN).expect("STARTING_FEN is well-formed")
    }

    /// Returns the side to move.
    #[must_use]
    pub const fn side_to_move(&self) -> Side {
        self.side
    }

    /// Returns the current castling rights.
    #[must_use]
    pub const fn castling_rights(&self) -> CastleRights {
        self.castling
    }

    /// Returns the en-passant target square, if any.
    #[must_use]
    pub const fn en_passant(&self) -> Option<Square> {
        self.ep_square
    }

    /// Returns the bitboard of squares occupied by any piece.
    #[must_use]
    pub const fn occupancy(&self) -> Bitboard {
        self.occ_all
    }

    /// Returns the bitboard for a single piece type.
    #[must_use]
    pub const fn piece_bb(&self, piece: Piece) -> Bitboard {
        self.pieces[piece as usize]
    }

    fn occ_for(&self, side: Side) -> Bitboard {
        match side {
            Side::White => self.occ_white,
            Side::Black => self.occ_black,
        }
    }

    /// Scans the twelve piece-sets for the piece occupying `square`, if any.
    /// Matches the teacher's own linear-scan convention; a mailbox side
    /// array would remove the scan at the cost of incremental upkeep, which
    /// the spec treats as an acceptable but non-mandatory optimization.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        use strum::IntoEnumIterator;
        Piece::iter().find(|&piece| self.pieces[piece as usize].contains(square))
    }

    fn refresh_occupancies(&mut self) {
        self.occ_white = Bitboard::empty();
        self.occ_black = Bitboard::empty();
        for piece in [
            Piece::WP,
            Piece::WR,
            Piece::WN,
            Piece::WB,
            Piece::WQ,
            Piece::WK,
        ] {
            self.occ_white |= self.pieces[piece as usize];
        }
        for piece in [
            Piece::BP,
            Piece::BR,
            Piece::BN,
            Piece::BB,
            Piece::BQ,
            Piece::BK,
        ] {
            self.occ_black |= self.pieces[piece as usize];
        }
        self.occ_all = self.occ_white | self.occ_black;
    }

    /// Whether `square` is attacked by `by` in this position.
    #[must_use]
    pub fn is_square_attacked(&self, square: Square, by: Side) -> bool {
        let target = Bitboard::from(square);
        let occ = self.occ_all;

        let pawns = self.piece_bb(Piece::new(by, PieceKind::Pawn));
        if !(pawn_attacks(pawns, by) & target).is_empty() {
            return true;
        }
        for knight in self.piece_bb(Piece::new(by, PieceKind::Knight)).squares() {
            if !(knight_attacks(Bitboard::from(knight)) & target).is_empty() {
                return true;
            }
        }
        for king in self.piece_bb(Piece::new(by, PieceKind::King)).squares() {
            if !(king_attacks(Bitboard::from(king)) & target).is_empty() {
                return true;
            }
        }
        for bishop in self.piece_bb(Piece::new(by, PieceKind::Bishop)).squares() {
            if !(bishop_attacks(Bitboard::from(bishop), occ) & target).is_empty() {
                return true;
            }
        }
        for rook in self.piece_bb(Piece::new(by, PieceKind::Rook)).squares() {
            if !(rook_attacks(Bitboard::from(rook), occ) & target).is_empty() {
                return true;
            }
        }
        for queen in self.piece_bb(Piece::new(by, PieceKind::Queen)).squares() {
            if !(queen_attacks(Bitboard::from(queen), occ) & target).is_empty() {
                return true;
            }
        }
        false
    }

    fn king_square(&self, side: Side) -> Square {
        self.piece_bb(Piece::new(side, PieceKind::King)).lsb()
    }

    /// Parses a FEN string into a fresh [`Position`]. Parses into a scratch
    /// value and only returns success once the whole string has been
    /// consumed, so a failure never leaves a partially constructed
    /// position observable.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFen`] on any grammar violation: wrong
    /// rank sum, unknown piece/side/castling characters, an en-passant
    /// square on the wrong rank, or a missing mandatory field.
    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(EngineError::InvalidFen(format!(
                "expected at least 4 space-separated fields, got {}: '{fen}'",
                fields.len()
            )));
        }

        let mut position = Self::clear();

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(EngineError::InvalidFen(format!(
                "expected 8 ranks separated by '/', got {}: '{fen}'",
                ranks.len()
            )));
        }
        for (rank_index, rank_str) in ranks.iter().enumerate() {
            let mut file: u8 = 0;
            for ch in rank_str.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(EngineError::InvalidFen(format!(
                            "invalid empty-square run '{ch}' in rank '{rank_str}'"
                        )));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::try_from(ch)?;
                    if file >= 8 {
                        return Err(EngineError::InvalidFen(format!(
                            "rank '{rank_str}' has more than 8 files"
                        )));
                    }
                    let square_index = file + (rank_index as u8) * 8;
                    let square = Square::try_from(square_index)?;
                    position.pieces[piece as usize].set(square);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(EngineError::InvalidFen(format!(
                    "rank '{rank_str}' does not sum to 8 files, got {file}"
                )));
            }
        }

        let side_str = fields[1];
        if side_str.len() != 1 {
            return Err(EngineError::InvalidFen(format!(
                "expected a single side character, got '{side_str}'"
            )));
        }
        position.side = Side::try_from(side_str.chars().next().expect("checked length"))?;

        position.castling = CastleRights::from_fen(fields[2])?;

        position.ep_square = match fields[3] {
            "-" => None,
            square => {
                let parsed = Square::try_from(square)?;
                let expected_rank = match position.side {
                    Side::White => 5, // rank 6 (index 2 from top, zero-based 5 from bottom)
                    Side::Black => 2, // rank 3
                };
                if parsed.rank() as u8 != expected_rank {
                    return Err(EngineError::InvalidFen(format!(
                        "en-passant target '{square}' is not on the expected rank for side to \
                         move"
                    )));
                }
                Some(parsed)
            },
        };

        position.halfmove_clock = fields.get(4).map_or(Ok(0), |s| {
            s.parse::<u32>()
                .map_err(|_| EngineError::InvalidFen(format!("invalid halfmove clock '{s}'")))
        })?;
        position.fullmove_number = fields.get(5).map_or(Ok(1), |s| {
            s.parse::<u32>()
                .map_err(|_| EngineError::InvalidFen(format!("invalid fullmove number '{s}'")))
        })?;

        position.refresh_occupancies();
        Ok(position)
    }

    /// Renders this position as a FEN string. Inverse of [`Self::from_fen`].
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(8);
        for rank_index in 0..8u8 {
            let mut rank = String::new();
            let mut empty_run = 0u8;
            for file in 0..8u8 {
                let square = Square::try_from(file + rank_index * 8).expect("valid index");
                match self.piece_at(square) {
                    Some(piece) => {
                        if empty_run > 0 {
                            rank.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        rank.push(piece.algebraic_symbol());
                    },
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                rank.push_str(&empty_run.to_string());
            }
            ranks.push(rank);
        }
        let placement = ranks.join("/");
        let ep = self.ep_square.map_or_else(|| "-".to_string(), |sq| sq.to_string());
        format!(
            "{placement} {} {} {ep} {} {}",
            self.side,
            self.castling.to_fen(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Generates every pseudo-legal move for the side to move: respects
    /// piece geometry, blocking and capture-of-own-piece prohibition, but
    /// may leave the mover's own king in check.
    #[must_use]
    pub fn generate_pseudo_legal(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_pawn_moves(&mut moves);
        self.generate_piece_moves(PieceKind::Knight, knight_attacks_fixed, &mut moves);
        self.generate_piece_moves(PieceKind::Bishop, bishop_attacks, &mut moves);
        self.generate_piece_moves(PieceKind::Rook, rook_attacks, &mut moves);
        self.generate_piece_moves(PieceKind::Queen, queen_attacks, &mut moves);
        self.generate_piece_moves(PieceKind::King, king_attacks_fixed, &mut moves);
        self.generate_castling_moves(&mut moves);
        moves
    }

    /// Generates every legal move: pseudo-legal moves that do not leave the
    /// mover's king attacked after being made.
    #[must_use]
    pub fn generate_legal(&mut self) -> MoveList {
        let mover = self.side;
        let mut legal = MoveList::new();
        for mv in self.generate_pseudo_legal() {
            let undo = self.make_move(mv);
            if !self.is_square_attacked(self.king_square(mover), self.side) {
                legal.push(mv);
            }
            self.unmake_move(mv, undo);
        }
        legal
    }

    fn generate_piece_moves(
        &self,
        kind: PieceKind,
        attacks_of: impl Fn(Bitboard, Bitboard) -> Bitboard,
        moves: &mut MoveList,
    ) {
        let side = self.side;
        let piece = Piece::new(side, kind);
        let own = self.occ_for(side);
        let opp = self.occ_for(side.opposite());
        for from in self.piece_bb(piece).squares() {
            let targets = attacks_of(Bitboard::from(from), self.occ_all) & !own;
            for to in targets.squares() {
                let (captured, flags) = if (Bitboard::from(to) & opp).is_empty() {
                    (None, MoveFlags::QUIET)
                } else {
                    (self.piece_at(to), MoveFlags::CAPTURE)
                };
                moves.push(Move { from, to, piece, captured, promotion: None, flags });
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn generate_pawn_moves(&self, moves: &mut MoveList) {
        let side = self.side;
        let pawns = self.piece_bb(Piece::new(side, PieceKind::Pawn));
        let empty = !self.occ_all;
        let opp = self.occ_for(side.opposite());
        let promo_pieces = [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

        let (single, promo_rank, dpush_rank, forward_offset) = match side {
            Side::White => (pawns.north() & empty, rank_mask(8), rank_mask(3), 8u8),
            Side::Black => (pawns.south() & empty, rank_mask(1), rank_mask(6), 8u8),
        };

        for to in (single & !Bitboard::from_bits(promo_rank)).squares() {
            let from_index = match side {
                Side::White => to as u8 + forward_offset,
                Side::Black => to as u8 - forward_offset,
            };
            let from = Square::try_from(from_index).expect("pawn push stays on board");
            moves.push(Move {
                from,
                to,
                piece: Piece::new(side, PieceKind::Pawn),
                captured: None,
                promotion: None,
                flags: MoveFlags::QUIET,
            });
        }
        for to in (single & Bitboard::from_bits(promo_rank)).squares() {
            let from_index = match side {
                Side::White => to as u8 + forward_offset,
                Side::Black => to as u8 - forward_offset,
            };
            let from = Square::try_from(from_index).expect("pawn push stays on board");
            for &promo_kind in &promo_pieces {
                moves.push(Move {
                    from,
                    to,
                    piece: Piece::new(side, PieceKind::Pawn),
                    captured: None,
                    promotion: Some(Piece::new(side, promo_kind)),
                    flags: MoveFlags::PROMOTION,
                });
            }
        }

        let double_intermediate = single & Bitboard::from_bits(dpush_rank);
        let double = match side {
            Side::White => double_intermediate.north() & empty,
            Side::Black => double_intermediate.south() & empty,
        };
        for to in double.squares() {
            let from_index = match side {
                Side::White => to as u8 + 16,
                Side::Black => to as u8 - 16,
            };
            let from = Square::try_from(from_index).expect("double push stays on board");
            moves.push(Move {
                from,
                to,
                piece: Piece::new(side, PieceKind::Pawn),
                captured: None,
                promotion: None,
                flags: MoveFlags::DOUBLE_PUSH,
            });
        }

        // Diagonal captures. `cap_a`/`cap_b` name the two diagonals without
        // favouring a "left"/"right" label, since that flips between sides.
        let (cap_a, cap_b, offset_a, offset_b) = match side {
            Side::White => (pawns.north_west() & opp, pawns.north_east() & opp, 9u8, 7u8),
            Side::Black => (pawns.south_west() & opp, pawns.south_east() & opp, 7u8, 9u8),
        };
        for (captures, offset) in [(cap_a, offset_a), (cap_b, offset_b)] {
            for to in (captures & !Bitboard::from_bits(promo_rank)).squares() {
                let from_index = match side {
                    Side::White => to as u8 + offset,
                    Side::Black => to as u8 - offset,
                };
                let from = Square::try_from(from_index).expect("pawn capture stays on board");
                moves.push(Move {
                    from,
                    to,
                    piece: Piece::new(side, PieceKind::Pawn),
                    captured: self.piece_at(to),
                    promotion: None,
                    flags: MoveFlags::CAPTURE,
                });
            }
            for to in (captures & Bitboard::from_bits(promo_rank)).squares() {
                let from_index = match side {
                    Side::White => to as u8 + offset,
                    Side::Black => to as u8 - offset,
                };
                let from = Square::try_from(from_index).expect("pawn capture stays on board");
                for &promo_kind in &promo_pieces {
                    moves.push(Move {
                        from,
                        to,
                        piece: Piece::new(side, PieceKind::Pawn),
                        captured: self.piece_at(to),
                        promotion: Some(Piece::new(side, promo_kind)),
                        flags: MoveFlags::CAPTURE | MoveFlags::PROMOTION,
                    });
                }
            }
        }

        if let Some(ep) = self.ep_square {
            let ep_bb = Bitboard::from(ep);
            let (nw_sources, ne_sources, offset_nw, offset_ne) = match side {
                Side::White => (pawns.north_west() & ep_bb, pawns.north_east() & ep_bb, 9u8, 7u8),
                Side::Black => (pawns.south_west() & ep_bb, pawns.south_east() & ep_bb, 7u8, 9u8),
            };
            let captured = Piece::new(side.opposite(), PieceKind::Pawn);
            if !nw_sources.is_empty() {
                let from_index = match side {
                    Side::White => ep as u8 + offset_nw,
                    Side::Black => ep as u8 - offset_nw,
                };
                let from = Square::try_from(from_index).expect("ep source on board");
                moves.push(Move {
                    from,
                    to: ep,
                    piece: Piece::new(side, PieceKind::Pawn),
                    captured: Some(captured),
                    promotion: None,
                    flags: MoveFlags::ENPASSANT | MoveFlags::CAPTURE,
                });
            }
            if !ne_sources.is_empty() {
                let from_index = match side {
                    Side::White => ep as u8 + offset_ne,
                    Side::Black => ep as u8 - offset_ne,
                };
                let from = Square::try_from(from_index).expect("ep source on board");
                moves.push(Move {
                    from,
                    to: ep,
                    piece: Piece::new(side, PieceKind::Pawn),
                    captured: Some(captured),
                    promotion: None,
                    flags: MoveFlags::ENPASSANT | MoveFlags::CAPTURE,
                });
            }
        }
    }

    fn generate_castling_moves(&self, moves: &mut MoveList) {
        let side = self.side;
        let opp = side.opposite();
        let empty_and_safe = |squares: &[u8], attacked_check: &[u8]| -> bool {
            squares.iter().all(|&sq| {
                !self
                    .occ_all
                    .contains(Square::try_from(sq).expect("castling square is on board"))
            }) && attacked_check.iter().all(|&sq| {
                !self.is_square_attacked(Square::try_from(sq).expect("castling square is on board"), opp)
            })
        };

        match side {
            Side::White => {
                if self.castling.contains(CastleRights::WHITE_KINGSIDE)
                    && empty_and_safe(&[61, 62], &[60, 61, 62])
                {
                    moves.push(Move {
                        from: Square::try_from(WHITE_KING_ORIGIN).expect("valid"),
                        to: Square::try_from(62).expect("valid"),
                        piece: Piece::WK,
                        captured: None,
                        promotion: None,
                        flags: MoveFlags::CASTLE,
                    });
                }
                if self.castling.contains(CastleRights::WHITE_QUEENSIDE)
                    && empty_and_safe(&[57, 58, 59], &[60, 59, 58])
                {
                    moves.push(Move {
                        from: Square::try_from(WHITE_KING_ORIGIN).expect("valid"),
                        to: Square::try_from(58).expect("valid"),
                        piece: Piece::WK,
                        captured: None,
                        promotion: None,
                        flags: MoveFlags::CASTLE,
                    });
                }
            },
            Side::Black => {
                if self.castling.contains(CastleRights::BLACK_KINGSIDE)
                    && empty_and_safe(&[5, 6], &[4, 5, 6])
                {
                    moves.push(Move {
                        from: Square::try_from(BLACK_KING_ORIGIN).expect("valid"),
                        to: Square::try_from(6).expect("valid"),
                        piece: Piece::BK,
                        captured: None,
                        promotion: None,
                        flags: MoveFlags::CASTLE,
                    });
                }
                if self.castling.contains(CastleRights::BLACK_QUEENSIDE)
                    && empty_and_safe(&[1, 2, 3], &[4, 3, 2])
                {
                    moves.push(Move {
                        from: Square::try_from(BLACK_KING_ORIGIN).expect("valid"),
                        to: Square::try_from(2).expect("valid"),
                        piece: Piece::BK,
                        captured: None,
                        promotion: None,
                        flags: MoveFlags::CASTLE,
                    });
                }
            },
        }
    }

    /// Applies `mv` in place and returns an [`Undo`] capable of reversing
    /// it. See SPEC_FULL §4.7 for the full step-by-step contract.
    #[allow(clippy::too_many_lines)]
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let undo = Undo {
            castling: self.castling,
            ep_square: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            captured: mv.captured,
        };

        let is_capture = mv.flags.contains(MoveFlags::CAPTURE);
        if mv.piece.kind() == PieceKind::Pawn || is_capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.ep_square = None;

        if mv.flags.contains(MoveFlags::ENPASSANT) {
            let victim_square_index = match self.side {
                Side::White => mv.to as u8 + 8,
                Side::Black => mv.to as u8 - 8,
            };
            let victim_square = Square::try_from(victim_square_index).expect("ep victim on board");
            let victim = Piece::new(self.side.opposite(), PieceKind::Pawn);
            self.pieces[victim as usize].clear(victim_square);
        } else if is_capture {
            if let Some(captured) = mv.captured {
                self.pieces[captured as usize].clear(mv.to);
            }
        }

        self.pieces[mv.piece as usize].clear(mv.from);
        self.pieces[mv.piece as usize].set(mv.to);

        if let Some(promotion) = mv.promotion {
            self.pieces[mv.piece as usize].clear(mv.to);
            self.pieces[promotion as usize].set(mv.to);
        }

        if mv.flags.contains(MoveFlags::CASTLE) {
            let (rook, from, to) = match mv.to as u8 {
                62 => (Piece::WR, WHITE_KINGSIDE_ROOK_ORIGIN, 61),
                58 => (Piece::WR, WHITE_QUEENSIDE_ROOK_ORIGIN, 59),
                6 => (Piece::BR, BLACK_KINGSIDE_ROOK_ORIGIN, 5),
                2 => (Piece::BR, BLACK_QUEENSIDE_ROOK_ORIGIN, 3),
                _ => unreachable!("castling move targets only the four king destination squares"),
            };
            self.pieces[rook as usize].clear(Square::try_from(from).expect("valid"));
            self.pieces[rook as usize].set(Square::try_from(to).expect("valid"));
        }

        match mv.from as u8 {
            WHITE_KING_ORIGIN => self.castling.remove(CastleRights::WHITE_KINGSIDE | CastleRights::WHITE_QUEENSIDE),
            BLACK_KING_ORIGIN => self.castling.remove(CastleRights::BLACK_KINGSIDE | CastleRights::BLACK_QUEENSIDE),
            _ => {},
        }
        for &(square, right) in &[
            (WHITE_KINGSIDE_ROOK_ORIGIN, CastleRights::WHITE_KINGSIDE),
            (WHITE_QUEENSIDE_ROOK_ORIGIN, CastleRights::WHITE_QUEENSIDE),
            (BLACK_KINGSIDE_ROOK_ORIGIN, CastleRights::BLACK_KINGSIDE),
            (BLACK_QUEENSIDE_ROOK_ORIGIN, CastleRights::BLACK_QUEENSIDE),
        ] {
            if mv.from as u8 == square || mv.to as u8 == square {
                self.castling.remove(right);
            }
        }

        if mv.flags.contains(MoveFlags::DOUBLE_PUSH) {
            let ep_index = match self.side {
                Side::White => mv.to as u8 + 8,
                Side::Black => mv.to as u8 - 8,
            };
            self.ep_square = Some(Square::try_from(ep_index).expect("ep square on board"));
        }

        if self.side == Side::Black {
            self.fullmove_number += 1;
        }

        self.side = self.side.opposite();
        self.refresh_occupancies();

        undo
    }

    /// Reverses a `make_move`: restores the snapshot scalars and undoes
    /// piece placement in the opposite order it was applied.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side = self.side.opposite();

        if let Some(promotion) = mv.promotion {
            self.pieces[promotion as usize].clear(mv.to);
            self.pieces[mv.piece as usize].set(mv.to);
        }
        self.pieces[mv.piece as usize].clear(mv.to);
        self.pieces[mv.piece as usize].set(mv.from);

        if mv.flags.contains(MoveFlags::CASTLE) {
            let (rook, from, to) = match mv.to as u8 {
                62 => (Piece::WR, WHITE_KINGSIDE_ROOK_ORIGIN, 61),
                58 => (Piece::WR, WHITE_QUEENSIDE_ROOK_ORIGIN, 59),
                6 => (Piece::BR, BLACK_KINGSIDE_ROOK_ORIGIN, 5),
                2 => (Piece::BR, BLACK_QUEENSIDE_ROOK_ORIGIN, 3),
                _ => unreachable!("castling move targets only the four king destination squares"),
            };
            self.pieces[rook as usize].clear(Square::try_from(to).expect("valid"));
            self.pieces[rook as usize].set(Square::try_from(from).expect("valid"));
        }

        if mv.flags.contains(MoveFlags::ENPASSANT) {
            let victim_square_index = match self.side {
                Side::White => mv.to as u8 + 8,
                Side::Black => mv.to as u8 - 8,
            };
            let victim_square = Square::try_from(victim_square_index).expect("ep victim on board");
            let victim = Piece::new(self.side.opposite(), PieceKind::Pawn);
            self.pieces[victim as usize].set(victim_square);
        } else if let Some(captured) = undo.captured {
            self.pieces[captured as usize].set(mv.to);
        }

        self.castling = undo.castling;
        self.ep_square = undo.ep_square;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;
        self.refresh_occupancies();
    }

    /// Exact leaf count of the legal-move tree at `depth`. The canonical
    /// correctness oracle for move generation and make/unmake.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut nodes = 0;
        for mv in self.generate_legal() {
            let undo = self.make_move(mv);
            nodes += self.perft(depth - 1);
            self.unmake_move(mv, undo);
        }
        nodes
    }

    /// Per-root-move leaf counts at `depth`, for diagnosing a move
    /// generation discrepancy against a reference engine. The sum of the
    /// returned counts equals `perft(depth)`.
    #[must_use]
    pub fn divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        let mut result = Vec::new();
        for mv in self.generate_legal() {
            let undo = self.make_move(mv);
            let nodes = if depth == 0 { 1 } else { self.perft(depth - 1) };
            self.unmake_move(mv, undo);
            result.push((mv, nodes));
        }
        result
    }

    /// Resolves a UCI coordinate move string against this position's legal
    /// moves. Returns `Ok(None)` (not an error) if the string is
    /// well-formed but does not correspond to any legal move: this is an
    /// expected, common outcome, not an exceptional one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMoveString`] if `input` is not
    /// well-formed coordinate notation.
    pub fn move_from_string(&mut self, input: &str) -> Result<Option<Move>, EngineError> {
        let (from, to, promo) = crate::chess::moves::parse_uci_move(input)?;
        let promo_kind = promo.map(|c| match c {
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            _ => unreachable!("parse_uci_move only returns qrbn"),
        });
        Ok(self.generate_legal().into_iter().find(|mv| {
            mv.from == from
                && mv.to == to
                && promo_kind == mv.promotion.map(Piece::kind)
        }))
    }
}

fn knight_attacks_fixed(src: Bitboard, _occ: Bitboard) -> Bitboard {
    knight_attacks(src)
}

fn king_attacks_fixed(src: Bitboard, _occ: Bitboard) -> Bitboard {
    king_attacks(src)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Position({})", self.to_fen())?;
        for rank_index in 0..8u8 {
            for file in 0..8u8 {
                let square = Square::try_from(file + rank_index * 8).expect("valid index");
                let symbol = self.piece_at(square).map_or('.', Piece::algebraic_symbol);
                write!(f, "{symbol} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
