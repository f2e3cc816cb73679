//! Loading and generating FEN position text.

use std::fmt;
use std::str::FromStr;

use crate::attacks::pawn_attacks;
use crate::castling::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::{Piece, PieceKind};
use crate::position::{MAX_GAME_PLY, Position};
use crate::square::Square;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a six-field FEN string into a validated position.
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let mut pos = Position::empty();
        parse_placement(&mut pos, fields[0])?;

        pos.side_to_move = Color::from_fen(fields[1])
            .ok_or_else(|| FenError::InvalidColor { found: fields[1].to_string() })?;
        pos.castling = CastleRights::from_fen(fields[2])?;
        pos.en_passant = parse_en_passant(&pos, fields[3])?;
        pos.halfmove_clock = parse_counter(fields[4], "halfmove clock")?;
        pos.fullmove_number = parse_counter(fields[5], "fullmove number")?.max(1);

        pos.hash = pos.compute_hash();
        pos.validate()?;
        Ok(pos)
    }

    /// The position as FEN. Loading the result yields an equal position.
    pub fn to_fen(&self) -> String {
        self.to_string()
    }
}

fn parse_placement(pos: &mut Position, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    for (rank_index, text) in ranks.iter().enumerate() {
        let rank = 7 - rank_index as u8;
        let mut file = 0usize;
        for c in text.chars() {
            if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file += run as usize;
                continue;
            }
            let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
            if file >= 8 {
                return Err(FenError::BadRankLength { rank_index, length: file + 1 });
            }
            pos.put_piece(piece, Square::from_coords(file as u8, rank));
            file += 1;
        }
        if file != 8 {
            return Err(FenError::BadRankLength { rank_index, length: file });
        }
    }
    Ok(())
}

/// The target must sit behind an enemy pawn that just made a double push:
/// the pawn in place, the target and its start square empty. It is kept
/// only when a pawn of the side to move could capture onto it.
fn parse_en_passant(pos: &Position, field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let invalid = || FenError::InvalidEnPassant { found: field.to_string() };
    let target = Square::parse(field).ok_or_else(invalid)?;
    let expected_rank = match pos.side_to_move {
        Color::White => 5,
        Color::Black => 2,
    };
    if target.rank() != expected_rank {
        return Err(invalid());
    }
    let us = pos.side_to_move;
    let pushed = pos.piece_on(target.offset(-us.forward())) == Some(Piece::new(PieceKind::Pawn, !us));
    let vacated = pos.piece_on(target).is_none() && pos.piece_on(target.offset(us.forward())).is_none();
    if !pushed || !vacated {
        return Err(invalid());
    }
    let capturers = pawn_attacks(!us, target) & pos.pieces(PieceKind::Pawn, us);
    Ok(capturers.is_nonempty().then_some(target))
}

/// Largest counter accepted, leaving room for a full game line of increments.
const MAX_COUNTER: u16 = u16::MAX - MAX_GAME_PLY as u16;

fn parse_counter(field: &str, name: &'static str) -> Result<u16, FenError> {
    field
        .parse::<u16>()
        .ok()
        .filter(|&n| n <= MAX_COUNTER)
        .ok_or_else(|| FenError::InvalidMoveCounter { field: name, found: field.to_string() })
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Position, FenError> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_on(Square::from_coords(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }

        write!(f, " {} {} ", self.side_to_move, self.castling)?;
        match self.en_passant {
            Some(sq) => write!(f, "{sq}")?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::error::{BoardError, FenError};
    use crate::position::{MAX_GAME_PLY, Position};
    use crate::square::Square;

    fn roundtrip(fen: &str) {
        let pos: Position = fen.parse().unwrap();
        assert_eq!(pos.to_fen(), fen);
        let again: Position = pos.to_fen().parse().unwrap();
        assert_eq!(again, pos);
    }

    #[test]
    fn canonical_roundtrips() {
        roundtrip(STARTING_FEN);
        roundtrip("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        roundtrip("rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        roundtrip("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
        roundtrip("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    }

    #[test]
    fn startpos_matches_constructor() {
        assert_eq!(STARTING_FEN.parse::<Position>().unwrap(), Position::startpos());
    }

    #[test]
    fn uncapturable_en_passant_is_dropped() {
        let pos: Position = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".parse().unwrap();
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
    }

    #[test]
    fn capturable_en_passant_is_kept() {
        let pos: Position = "4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1".parse().unwrap();
        assert_eq!(pos.en_passant(), Some(Square::E3));
        assert_eq!(pos.hash(), pos.compute_hash());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert_eq!(
            "8/8/8 w - - 0 1".parse::<Position>().unwrap_err(),
            FenError::WrongRankCount { found: 3 }
        );
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -".parse::<Position>().unwrap_err(),
            FenError::WrongFieldCount { found: 5 }
        );
        assert!(matches!(
            "rnbqkbnr/ppppXppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse::<Position>(),
            Err(FenError::InvalidPieceChar { character: 'X' })
        ));
        assert!(matches!(
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse::<Position>(),
            Err(FenError::BadRankLength { rank_index: 1, .. })
        ));
        assert!(matches!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1".parse::<Position>(),
            Err(FenError::InvalidColor { .. })
        ));
        assert!(matches!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e9 0 1".parse::<Position>(),
            Err(FenError::InvalidEnPassant { .. })
        ));
        assert!(matches!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1".parse::<Position>(),
            Err(FenError::InvalidMoveCounter { field: "halfmove clock", .. })
        ));
        assert!(matches!(
            "4k3/8/8/8/8/8/8/4K2R w - - 65535 1".parse::<Position>(),
            Err(FenError::InvalidMoveCounter { field: "halfmove clock", .. })
        ));
        assert!(matches!(
            "4k3/8/8/8/8/8/8/4K2R w - - 0 65000".parse::<Position>(),
            Err(FenError::InvalidMoveCounter { field: "fullmove number", .. })
        ));
    }

    #[test]
    fn en_passant_must_follow_a_double_push() {
        // No black pawn on d5 behind the target.
        assert!(matches!(
            "4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1".parse::<Position>(),
            Err(FenError::InvalidEnPassant { .. })
        ));
        // A knight where the pushed pawn should be.
        assert!(matches!(
            "4k3/8/8/3nP3/8/8/8/4K3 w - d6 0 1".parse::<Position>(),
            Err(FenError::InvalidEnPassant { .. })
        ));
        // Target square occupied.
        assert!(matches!(
            "4k3/8/3b4/3pP3/8/8/8/4K3 w - d6 0 1".parse::<Position>(),
            Err(FenError::InvalidEnPassant { .. })
        ));
        // Start square of the double push occupied.
        assert!(matches!(
            "4k3/3r4/8/3pP3/8/8/8/4K3 w - d6 0 1".parse::<Position>(),
            Err(FenError::InvalidEnPassant { .. })
        ));
    }

    #[test]
    fn counters_leave_room_for_a_game() {
        let mut pos: Position = "4k3/8/8/8/8/8/8/4K2R b - - 64000 64000".parse().unwrap();
        let moves = pos.legal_moves();
        assert!(!moves.is_empty());
        for mv in moves.iter() {
            assert!(pos.make_move(mv));
            pos.unmake_move(mv);
        }
        assert!(pos.is_fifty_move_draw());
    }

    #[test]
    fn impossible_boards_are_rejected() {
        assert_eq!(
            "8/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err(),
            FenError::InvalidBoard(BoardError::InvalidKingCount { color: "black", count: 0 })
        );
        assert_eq!(
            "4k2P/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Position>().unwrap_err(),
            FenError::InvalidBoard(BoardError::PawnsOnBackRank)
        );
        // Black to move while white is in check.
        assert_eq!(
            "4k3/8/8/8/8/8/8/r3K3 b - - 0 1".parse::<Position>().unwrap_err(),
            FenError::InvalidBoard(BoardError::OpponentInCheck)
        );
    }
}
