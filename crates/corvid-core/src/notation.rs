//! Move text: coordinate notation and standard algebraic notation (SAN).

use crate::chess_move::{Move, MoveKind};
use crate::error::MoveParseError;
use crate::piece::PieceKind;
use crate::position::Position;
use crate::square::Square;

impl Position {
    /// Resolve coordinate text such as `e2e4` or `a7a8q` to a legal move.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let malformed = || MoveParseError::Malformed { text: text.to_string() };
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(malformed());
        }
        let from = Square::parse(&text[0..2]).ok_or_else(malformed)?;
        let to = Square::parse(&text[2..4]).ok_or_else(malformed)?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_letter(c) {
                Some(kind @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)) => {
                    Some(kind)
                }
                _ => return Err(malformed()),
            },
        };

        self.legal_moves()
            .iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::Illegal { text: text.to_string() })
    }

    /// Standard algebraic notation for a legal move, with check and mate marks.
    pub fn to_san(&mut self, mv: Move) -> String {
        let mut san = String::new();
        let from = mv.from();
        let to = mv.to();

        if mv.kind() == MoveKind::Castle {
            san.push_str(if to.file() > from.file() { "O-O" } else { "O-O-O" });
        } else {
            let kind = self.piece_on(from).map_or(PieceKind::Pawn, |p| p.kind);
            let is_capture = matches!(mv.kind(), MoveKind::Capture) || self.piece_on(to).is_some();

            if kind == PieceKind::Pawn {
                if is_capture {
                    san.push(from.file_char());
                }
            } else {
                san.push(kind.letter().to_ascii_uppercase());
                san.push_str(&self.disambiguation(mv, kind));
            }
            if is_capture {
                san.push('x');
            }
            san.push_str(&to.to_string());
            if let Some(promoted) = mv.promotion_piece() {
                san.push('=');
                san.push(promoted.letter().to_ascii_uppercase());
            }
        }

        if self.make_move(mv) && self.in_check() {
            san.push(if self.has_legal_move() { '+' } else { '#' });
        }
        self.unmake_move(mv);
        san
    }

    /// File, rank or square of the origin when another piece of the same kind
    /// could also legally reach the destination.
    fn disambiguation(&mut self, mv: Move, kind: PieceKind) -> String {
        let rivals: Vec<Square> = self
            .legal_moves()
            .iter()
            .filter(|other| {
                other.to() == mv.to()
                    && other.from() != mv.from()
                    && self.piece_on(other.from()).map(|p| p.kind) == Some(kind)
            })
            .map(|other| other.from())
            .collect();

        let from = mv.from();
        if rivals.is_empty() {
            String::new()
        } else if rivals.iter().all(|sq| sq.file() != from.file()) {
            from.file_char().to_string()
        } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
            from.rank_char().to_string()
        } else {
            from.to_string()
        }
    }

    /// Resolve SAN text (`Nbd7`, `exd5`, `O-O`, `e8=Q+`) to a legal move.
    pub fn parse_san(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let wanted = text.trim_end_matches(['+', '#', '!', '?']).replace('0', "O");
        if wanted.is_empty() {
            return Err(MoveParseError::Malformed { text: text.to_string() });
        }

        let candidates: Vec<Move> = self.legal_moves().iter().collect();
        let mut found = None;
        for mv in candidates {
            let san = self.to_san(mv);
            if san.trim_end_matches(['+', '#']) == wanted {
                if found.is_some() {
                    return Err(MoveParseError::Ambiguous { text: text.to_string() });
                }
                found = Some(mv);
            }
        }
        found.ok_or_else(|| MoveParseError::Illegal { text: text.to_string() })
    }
}
