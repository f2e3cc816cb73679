//! Core chess model: bitboards, attack tables, positions with make/unmake,
//! pseudo-legal move generation, move text and perft.

pub mod attacks;
mod bitboard;
mod cache;
mod castling;
mod chess_move;
mod color;
mod error;
mod fen;
mod make_move;
mod movegen;
mod notation;
mod perft;
mod piece;
mod position;
mod square;
mod zobrist;

pub use bitboard::Bitboard;
pub use cache::{CacheEntry, SizedCache};
pub use castling::{CastlePath, CastleRights, CastleSide};
pub use chess_move::{Move, MoveKind, PROMOTION_KINDS, ScoredMove};
pub use color::Color;
pub use error::{BoardError, CacheError, FenError, MoveParseError};
pub use fen::STARTING_FEN;
pub use movegen::{MoveList, generate_captures, generate_moves};
pub use perft::{PerftEntry, divide, perft, perft_cached};
pub use piece::{Piece, PieceKind};
pub use position::{MAX_GAME_PLY, Position, Pretty};
pub use square::Square;
