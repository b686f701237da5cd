//! Rules engine for Gungi: towers of up to three pieces on a 9x9 board,
//! a drafting opening, and a compact position string.

pub mod board;
pub mod constants;
pub mod fen;
pub mod game;
pub mod hand;
pub mod movegen;
pub mod position;
pub mod probe;
pub mod san;
pub mod types;

pub use board::{Board, BoardError, Tower};
pub use constants::SQUARES;
pub use fen::{
    encode_fen, parse_fen, validate_fen, FenError, ADVANCED_POSITION, BEGINNER_POSITION,
    INTERMEDIATE_POSITION, INTRO_POSITION,
};
pub use game::{
    in_check, is_checkmate, is_draw, is_fourfold_repetition, is_game_over,
    is_insufficient_material, is_marshal_captured, is_stalemate, termination, Gungi, MoveRecord,
    Termination,
};
pub use hand::{Hand, HandError};
pub use movegen::{legal_moves, legal_placements, moves_from, perft};
pub use position::{Position, PositionError};
pub use san::{move_to_san, parse_san, SanError};
pub use types::{
    Color, HandPiece, Move, MoveList, MoveType, Piece, PieceType, SetupMode, Square, TieredSquare,
};
