use thiserror::Error;
use tracing::trace;

use crate::board::{Board, BoardError};
use crate::fen::{encode_fen, parse_fen, starting_position, FenError};
use crate::hand::Hand;
use crate::movegen::{apply_to_board, legal_moves, legal_placements, moves_from};
use crate::probe::in_check;
use crate::types::{Color, Move, MoveList, MoveType, Piece, PieceType, SetupMode, Square};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error("board error: {0}")]
    Board(#[from] BoardError),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("move color does not match turn")]
    WrongTurn,
    #[error("missing source square for board move")]
    MissingSource,
    #[error("required hand piece does not exist")]
    MissingHandPiece,
    #[error("no move to undo")]
    EmptyHistory,
}

/// A complete game state. Applying a move yields a new value; an existing
/// position is never changed by play.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    pub hand: Hand,
    pub turn: Color,
    /// Indexed by `Color::index`; true while that side is still drafting.
    pub drafting: [bool; 2],
    pub move_number: u32,
}

impl Position {
    pub fn new(mode: SetupMode) -> Self {
        Self::from_fen(starting_position(mode)).expect("starting positions are valid")
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Ok(parse_fen(fen)?)
    }

    pub fn fen(&self) -> String {
        encode_fen(self)
    }

    pub fn mode(&self) -> SetupMode {
        self.board.mode()
    }

    pub fn is_drafting(&self, color: Color) -> bool {
        self.drafting[color.index()]
    }

    pub fn in_draft(&self) -> bool {
        self.drafting[0] || self.drafting[1]
    }

    pub fn legal_moves(&self) -> MoveList {
        legal_moves(self)
    }

    pub fn moves_from(&self, square: Square) -> MoveList {
        moves_from(self, square)
    }

    pub fn placements(&self, piece_type: Option<PieceType>) -> MoveList {
        legal_placements(self, piece_type)
    }

    /// Whether `color`'s marshal is attacked; false when it is not on the
    /// board.
    pub fn in_check(&self, color: Color) -> bool {
        in_check(&self.board, color)
    }

    /// Successor position after `mv`. Checks that the move is consistent
    /// with this position but not that it is legal.
    pub fn apply(&self, mv: &Move) -> Result<Self, PositionError> {
        if mv.color != self.turn {
            return Err(PositionError::WrongTurn);
        }

        let mut next = self.clone();
        match mv.move_type {
            MoveType::Arata => {
                if !next.hand.take(mv.moved_piece()) {
                    return Err(PositionError::MissingHandPiece);
                }
                if mv.draft_finished {
                    next.drafting[mv.color.index()] = false;
                }
            }
            MoveType::Route | MoveType::Tsuke | MoveType::Capture | MoveType::Betray => {
                let from = mv.from.ok_or(PositionError::MissingSource)?;
                match self.board.get_top(from.square)? {
                    Some((piece, tier)) if piece == mv.moved_piece() && tier == from.tier => {}
                    _ => return Err(PositionError::MissingSource),
                }
                if mv.move_type == MoveType::Betray {
                    for converted in &mv.captured {
                        if !next.hand.take(Piece::new(converted.piece_type, mv.color)) {
                            return Err(PositionError::MissingHandPiece);
                        }
                    }
                }
            }
        }
        let landed = apply_to_board(&mut next.board, mv)?;
        if landed != mv.to.tier {
            return Err(PositionError::IllegalMove(format!(
                "{} lands on tier {landed}, not {}",
                mv.piece.kanji(),
                mv.to.tier
            )));
        }

        next.turn = self.next_turn(mv, next.drafting);
        if self.counts_full_move(mv, next.drafting) {
            next.move_number = next.move_number.saturating_add(1);
        }

        trace!(
            kind = mv.move_type.name(),
            piece = ?mv.piece,
            from = ?mv.from.map(|f| f.to_string()),
            to = %mv.to,
            turn = %next.turn,
            move_number = next.move_number,
            "applied move"
        );
        Ok(next)
    }

    /// While both sides share a draft status play alternates; once they
    /// differ the side still drafting keeps the turn. White moves first once
    /// both drafts are over.
    fn next_turn(&self, mv: &Move, drafting_after: [bool; 2]) -> Color {
        let [white, black] = drafting_after;
        if white == black {
            if mv.draft_finished && self.turn == Color::White {
                self.turn
            } else {
                self.turn.opposite()
            }
        } else if !black && self.turn == Color::Black {
            Color::White
        } else if !white && self.turn == Color::White {
            Color::Black
        } else {
            self.turn
        }
    }

    fn counts_full_move(&self, mv: &Move, drafting_after: [bool; 2]) -> bool {
        let [white, black] = drafting_after;
        match mv.color {
            Color::Black => !white || !black,
            Color::White => mv.draft_finished && self.is_drafting(Color::White),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(SetupMode::Beginner)
    }
}
