use std::fmt;

use tracing::{debug, info};

use crate::board::{Board, BoardError, Tower};
use crate::constants::{REPETITION_LIMIT, SAN_CHECKMATE, SAN_DRAW, SAN_STALEMATE};
use crate::fen::{repetition_key, starting_position, ADVANCED_POSITION};
use crate::position::{Position, PositionError};
use crate::san::{move_to_san, parse_san, SanError};
use crate::types::{Color, HandPiece, Move, MoveList, Piece, PieceType, SetupMode, Square};

/// One played move with the positions on either side of it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRecord {
    pub mv: Move,
    /// Notation including any terminal marker.
    pub san: String,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Termination {
    MarshalCaptured,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    FourfoldRepetition,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MarshalCaptured => "marshal captured",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
            Self::InsufficientMaterial => "insufficient material",
            Self::FourfoldRepetition => "fourfold repetition",
        })
    }
}

/// A side whose marshal is neither on the board nor in hand has lost it.
pub fn is_marshal_captured(position: &Position) -> bool {
    Color::BOTH.into_iter().any(|color| {
        position.board.find_marshal(color).is_none()
            && !position
                .hand
                .contains(Piece::new(PieceType::Marshal, color))
    })
}

pub fn in_check(position: &Position) -> bool {
    position.in_check(position.turn)
}

fn no_escape(position: &Position) -> bool {
    position.legal_moves().is_empty()
}

pub fn is_checkmate(position: &Position) -> bool {
    if position.in_draft() || is_marshal_captured(position) {
        return false;
    }
    in_check(position) && no_escape(position)
}

pub fn is_stalemate(position: &Position) -> bool {
    if position.in_draft() || is_marshal_captured(position) {
        return false;
    }
    !in_check(position) && no_escape(position)
}

/// Only the two marshals remain, apart, with nothing else in either hand.
pub fn is_insufficient_material(position: &Position) -> bool {
    if position.in_draft() || position.hand.has_non_marshal() {
        return false;
    }

    let mut marshals = Vec::with_capacity(2);
    for (at, piece) in position.board.pieces() {
        if piece.piece_type != PieceType::Marshal {
            return false;
        }
        marshals.push((at.square, piece.color));
    }

    match marshals.as_slice() {
        [(a, ca), (b, cb)] if ca != cb => a.distance(*b) > 1,
        _ => false,
    }
}

pub fn is_fourfold_repetition(position: &Position, history: &[MoveRecord]) -> bool {
    let current = position.fen();
    let key = repetition_key(&current);
    let earlier = history
        .iter()
        .filter(|record| repetition_key(&record.before) == key)
        .count();
    earlier + 1 >= REPETITION_LIMIT
}

pub fn is_draw(position: &Position, history: &[MoveRecord]) -> bool {
    is_stalemate(position)
        || is_fourfold_repetition(position, history)
        || is_insufficient_material(position)
}

/// Why the game has ended, if it has. Never ends during the draft.
pub fn termination(position: &Position, history: &[MoveRecord]) -> Option<Termination> {
    if position.in_draft() {
        return None;
    }
    if is_marshal_captured(position) {
        return Some(Termination::MarshalCaptured);
    }
    if is_fourfold_repetition(position, history) {
        return Some(Termination::FourfoldRepetition);
    }
    if is_insufficient_material(position) {
        return Some(Termination::InsufficientMaterial);
    }
    if no_escape(position) {
        return Some(if in_check(position) {
            Termination::Checkmate
        } else {
            Termination::Stalemate
        });
    }
    None
}

pub fn is_game_over(position: &Position, history: &[MoveRecord]) -> bool {
    termination(position, history).is_some()
}

fn terminal_marker(termination: Option<Termination>) -> Option<char> {
    match termination? {
        Termination::Checkmate => Some(SAN_CHECKMATE),
        Termination::Stalemate | Termination::InsufficientMaterial => Some(SAN_DRAW),
        Termination::FourfoldRepetition => Some(SAN_STALEMATE),
        Termination::MarshalCaptured => None,
    }
}

/// A game in progress: the current position plus the moves that led to it.
#[derive(Debug, Clone)]
pub struct Gungi {
    position: Position,
    history: Vec<MoveRecord>,
    initial: String,
}

impl Gungi {
    pub fn new(mode: SetupMode) -> Self {
        Self {
            position: Position::new(mode),
            history: Vec::new(),
            initial: starting_position(mode).to_string(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let position = Position::from_fen(fen)?;
        debug!(fen, "loaded position");
        Ok(Self {
            position,
            history: Vec::new(),
            initial: fen.to_string(),
        })
    }

    /// Replaces the position and forgets the history.
    pub fn load(&mut self, fen: &str) -> Result<(), PositionError> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }

    /// Back to the position the session started from.
    pub fn reset(&mut self) {
        match Position::from_fen(&self.initial) {
            Ok(position) => self.position = position,
            Err(_) => self.position = Position::new(self.position.mode()),
        }
        self.history.clear();
    }

    /// Empty board with both full armies in hand.
    pub fn clear(&mut self) {
        self.initial = ADVANCED_POSITION.to_string();
        self.position = Position::new(SetupMode::Advanced);
        self.history.clear();
    }

    pub fn fen(&self) -> String {
        self.position.fen()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn board(&self) -> &Board {
        &self.position.board
    }

    pub fn get(&self, square: Square) -> Result<Option<&Tower>, BoardError> {
        self.position.board.get(square)
    }

    pub fn get_top(&self, square: Square) -> Result<Option<(Piece, u8)>, BoardError> {
        self.position.board.get_top(square)
    }

    pub fn hand(&self, color: Color) -> Vec<HandPiece> {
        self.position.hand.for_color(color).copied().collect()
    }

    pub fn turn(&self) -> Color {
        self.position.turn
    }

    pub fn mode(&self) -> SetupMode {
        self.position.mode()
    }

    pub fn move_number(&self) -> u32 {
        self.position.move_number
    }

    pub fn in_draft(&self) -> bool {
        self.position.in_draft()
    }

    pub fn is_drafting(&self, color: Color) -> bool {
        self.position.is_drafting(color)
    }

    /// Legal moves; none once the game is over.
    pub fn moves(&self) -> MoveList {
        if self.is_game_over() {
            return MoveList::new();
        }
        self.position.legal_moves()
    }

    /// Legal moves of the piece on top of `square`.
    pub fn moves_for_square(&self, square: Square) -> Result<MoveList, BoardError> {
        self.position.board.get(square)?;
        if self.is_game_over() {
            return Ok(MoveList::new());
        }
        Ok(self.position.moves_from(square))
    }

    pub fn moves_for_hand(&self, piece_type: PieceType) -> MoveList {
        if self.is_game_over() {
            return MoveList::new();
        }
        self.position.placements(Some(piece_type))
    }

    pub fn moves_san(&self) -> Vec<String> {
        self.moves().iter().map(move_to_san).collect()
    }

    pub fn make_move(&mut self, mv: &Move) -> Result<&MoveRecord, PositionError> {
        let before = self.position.fen();
        if !self.moves().contains(mv) {
            let san = move_to_san(mv);
            debug!(san = %san, fen = %before, "rejected illegal move");
            return Err(PositionError::IllegalMove(san));
        }

        let next = self.position.apply(mv)?;
        let after = next.fen();
        self.position = next;
        self.history.push(MoveRecord {
            mv: mv.clone(),
            san: move_to_san(mv),
            before,
            after,
        });

        let ended = termination(&self.position, &self.history);
        if let Some(marker) = terminal_marker(ended) {
            if let Some(record) = self.history.last_mut() {
                record.san.push(marker);
            }
        }
        if let Some(reason) = ended {
            info!(%reason, fen = %self.fen(), "game over");
        }

        self.history
            .last()
            .ok_or(PositionError::EmptyHistory)
    }

    /// Plays the legal move written as `san`; terminal markers are ignored.
    pub fn make_san_move(&mut self, san: &str) -> Result<&MoveRecord, PositionError> {
        let mv = if self.is_game_over() {
            Err(SanError::Illegal(san.to_string()))
        } else {
            parse_san(san, &self.position)
        };
        match mv {
            Ok(mv) => self.make_move(&mv),
            Err(err) => {
                debug!(san, fen = %self.fen(), %err, "rejected move notation");
                Err(PositionError::IllegalMove(san.to_string()))
            }
        }
    }

    pub fn undo(&mut self) -> Result<MoveRecord, PositionError> {
        let record = self.history.pop().ok_or(PositionError::EmptyHistory)?;
        self.position = Position::from_fen(&record.before)?;
        debug!(san = %record.san, "undid move");
        Ok(record)
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn history_san(&self) -> Vec<String> {
        self.history.iter().map(|record| record.san.clone()).collect()
    }

    /// Pieces of `color` taken by capture or betray over the whole game.
    pub fn captured(&self, color: Color) -> Vec<HandPiece> {
        let mut out: Vec<HandPiece> = Vec::new();
        for piece in self
            .history
            .iter()
            .flat_map(|record| record.mv.captured.iter())
            .filter(|piece| piece.color == color)
        {
            match out
                .iter_mut()
                .find(|hp| hp.piece_type == piece.piece_type)
            {
                Some(hp) => hp.count += 1,
                None => out.push(HandPiece::new(piece.piece_type, color, 1)),
            }
        }
        out
    }

    pub fn in_check(&self) -> bool {
        in_check(&self.position)
    }

    pub fn is_checkmate(&self) -> bool {
        is_checkmate(&self.position)
    }

    pub fn is_stalemate(&self) -> bool {
        is_stalemate(&self.position)
    }

    pub fn is_insufficient_material(&self) -> bool {
        is_insufficient_material(&self.position)
    }

    pub fn is_fourfold_repetition(&self) -> bool {
        is_fourfold_repetition(&self.position, &self.history)
    }

    pub fn is_draw(&self) -> bool {
        is_draw(&self.position, &self.history)
    }

    pub fn is_marshal_captured(&self) -> bool {
        is_marshal_captured(&self.position)
    }

    pub fn termination(&self) -> Option<Termination> {
        termination(&self.position, &self.history)
    }

    pub fn is_game_over(&self) -> bool {
        is_game_over(&self.position, &self.history)
    }
}

impl Default for Gungi {
    fn default() -> Self {
        Self::new(SetupMode::Beginner)
    }
}
