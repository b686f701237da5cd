use crate::constants::{
    SAN_ARATA, SAN_BETRAY, SAN_CHECKMATE, SAN_DRAFT_FINISHED, SAN_DRAW, SAN_STALEMATE, SAN_TAKE,
    SAN_TSUKE,
};
use crate::movegen::legal_moves;
use crate::position::Position;
use crate::types::{Move, MoveType, PieceType};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SanError {
    #[error("malformed move notation: {0}")]
    Malformed(String),
    #[error("illegal move: {0}")]
    Illegal(String),
}

/// Notation for a move, without any terminal marker.
///
/// `新` marks a placement, `取` a capture, `付` a stack and `返` a betray
/// followed by the converted kinds. `終` closes a draft.
pub fn move_to_san(mv: &Move) -> String {
    let mut san = String::new();
    if mv.move_type == MoveType::Arata {
        san.push(SAN_ARATA);
    }
    san.push(mv.piece.kanji());
    if let Some(from) = mv.from {
        san.push_str(&format!("({from})"));
    }
    if mv.move_type == MoveType::Capture {
        san.push(SAN_TAKE);
    }
    san.push_str(&format!("({})", mv.to));

    if mv.move_type == MoveType::Betray {
        san.push(SAN_BETRAY);
        san.extend(mv.captured.iter().map(|p| p.piece_type.kanji()));
    } else {
        let from_tier = mv.from.map_or(0, |f| f.tier);
        if mv.move_type == MoveType::Tsuke || (mv.to.tier != 1 && mv.to.tier > from_tier) {
            san.push(SAN_TSUKE);
        }
    }

    if mv.draft_finished {
        san.push(SAN_DRAFT_FINISHED);
    }
    san
}

/// Strips a trailing checkmate, draw or repetition marker.
pub fn strip_terminal_marker(san: &str) -> &str {
    san.trim_end_matches([SAN_CHECKMATE, SAN_DRAW, SAN_STALEMATE])
}

/// Finds the legal move of `position` written as `san`.
pub fn parse_san(san: &str, position: &Position) -> Result<Move, SanError> {
    let normalized = strip_terminal_marker(san.trim());
    let mut chars = normalized.chars();
    let lead = chars.next();
    let well_formed = match lead {
        Some(SAN_ARATA) => chars.next().and_then(PieceType::from_kanji).is_some(),
        Some(ch) => PieceType::from_kanji(ch).is_some(),
        None => false,
    } && normalized.contains('(')
        && normalized.contains(')');
    if !well_formed {
        return Err(SanError::Malformed(san.to_string()));
    }

    legal_moves(position)
        .into_iter()
        .find(|mv| move_to_san(mv) == normalized)
        .ok_or_else(|| SanError::Illegal(san.to_string()))
}
