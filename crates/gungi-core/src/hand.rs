use thiserror::Error;

use crate::types::{Color, HandPiece, Piece, PieceType};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandError {
    #[error("hand entry with a zero count")]
    ZeroCount,
    #[error("hand lists the same piece twice")]
    Duplicate,
}

/// Pieces held off the board by both sides.
///
/// Holds at most one entry per (kind, color), each with a nonzero count.
/// White entries come before black ones; within a color entries keep the
/// order they were first added in, which is the order the position string
/// lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<HandPiece>", into = "Vec<HandPiece>")
)]
pub struct Hand {
    entries: Vec<HandPiece>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HandPiece> + '_ {
        self.entries.iter()
    }

    pub fn for_color(&self, color: Color) -> impl Iterator<Item = &HandPiece> + '_ {
        self.entries.iter().filter(move |hp| hp.color == color)
    }

    pub fn count(&self, piece: Piece) -> u8 {
        self.entries
            .iter()
            .find(|hp| hp.color == piece.color && hp.piece_type == piece.piece_type)
            .map_or(0, |hp| hp.count)
    }

    pub fn contains(&self, piece: Piece) -> bool {
        self.count(piece) > 0
    }

    pub fn total(&self, color: Color) -> u32 {
        self.for_color(color).map(|hp| u32::from(hp.count)).sum()
    }

    pub fn is_empty(&self, color: Color) -> bool {
        self.total(color) == 0
    }

    /// Whether either side still holds something other than a marshal.
    pub fn has_non_marshal(&self) -> bool {
        self.entries
            .iter()
            .any(|hp| hp.piece_type != PieceType::Marshal)
    }

    pub fn add(&mut self, piece: Piece, count: u8) {
        if count == 0 {
            return;
        }
        match self
            .entries
            .iter_mut()
            .find(|hp| hp.color == piece.color && hp.piece_type == piece.piece_type)
        {
            Some(hp) => hp.count = hp.count.saturating_add(count),
            None => {
                let at = match piece.color {
                    Color::White => self
                        .entries
                        .iter()
                        .position(|hp| hp.color == Color::Black)
                        .unwrap_or(self.entries.len()),
                    Color::Black => self.entries.len(),
                };
                self.entries
                    .insert(at, HandPiece::new(piece.piece_type, piece.color, count));
            }
        }
    }

    /// Removes one piece; returns `false` when none is held.
    pub fn take(&mut self, piece: Piece) -> bool {
        let Some(idx) = self
            .entries
            .iter()
            .position(|hp| hp.color == piece.color && hp.piece_type == piece.piece_type)
        else {
            return false;
        };
        self.entries[idx].count -= 1;
        if self.entries[idx].count == 0 {
            self.entries.remove(idx);
        }
        true
    }
}

impl FromIterator<HandPiece> for Hand {
    fn from_iter<I: IntoIterator<Item = HandPiece>>(iter: I) -> Self {
        let mut hand = Self::new();
        for hp in iter {
            hand.add(Piece::new(hp.piece_type, hp.color), hp.count);
        }
        hand
    }
}

impl TryFrom<Vec<HandPiece>> for Hand {
    type Error = HandError;

    fn try_from(entries: Vec<HandPiece>) -> Result<Self, Self::Error> {
        let mut hand = Self::new();
        for hp in entries {
            let piece = Piece::new(hp.piece_type, hp.color);
            if hp.count == 0 {
                return Err(HandError::ZeroCount);
            }
            if hand.contains(piece) {
                return Err(HandError::Duplicate);
            }
            hand.add(piece, hp.count);
        }
        Ok(hand)
    }
}

impl From<Hand> for Vec<HandPiece> {
    fn from(hand: Hand) -> Self {
        hand.entries
    }
}
