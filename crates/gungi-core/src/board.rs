use crate::constants::{max_tier_for_mode, MAX_TOWER_HEIGHT, SQUARES};
use crate::types::{Color, Piece, PieceType, SetupMode, Square, TieredSquare};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("square out of bounds")]
    OutOfBounds,
    #[error("exceeds max tier for setup mode")]
    ExceedsModeMaxTier,
}

/// Stack of up to three pieces; index 0 is tier 1. Serializes as the list
/// of pieces bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Piece>", into = "Vec<Piece>"))]
pub struct Tower {
    pieces: [Option<Piece>; 3],
    height: u8,
}

impl Tower {
    pub const fn height(&self) -> u8 {
        self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.height == 0
    }

    pub fn top(&self) -> Option<(Piece, u8)> {
        if self.height == 0 {
            None
        } else {
            self.pieces[usize::from(self.height - 1)].map(|piece| (piece, self.height))
        }
    }

    /// Piece at a 1-based tier.
    pub fn at(&self, tier: u8) -> Option<Piece> {
        if tier == 0 || tier > self.height {
            return None;
        }
        self.pieces[usize::from(tier - 1)]
    }

    /// Pieces bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = Piece> + '_ {
        self.pieces[..usize::from(self.height)]
            .iter()
            .copied()
            .flatten()
    }

    pub fn contains_type(&self, piece_type: PieceType) -> bool {
        self.iter().any(|piece| piece.piece_type == piece_type)
    }

    pub fn count_color(&self, color: Color) -> u8 {
        self.iter().filter(|piece| piece.color == color).count() as u8
    }

    fn push(&mut self, piece: Piece) {
        self.pieces[usize::from(self.height)] = Some(piece);
        self.height += 1;
    }

    fn pop(&mut self) -> Option<Piece> {
        if self.height == 0 {
            return None;
        }
        let idx = usize::from(self.height - 1);
        let piece = self.pieces[idx].take();
        self.height -= 1;
        piece
    }
}

impl TryFrom<Vec<Piece>> for Tower {
    type Error = BoardError;

    fn try_from(pieces: Vec<Piece>) -> Result<Self, Self::Error> {
        if pieces.len() > usize::from(MAX_TOWER_HEIGHT) {
            return Err(BoardError::ExceedsModeMaxTier);
        }
        let mut tower = Self::default();
        for piece in pieces {
            tower.push(piece);
        }
        Ok(tower)
    }
}

impl From<Tower> for Vec<Piece> {
    fn from(tower: Tower) -> Self {
        tower.iter().collect()
    }
}

/// 9x9 grid of towers for one setup mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "BoardRepr", into = "BoardRepr"))]
pub struct Board {
    mode: SetupMode,
    towers: [[Tower; 9]; 9],
}

impl Board {
    pub fn empty(mode: SetupMode) -> Self {
        Self {
            mode,
            towers: [[Tower::default(); 9]; 9],
        }
    }

    pub const fn mode(&self) -> SetupMode {
        self.mode
    }

    pub const fn max_tier(&self) -> u8 {
        max_tier_for_mode(self.mode)
    }

    /// Occupied tower at `square`; `Ok(None)` for an empty square.
    pub fn get(&self, square: Square) -> Result<Option<&Tower>, BoardError> {
        let (r, f) = square_coords(square).ok_or(BoardError::OutOfBounds)?;
        let tower = &self.towers[r][f];
        Ok((tower.height > 0).then_some(tower))
    }

    pub fn get_top(&self, square: Square) -> Result<Option<(Piece, u8)>, BoardError> {
        Ok(self.get(square)?.and_then(Tower::top))
    }

    /// Occupied tower at an on-board square; off-board squares read as empty.
    pub(crate) fn occupied(&self, square: Square) -> Option<&Tower> {
        self.get(square).ok().flatten()
    }

    pub(crate) fn top_at(&self, square: Square) -> Option<(Piece, u8)> {
        self.occupied(square).and_then(Tower::top)
    }

    pub(crate) fn height(&self, square: Square) -> u8 {
        self.occupied(square).map_or(0, Tower::height)
    }

    pub fn tower_copy(&self, square: Square) -> Result<Tower, BoardError> {
        let (r, f) = square_coords(square).ok_or(BoardError::OutOfBounds)?;
        Ok(self.towers[r][f])
    }

    pub fn set_tower(&mut self, square: Square, tower: Tower) -> Result<(), BoardError> {
        let (r, f) = square_coords(square).ok_or(BoardError::OutOfBounds)?;
        self.towers[r][f] = tower;
        Ok(())
    }

    /// Stacks `piece` on `square` and returns the tier it lands on.
    pub fn put(&mut self, piece: Piece, square: Square) -> Result<u8, BoardError> {
        let max_tier = self.max_tier();
        let (r, f) = square_coords(square).ok_or(BoardError::OutOfBounds)?;
        let tower = &mut self.towers[r][f];
        if tower.height >= max_tier || tower.height >= MAX_TOWER_HEIGHT {
            return Err(BoardError::ExceedsModeMaxTier);
        }
        tower.push(piece);
        Ok(tower.height)
    }

    pub fn remove_top(&mut self, square: Square) -> Result<Option<Piece>, BoardError> {
        let (r, f) = square_coords(square).ok_or(BoardError::OutOfBounds)?;
        Ok(self.towers[r][f].pop())
    }

    /// Removes one tower piece per listed piece and compacts the rest
    /// downwards. Returns how many were removed.
    pub fn remove(&mut self, square: Square, pieces: &[Piece]) -> Result<usize, BoardError> {
        let (r, f) = square_coords(square).ok_or(BoardError::OutOfBounds)?;
        let tower = self.towers[r][f];
        let mut pending: Vec<Piece> = pieces.to_vec();
        let mut keep = Tower::default();
        let mut removed = 0usize;
        for piece in tower.iter() {
            if let Some(idx) = pending.iter().position(|target| *target == piece) {
                pending.swap_remove(idx);
                removed += 1;
            } else {
                keep.push(piece);
            }
        }
        self.towers[r][f] = keep;
        Ok(removed)
    }

    /// Flips the color of one tower piece per listed piece, bottom first.
    pub fn convert(&mut self, square: Square, pieces: &[Piece]) -> Result<usize, BoardError> {
        let (r, f) = square_coords(square).ok_or(BoardError::OutOfBounds)?;
        let tower = &mut self.towers[r][f];
        let mut pending: Vec<Piece> = pieces.to_vec();
        let mut converted = 0usize;

        for piece in tower.pieces[..usize::from(tower.height)]
            .iter_mut()
            .flatten()
        {
            if let Some(idx) = pending.iter().position(|target| target == piece) {
                pending.swap_remove(idx);
                converted += 1;
                piece.color = piece.color.opposite();
            }
        }

        Ok(converted)
    }

    /// Occupied squares with their towers, in position-string order.
    pub fn towers(&self) -> impl Iterator<Item = (Square, &Tower)> + '_ {
        SQUARES
            .iter()
            .filter_map(move |&square| self.occupied(square).map(|tower| (square, tower)))
    }

    /// Every piece on the board with its tiered square.
    pub fn pieces(&self) -> impl Iterator<Item = (TieredSquare, Piece)> + '_ {
        self.towers().flat_map(|(square, tower)| {
            tower.iter().enumerate().map(move |(idx, piece)| {
                (TieredSquare::new_unchecked(square, idx as u8 + 1), piece)
            })
        })
    }

    pub fn find_marshal(&self, color: Color) -> Option<TieredSquare> {
        let marshal = Piece::new(PieceType::Marshal, color);
        self.pieces()
            .find(|(_, piece)| *piece == marshal)
            .map(|(at, _)| at)
    }

    pub fn count(&self, piece: Piece) -> usize {
        self.pieces().filter(|(_, p)| *p == piece).count()
    }

    /// Squares whose top piece belongs to `color`.
    pub fn squares_topped_by(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        self.towers().filter_map(move |(square, tower)| {
            tower
                .top()
                .filter(|(piece, _)| piece.color == color)
                .map(|_| square)
        })
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct BoardRepr {
    mode: SetupMode,
    towers: [[Tower; 9]; 9],
}

#[cfg(feature = "serde")]
impl TryFrom<BoardRepr> for Board {
    type Error = BoardError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        let max_tier = repr.mode.max_tier();
        if repr.towers.iter().flatten().any(|tower| tower.height > max_tier) {
            return Err(BoardError::ExceedsModeMaxTier);
        }
        Ok(Self {
            mode: repr.mode,
            towers: repr.towers,
        })
    }
}

#[cfg(feature = "serde")]
impl From<Board> for BoardRepr {
    fn from(board: Board) -> Self {
        Self {
            mode: board.mode,
            towers: board.towers,
        }
    }
}

fn square_coords(square: Square) -> Option<(usize, usize)> {
    if !(1..=9).contains(&square.rank) || !(1..=9).contains(&square.file) {
        return None;
    }
    Some((usize::from(square.rank - 1), usize::from(9 - square.file)))
}
