use crate::types::{Color, SetupMode, Square};

pub const SAN_TSUKE: char = '付';
pub const SAN_TAKE: char = '取';
pub const SAN_BETRAY: char = '返';
pub const SAN_ARATA: char = '新';
pub const SAN_DRAFT_FINISHED: char = '終';

pub const SAN_CHECKMATE: char = '#';
pub const SAN_DRAW: char = '=';
pub const SAN_STALEMATE: char = '停';

pub const MAX_TOWER_HEIGHT: u8 = 3;

pub const MAX_TIER_BY_SETUP_MODE: [u8; 4] = [2, 2, 3, 3];

pub const fn max_tier_for_mode(mode: SetupMode) -> u8 {
    MAX_TIER_BY_SETUP_MODE[mode as usize]
}

/// Three ranks nearest the side's own back rank, where it places pieces
/// while drafting.
pub const fn draft_ranks(color: Color) -> [u8; 3] {
    match color {
        Color::White => [7, 8, 9],
        Color::Black => [1, 2, 3],
    }
}

/// Repeats of one position that end the game.
pub const REPETITION_LIMIT: usize = 4;

/// All squares in position-string order: rank 1 first, file 9 down to 1.
pub const SQUARES: [Square; 81] = build_squares();

const fn build_squares() -> [Square; 81] {
    let mut squares = [Square::new_unchecked(1, 9); 81];
    let mut idx = 0;
    while idx < 81 {
        let rank = (idx / 9) as u8 + 1;
        let file = 9 - (idx % 9) as u8;
        squares[idx] = Square::new_unchecked(rank, file);
        idx += 1;
    }
    squares
}
