//! Reach computation shared by move generation and attack detection.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::types::{Color, Piece, PieceType, Square};

/// Direction vectors `(d_rank, d_file)` from White's point of view, where
/// forward is toward rank 1. Black uses them negated.
pub const DIRS: [(i8, i8); 8] = [
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, 0),
    (1, -1),
];

/// Reach of one piece kind in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    None,
    /// Starts `start` squares away and runs `tier + carry - 1` squares.
    Finite { start: u8, carry: u8 },
    Infinite,
}

const NO: Probe = Probe::None;
const INF: Probe = Probe::Infinite;
const ONE: Probe = Probe::Finite { start: 1, carry: 1 };
const ONE_UP: Probe = Probe::Finite { start: 1, carry: 2 };
const TWO: Probe = Probe::Finite { start: 2, carry: 1 };
const THREE: Probe = Probe::Finite { start: 3, carry: 1 };

/// Indexed by `PieceType as usize`, then by `DIRS` index.
pub const PIECE_PROBES: [[Probe; 8]; 14] = [
    // marshal
    [ONE, ONE, ONE, ONE, ONE, ONE, ONE, ONE],
    // general
    [ONE, INF, ONE, INF, INF, ONE, INF, ONE],
    // lieutenant general
    [INF, ONE, INF, ONE, ONE, INF, ONE, INF],
    // major general
    [ONE, ONE, ONE, ONE, ONE, NO, ONE, NO],
    // warrior
    [ONE, ONE, ONE, NO, NO, NO, ONE, NO],
    // lancer
    [ONE, ONE_UP, ONE, NO, NO, NO, ONE, NO],
    // rider
    [NO, ONE_UP, NO, ONE, ONE, NO, ONE_UP, NO],
    // spy
    [ONE_UP, NO, ONE_UP, NO, NO, ONE_UP, NO, ONE_UP],
    // fortress
    [NO, ONE, NO, ONE, ONE, ONE, NO, ONE],
    // soldier
    [NO, ONE, NO, NO, NO, NO, ONE, NO],
    // cannon
    [NO, THREE, NO, ONE, ONE, NO, ONE, NO],
    // archer
    [TWO, TWO, TWO, NO, NO, NO, ONE, NO],
    // musketeer
    [NO, TWO, NO, NO, NO, ONE, NO, ONE],
    // tactician
    [ONE, NO, ONE, NO, NO, NO, ONE, NO],
];

pub fn probes_for(piece_type: PieceType) -> &'static [Probe; 8] {
    &PIECE_PROBES[piece_type as usize]
}

pub type SquareList = ArrayVec<Square, 81>;

pub const fn oriented(color: Color, dir: (i8, i8)) -> (i8, i8) {
    match color {
        Color::White => dir,
        Color::Black => (-dir.0, -dir.1),
    }
}

/// Squares the top piece at `origin` reaches; empty when `origin` is empty.
pub fn reachable_squares(board: &Board, origin: Square) -> SquareList {
    let mut out = SquareList::new();
    let Some((piece, tier)) = board.top_at(origin) else {
        return out;
    };

    for (idx, probe) in probes_for(piece.piece_type).iter().enumerate() {
        let (start, length) = match *probe {
            Probe::None => continue,
            Probe::Infinite => (1, None),
            Probe::Finite { start, carry } => (start, Some(tier + carry - 1)),
        };
        scan_direction(
            board,
            origin,
            piece,
            tier,
            oriented(piece.color, DIRS[idx]),
            start,
            length,
            &mut out,
        );
    }
    out
}

#[allow(clippy::too_many_arguments)]
fn scan_direction(
    board: &Board,
    origin: Square,
    piece: Piece,
    tier: u8,
    (dr, df): (i8, i8),
    start: u8,
    length: Option<u8>,
    out: &mut SquareList,
) {
    // Squares jumped over on the way to the start square must not be taller.
    for step in 1..start {
        let Some(between) = origin.offset(dr * step as i8, df * step as i8) else {
            break;
        };
        if board.height(between) > tier {
            return;
        }
    }

    let Some(mut cursor) = origin.offset(dr * start as i8, df * start as i8) else {
        return;
    };
    let mut steps = 0u8;
    loop {
        let height = board.height(cursor);
        if height > tier {
            break;
        }
        if !out.contains(&cursor) {
            out.push(cursor);
        }
        if height > 0 && !piece.piece_type.is_leaper() {
            break;
        }

        steps += 1;
        if length.is_some_and(|max| steps >= max) {
            break;
        }
        match cursor.offset(dr, df) {
            Some(next) => cursor = next,
            None => break,
        }
    }
}

/// Whether any top piece of `by` reaches `square`.
pub fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    board
        .squares_topped_by(by)
        .any(|origin| reachable_squares(board, origin).contains(&square))
}

/// A side without a marshal on the board is never in check.
pub fn in_check(board: &Board, color: Color) -> bool {
    board
        .find_marshal(color)
        .is_some_and(|at| is_square_attacked(board, at.square, color.opposite()))
}
