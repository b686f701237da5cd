use arrayvec::ArrayVec;
use tracing::trace;

use crate::board::{Board, BoardError, Tower};
use crate::constants::draft_ranks;
use crate::hand::Hand;
use crate::position::Position;
use crate::probe::{in_check, reachable_squares};
use crate::types::{Color, Move, MoveList, MoveType, Piece, PieceType, Square, TieredSquare};

/// Every legal move for the side to move: board moves, then placements.
pub fn legal_moves(position: &Position) -> MoveList {
    let mut moves = pseudo_legal_moves(position);
    retain_legal(&position.board, position.turn, &mut moves);
    moves
}

/// Legal moves of the piece on top of `square`. Empty when that piece does
/// not belong to the side to move.
pub fn moves_from(position: &Position, square: Square) -> MoveList {
    let mut moves = MoveList::new();
    if position.is_drafting(position.turn) {
        return moves;
    }
    append_board_moves(position, square, &mut moves);
    retain_legal(&position.board, position.turn, &mut moves);
    moves
}

/// Legal hand placements for the side to move, optionally restricted to one
/// piece kind.
pub fn legal_placements(position: &Position, piece_type: Option<PieceType>) -> MoveList {
    let mut moves = MoveList::new();
    let kinds: Vec<PieceType> = position
        .hand
        .for_color(position.turn)
        .map(|hp| hp.piece_type)
        .filter(|kind| piece_type.is_none_or(|wanted| wanted == *kind))
        .collect();
    for kind in kinds {
        append_placements(position, kind, &mut moves);
    }
    retain_legal(&position.board, position.turn, &mut moves);
    moves
}

/// Moves before the self-check filter.
pub fn pseudo_legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    if !position.is_drafting(position.turn) {
        let origins: Vec<Square> = position.board.squares_topped_by(position.turn).collect();
        for origin in origins {
            append_board_moves(position, origin, &mut moves);
        }
    }
    let kinds: Vec<PieceType> = position
        .hand
        .for_color(position.turn)
        .map(|hp| hp.piece_type)
        .collect();
    for kind in kinds {
        append_placements(position, kind, &mut moves);
    }
    moves
}

fn retain_legal(board: &Board, turn: Color, moves: &mut MoveList) {
    let mut scratch = board.clone();
    moves.retain(|mv| {
        let legal = leaves_marshal_safe(&mut scratch, turn, mv);
        if !legal {
            trace!(
                piece = ?mv.piece,
                to = %mv.to,
                kind = mv.move_type.name(),
                "rejected: leaves marshal in check"
            );
        }
        legal
    });
}

fn append_board_moves(position: &Position, origin: Square, out: &mut MoveList) {
    let board = &position.board;
    let turn = position.turn;
    let Some((piece, tier)) = board.top_at(origin) else {
        return;
    };
    if piece.color != turn {
        return;
    }

    let mode = board.mode();
    let max_tier = mode.max_tier();
    let from = TieredSquare::new_unchecked(origin, tier);

    for target in reachable_squares(board, origin) {
        let Some(tower) = board.occupied(target) else {
            out.push(Move::new(
                turn,
                piece.piece_type,
                Some(from),
                TieredSquare::new_unchecked(target, 1),
                MoveType::Route,
            ));
            continue;
        };
        let Some((top, top_tier)) = tower.top() else {
            continue;
        };

        let can_stack = top_tier < max_tier
            && top.piece_type != PieceType::Marshal
            && !tower.contains_type(PieceType::Fortress)
            && piece.piece_type != PieceType::Fortress
            && (piece.piece_type != PieceType::Marshal || mode.marshal_can_stack());

        if can_stack {
            let to = TieredSquare::new_unchecked(target, top_tier + 1);
            out.push(Move::new(
                turn,
                piece.piece_type,
                Some(from),
                to,
                MoveType::Tsuke,
            ));

            if piece.piece_type == PieceType::Tactician && top.color != turn {
                for converted in betray_subsets(tower, &position.hand, turn) {
                    let mut mv =
                        Move::new(turn, piece.piece_type, Some(from), to, MoveType::Betray);
                    mv.captured = converted;
                    out.push(mv);
                }
            }
        }

        if top.color != turn {
            let own = tower.count_color(turn);
            if piece.piece_type == PieceType::Fortress && own > 0 {
                continue;
            }
            let mut mv = Move::new(
                turn,
                piece.piece_type,
                Some(from),
                TieredSquare::new_unchecked(target, own + 1),
                MoveType::Capture,
            );
            mv.captured = tower.iter().filter(|p| p.color != turn).collect();
            out.push(mv);
        }
    }
}

/// Distinct non-empty sets of enemy pieces in `tower` that `color` can pay
/// for from hand, one piece per converted piece of the same kind.
fn betray_subsets(tower: &Tower, hand: &Hand, color: Color) -> Vec<ArrayVec<Piece, 3>> {
    let enemies: ArrayVec<Piece, 3> = tower.iter().filter(|p| p.color != color).collect();
    let mut seen: Vec<ArrayVec<PieceType, 3>> = Vec::new();
    let mut out = Vec::new();

    for mask in 1..(1usize << enemies.len()) {
        let subset: ArrayVec<Piece, 3> = enemies
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, p)| *p)
            .collect();

        let affordable = subset.iter().all(|p| {
            let needed = subset.iter().filter(|q| q.piece_type == p.piece_type).count();
            usize::from(hand.count(Piece::new(p.piece_type, color))) >= needed
        });
        if !affordable {
            continue;
        }

        let mut kinds: ArrayVec<PieceType, 3> = subset.iter().map(|p| p.piece_type).collect();
        kinds.sort();
        if seen.contains(&kinds) {
            continue;
        }
        seen.push(kinds);
        out.push(subset);
    }
    out
}

/// Ranks `color` may place on: its draft band while drafting or while its
/// marshal is still in hand, otherwise every rank from its back rank up to
/// its forward-most occupied rank.
pub fn placement_ranks(position: &Position, color: Color) -> ArrayVec<u8, 9> {
    let marshal_in_hand = position
        .hand
        .contains(Piece::new(PieceType::Marshal, color));
    if marshal_in_hand || position.is_drafting(color) {
        return draft_ranks(color).into_iter().collect();
    }
    frontline_ranks(&position.board, color)
}

fn frontline_ranks(board: &Board, color: Color) -> ArrayVec<u8, 9> {
    let walk: ArrayVec<u8, 9> = match color {
        Color::Black => (1..=9).collect(),
        Color::White => (1..=9).rev().collect(),
    };
    let has_own_piece = |rank: u8| {
        (1..=9).any(|file| {
            board
                .occupied(Square::new_unchecked(rank, file))
                .is_some_and(|tower| tower.count_color(color) > 0)
        })
    };
    let Some(front) = walk.iter().rposition(|&rank| has_own_piece(rank)) else {
        return ArrayVec::new();
    };
    walk[..=front].iter().copied().collect()
}

fn append_placements(position: &Position, piece_type: PieceType, out: &mut MoveList) {
    let color = position.turn;
    let piece = Piece::new(piece_type, color);
    if !position.hand.contains(piece) {
        return;
    }
    if piece_type != PieceType::Marshal
        && position
            .hand
            .contains(Piece::new(PieceType::Marshal, color))
    {
        return;
    }

    let board = &position.board;
    let max_tier = board.max_tier();
    let drafting = position.is_drafting(color);
    let last_piece = position.hand.total(color) == 1;

    for rank in placement_ranks(position, color) {
        for file in (1..=9).rev() {
            let target = Square::new_unchecked(rank, file);
            let tier = match board.occupied(target) {
                None => 1,
                Some(tower) => {
                    let Some((top, top_tier)) = tower.top() else {
                        continue;
                    };
                    if piece_type == PieceType::Fortress
                        || top.color != color
                        || top.piece_type == PieceType::Marshal
                        || top_tier >= max_tier
                        || tower.contains_type(PieceType::Fortress)
                    {
                        continue;
                    }
                    top_tier + 1
                }
            };

            let to = TieredSquare::new_unchecked(target, tier);
            if !drafting || !last_piece {
                out.push(Move::new(color, piece_type, None, to, MoveType::Arata));
            }
            if drafting {
                let mut mv = Move::new(color, piece_type, None, to, MoveType::Arata);
                mv.draft_finished = true;
                out.push(mv);
            }
        }
    }
}

/// Applies the board half of `mv` to `board`, checks the mover's marshal,
/// then restores the touched towers.
fn leaves_marshal_safe(board: &mut Board, color: Color, mv: &Move) -> bool {
    let from = mv.from.map(|from| from.square);
    let saved_from = from.and_then(|square| board.tower_copy(square).ok());
    let Ok(saved_to) = board.tower_copy(mv.to.square) else {
        return false;
    };

    let applied = apply_to_board(board, mv).is_ok();
    let safe = applied && !in_check(board, color);

    if let (Some(square), Some(tower)) = (from, saved_from) {
        let _ = board.set_tower(square, tower);
    }
    let _ = board.set_tower(mv.to.square, saved_to);
    safe
}

/// Board effects of a move; hand bookkeeping stays with the caller.
/// Returns the tier the moved piece lands on.
pub(crate) fn apply_to_board(board: &mut Board, mv: &Move) -> Result<u8, BoardError> {
    if let Some(from) = mv.from {
        board.remove_top(from.square)?;
    }
    match mv.move_type {
        MoveType::Capture => {
            board.remove(mv.to.square, &mv.captured)?;
        }
        MoveType::Betray => {
            board.convert(mv.to.square, &mv.captured)?;
        }
        MoveType::Route | MoveType::Tsuke | MoveType::Arata => {}
    }
    board.put(mv.moved_piece(), mv.to.square)
}

/// Number of leaf positions `depth` plies below `position`.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .filter_map(|mv| position.apply(mv).ok())
        .map(|next| perft(&next, depth - 1))
        .sum()
}
