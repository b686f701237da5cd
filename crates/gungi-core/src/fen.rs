use crate::board::{Board, BoardError};
use crate::hand::Hand;
use crate::position::Position;
use crate::types::{Color, HandPiece, Piece, SetupMode, Square};
use thiserror::Error;

pub const INTRO_POSITION: &str =
    "3img3/1s2n2s1/d1fwdwf1d/9/9/9/D1FWDWF1D/1S2N2S1/3GMI3 J2N2R2D1/j2n2r2d1 w 0 - 1";
pub const BEGINNER_POSITION: &str =
    "3img3/1ra1n1as1/d1fwdwf1d/9/9/9/D1FWDWF1D/1SA1N1AR1/3GMI3 J2N2S1R1D1/j2n2s1r1d1 w 1 - 1";
pub const INTERMEDIATE_POSITION: &str =
    "9/9/9/9/9/9/9/9/9 M1G1I1J2W2N3R2S2F2D4C1A2K1T1/m1g1i1j2w2n3r2s2f2d4c1a2k1t1 w 2 wb 1";
pub const ADVANCED_POSITION: &str =
    "9/9/9/9/9/9/9/9/9 M1G1I1J2W2N3R2S2F2D4C1A2K1T1/m1g1i1j2w2n3r2s2f2d4c1a2k1t1 w 3 wb 1";

pub const fn starting_position(mode: SetupMode) -> &'static str {
    match mode {
        SetupMode::Intro => INTRO_POSITION,
        SetupMode::Beginner => BEGINNER_POSITION,
        SetupMode::Intermediate => INTERMEDIATE_POSITION,
        SetupMode::Advanced => ADVANCED_POSITION,
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("{0}")]
    Validation(String),
    #[error("board error: {0}")]
    Board(#[from] BoardError),
}

fn invalid(reason: impl Into<String>) -> FenError {
    FenError::Validation(reason.into())
}

/// One square's worth of a rank description.
enum RankToken {
    Empty(u8),
    Tower(Vec<Piece>),
}

/// Splits a rank into empty runs, single pieces and towers. A tower is a
/// `:`-joined group between bars; adjacent towers may share a bar.
fn tokenize_rank(rank: &str, rank_no: usize) -> Result<Vec<RankToken>, FenError> {
    let mut tokens = Vec::new();
    let mut squares = 0usize;

    for part in rank.split('|') {
        if part.contains(':') {
            let codes: Vec<&str> = part.split(':').collect();
            if codes.len() > 3 {
                return Err(invalid(format!(
                    "1st field (piece positions) is invalid [tower size] @({}-{})",
                    rank_no,
                    9usize.saturating_sub(squares)
                )));
            }
            let mut pieces = Vec::with_capacity(codes.len());
            for code in codes {
                let mut chars = code.chars();
                let piece = match (chars.next(), chars.next()) {
                    (Some(ch), None) => Piece::from_fen_char(ch),
                    _ => None,
                };
                pieces.push(piece.ok_or_else(|| {
                    invalid("1st field (piece positions) is invalid [invalid piece]")
                })?);
            }
            tokens.push(RankToken::Tower(pieces));
            squares += 1;
            continue;
        }

        let mut after_digit = false;
        for ch in part.chars() {
            if let Some(n) = ch.to_digit(10) {
                if n == 0 || after_digit {
                    return Err(invalid(format!(
                        "1st field (piece positions) is invalid [invalid empty run] in rank: {rank_no}"
                    )));
                }
                tokens.push(RankToken::Empty(n as u8));
                squares += n as usize;
                after_digit = true;
            } else {
                let piece = Piece::from_fen_char(ch).ok_or_else(|| {
                    invalid("1st field (piece positions) is invalid [invalid piece]")
                })?;
                tokens.push(RankToken::Tower(vec![piece]));
                squares += 1;
                after_digit = false;
            }
        }
    }

    if squares != 9 {
        return Err(invalid(format!(
            "1st field (piece positions) is invalid [expected 9 squares, received {squares}] in rank: {rank_no}"
        )));
    }
    Ok(tokens)
}

fn parse_hand_segment(segment: &str, color: Color) -> Result<Vec<HandPiece>, FenError> {
    if segment == "-" {
        return Ok(Vec::new());
    }
    let chars: Vec<char> = segment.chars().collect();
    if chars.is_empty() || chars.len() % 2 != 0 {
        return Err(invalid(
            "2nd field (hand pieces) is invalid [invalid piece count]",
        ));
    }

    let mut entries: Vec<HandPiece> = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks(2) {
        let piece = Piece::from_fen_char(pair[0])
            .filter(|piece| piece.color == color)
            .ok_or_else(|| invalid("2nd field (hand pieces) is invalid [invalid piece]"))?;
        let count = pair[1]
            .to_digit(10)
            .filter(|n| *n > 0)
            .ok_or_else(|| invalid("2nd field (hand pieces) is invalid [invalid count]"))?;
        if entries.iter().any(|hp| hp.piece_type == piece.piece_type) {
            return Err(invalid(
                "2nd field (hand pieces) is invalid [duplicate piece]",
            ));
        }
        entries.push(HandPiece::new(piece.piece_type, color, count as u8));
    }
    Ok(entries)
}

fn parse_move_number(field: &str) -> Result<u32, FenError> {
    let err = || {
        invalid(format!(
            "6th field (full move number) is invalid [expected an integer, received {field}]"
        ))
    };
    if field.is_empty() || field.starts_with('0') || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    field.parse::<u32>().map_err(|_| err())
}

fn parse_drafting(field: &str) -> Result<[bool; 2], FenError> {
    match field {
        "-" => Ok([false, false]),
        "w" => Ok([true, false]),
        "b" => Ok([false, true]),
        "wb" => Ok([true, true]),
        _ => Err(invalid("5th field (drafting availability) is invalid")),
    }
}

struct Fields {
    ranks: Vec<Vec<RankToken>>,
    hands: [Vec<HandPiece>; 2],
    turn: Color,
    mode: SetupMode,
    drafting: [bool; 2],
    move_number: u32,
}

fn split_fields(fen: &str) -> Result<Fields, FenError> {
    let parts: Vec<&str> = fen.split(' ').collect();
    if parts.len() != 6 {
        return Err(invalid(format!("expected 6 fields, received {}", parts.len())));
    }

    let rank_descs: Vec<&str> = parts[0].split('/').collect();
    if rank_descs.len() != 9 {
        return Err(invalid(format!(
            "1st field (piece positions) is invalid [expected 9 ranks, received {}]",
            rank_descs.len()
        )));
    }
    let ranks = rank_descs
        .iter()
        .enumerate()
        .map(|(idx, desc)| tokenize_rank(desc, idx + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let hand_segments: Vec<&str> = parts[1].split('/').collect();
    if hand_segments.len() != 2 {
        return Err(invalid(format!(
            "2nd field (hand pieces) is invalid [expected 2 hands, received {}]",
            hand_segments.len()
        )));
    }
    let hands = [
        parse_hand_segment(hand_segments[0], Color::White)?,
        parse_hand_segment(hand_segments[1], Color::Black)?,
    ];

    let turn = match parts[2] {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(invalid(format!(
                "3rd field (active player) is invalid [expected 'w' or 'b', received {other}]"
            )))
        }
    };

    let mode = match parts[3] {
        "0" => SetupMode::Intro,
        "1" => SetupMode::Beginner,
        "2" => SetupMode::Intermediate,
        "3" => SetupMode::Advanced,
        other => {
            return Err(invalid(format!(
                "4th field (setup mode) is invalid [expected '0', '1', '2', or '3', received {other}]"
            )))
        }
    };

    check_tower_heights(&ranks, mode)?;

    Ok(Fields {
        ranks,
        hands,
        turn,
        mode,
        drafting: parse_drafting(parts[4])?,
        move_number: parse_move_number(parts[5])?,
    })
}

/// Rejects towers taller than the setup mode allows.
fn check_tower_heights(ranks: &[Vec<RankToken>], mode: SetupMode) -> Result<(), FenError> {
    let max_tier = usize::from(mode.max_tier());
    for (ri, tokens) in ranks.iter().enumerate() {
        let mut file = 9usize;
        for token in tokens {
            match token {
                RankToken::Empty(n) => file = file.saturating_sub(usize::from(*n)),
                RankToken::Tower(pieces) => {
                    if pieces.len() > max_tier {
                        return Err(invalid(format!(
                            "1st field (piece positions) is invalid [tower size exceeds mode max tier {max_tier}] @({}-{file})",
                            ri + 1
                        )));
                    }
                    file = file.saturating_sub(1);
                }
            }
        }
    }
    Ok(())
}

/// Structural check of a position string; says nothing about legality.
pub fn validate_fen(fen: &str) -> Result<(), FenError> {
    split_fields(fen).map(|_| ())
}

pub fn parse_fen(fen: &str) -> Result<Position, FenError> {
    let fields = split_fields(fen)?;

    let mut board = Board::empty(fields.mode);
    for (ri, tokens) in fields.ranks.into_iter().enumerate() {
        let rank = (ri + 1) as u8;
        let mut file = 9u8;
        for token in tokens {
            match token {
                RankToken::Empty(n) => file = file.saturating_sub(n),
                RankToken::Tower(pieces) => {
                    let square = Square::new_unchecked(rank, file);
                    for piece in pieces {
                        board.put(piece, square)?;
                    }
                    file = file.saturating_sub(1);
                }
            }
        }
    }

    let [white, black] = fields.hands;
    let hand: Hand = white.into_iter().chain(black).collect();

    Ok(Position {
        board,
        hand,
        turn: fields.turn,
        drafting: fields.drafting,
        move_number: fields.move_number,
    })
}

pub fn encode_fen(position: &Position) -> String {
    format!(
        "{} {} {} {} {} {}",
        encode_placement(&position.board),
        encode_hands(&position.hand),
        position.turn.to_code(),
        position.mode().to_code(),
        match position.drafting {
            [false, false] => "-",
            [true, false] => "w",
            [false, true] => "b",
            [true, true] => "wb",
        },
        position.move_number
    )
}

/// Placement and hand fields only; equal keys mean a repeated position.
pub fn repetition_key(fen: &str) -> &str {
    match fen.match_indices(' ').nth(1) {
        Some((idx, _)) => &fen[..idx],
        None => fen,
    }
}

fn encode_placement(board: &Board) -> String {
    let mut placement = String::new();
    for rank in 1..=9u8 {
        let mut empties = 0u32;
        for file in (1..=9u8).rev() {
            let square = Square::new_unchecked(rank, file);
            let Some(tower) = board.occupied(square) else {
                empties += 1;
                continue;
            };
            if empties > 0 {
                placement.push_str(&empties.to_string());
                empties = 0;
            }
            if tower.height() > 1 {
                placement.push('|');
                for (i, piece) in tower.iter().enumerate() {
                    if i > 0 {
                        placement.push(':');
                    }
                    placement.push(piece.fen_char());
                }
                placement.push('|');
            } else {
                placement.extend(tower.iter().map(Piece::fen_char));
            }
        }
        if empties > 0 {
            placement.push_str(&empties.to_string());
        }
        if rank < 9 {
            placement.push('/');
        }
    }
    placement
}

fn encode_hands(hand: &Hand) -> String {
    let mut out = String::new();
    for (i, color) in Color::BOTH.into_iter().enumerate() {
        if i > 0 {
            out.push('/');
        }
        let start = out.len();
        for hp in hand.for_color(color) {
            out.push(Piece::new(hp.piece_type, color).fen_char());
            out.push_str(&hp.count.to_string());
        }
        if out.len() == start {
            out.push('-');
        }
    }
    out
}
