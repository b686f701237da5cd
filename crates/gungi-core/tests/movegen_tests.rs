use gungi_core::probe::{Probe, DIRS, PIECE_PROBES};
use gungi_core::{
    move_to_san, parse_fen, parse_san, Color, Move, MoveType, Piece, PieceType, Position,
    SetupMode, Square, TieredSquare, ADVANCED_POSITION, BEGINNER_POSITION, SQUARES,
};

fn sq(rank: u8, file: u8) -> Square {
    Square::new(rank, file).expect("valid square")
}

fn position(fen: &str) -> Position {
    parse_fen(fen).expect("valid fen")
}

fn sans(moves: &[Move]) -> Vec<String> {
    moves.iter().map(move_to_san).collect()
}

fn moves_onto(position: &Position, from: Square, to: Square) -> Vec<Move> {
    position
        .moves_from(from)
        .into_iter()
        .filter(|mv| mv.to.square == to)
        .collect()
}

#[test]
fn dirs_and_piece_probes_are_tabulated() {
    assert_eq!(
        DIRS,
        [
            (-1, 1),
            (-1, 0),
            (-1, -1),
            (0, 1),
            (0, -1),
            (1, 1),
            (1, 0),
            (1, -1)
        ]
    );

    let one = Probe::Finite { start: 1, carry: 1 };
    assert_eq!(PIECE_PROBES[PieceType::Marshal as usize], [one; 8]);
    assert_eq!(
        PIECE_PROBES[PieceType::General as usize],
        [
            one,
            Probe::Infinite,
            one,
            Probe::Infinite,
            Probe::Infinite,
            one,
            Probe::Infinite,
            one,
        ]
    );
    assert_eq!(
        PIECE_PROBES[PieceType::Cannon as usize][1],
        Probe::Finite { start: 3, carry: 1 }
    );
}

#[test]
fn piece_move_generation_covers_multiple_piece_types() {
    let state = position(BEGINNER_POSITION);
    let mut seen = [0usize; 14];

    for square in SQUARES {
        if let Ok(Some((piece, _))) = state.board.get_top(square) {
            if piece.color != state.turn {
                assert!(state.moves_from(square).is_empty());
                continue;
            }
            seen[piece.piece_type as usize] += state.moves_from(square).len();
        }
    }

    let count = seen.iter().filter(|n| **n > 0).count();
    assert!(count >= 5, "expected broad piece coverage");
    assert!(seen[PieceType::Marshal as usize] > 0);
    assert!(seen[PieceType::General as usize] > 0);
    assert!(seen[PieceType::Lancer as usize] > 0);
}

#[test]
fn move_types_include_route_tsuke_and_capture() {
    let state = position(BEGINNER_POSITION);
    let all = state.legal_moves();

    assert!(all.iter().any(|m| m.move_type == MoveType::Route));
    assert!(all.iter().any(|m| m.move_type == MoveType::Tsuke));
    assert!(all.iter().any(|m| m.move_type == MoveType::Arata));

    let capture_state = position("9/9/9/9/4d4/4W4/9/9/9 -/- w 3 - 1");
    let capture_moves = capture_state.legal_moves();
    assert!(capture_moves
        .iter()
        .any(|m| m.move_type == MoveType::Capture));
}

#[test]
fn capture_clears_every_enemy_piece_in_the_tower() {
    let state = position("9/9/9/9/4|d:n|4/4|D:G|4/9/9/9 -/- w 3 - 1");
    let capture = moves_onto(&state, sq(6, 5), sq(5, 5))
        .into_iter()
        .find(|mv| mv.move_type == MoveType::Capture)
        .expect("capture generated");

    assert_eq!(capture.to.tier, 1);
    assert_eq!(capture.captured.len(), 2);

    let next = state.apply(&capture).unwrap();
    let tower: Vec<Piece> = next.board.get(sq(5, 5)).unwrap().expect("tower").iter().collect();
    assert_eq!(tower, vec![Piece::new(PieceType::General, Color::White)]);
    assert_eq!(
        next.board.get_top(sq(6, 5)),
        Ok(Some((Piece::new(PieceType::Soldier, Color::White), 1)))
    );
    assert!(next.hand.is_empty(Color::White), "captures never credit a hand");
}

#[test]
fn capture_lands_above_own_pieces_left_in_the_tower() {
    let state = position("9/9/9/9/4|J:n|4/4|D:G|4/9/9/9 -/- w 3 - 1");
    let targets = moves_onto(&state, sq(6, 5), sq(5, 5));

    let capture = targets
        .iter()
        .find(|mv| mv.move_type == MoveType::Capture)
        .expect("capture generated");
    assert_eq!(capture.to.tier, 2);
    assert_eq!(
        capture.captured.as_slice(),
        &[Piece::new(PieceType::Lancer, Color::Black)]
    );
    assert!(targets
        .iter()
        .any(|mv| mv.move_type == MoveType::Tsuke && mv.to.tier == 3));

    let next = state.apply(capture).unwrap();
    let tower: Vec<Piece> = next.board.get(sq(5, 5)).unwrap().expect("tower").iter().collect();
    assert_eq!(
        tower,
        vec![
            Piece::new(PieceType::MajorGeneral, Color::White),
            Piece::new(PieceType::General, Color::White),
        ]
    );
}

#[test]
fn nothing_stacks_on_a_marshal_or_into_a_fortress() {
    let marshal_top = position("9/9/9/9/4m4/4G4/9/9/4M4 -/- w 3 - 1");
    let kinds: Vec<MoveType> = moves_onto(&marshal_top, sq(6, 5), sq(5, 5))
        .iter()
        .map(|mv| mv.move_type)
        .collect();
    assert_eq!(kinds, vec![MoveType::Capture]);

    let fortress = position("4m4/9/9/9/4f4/4G4/9/9/4M4 -/- w 3 - 1");
    let kinds: Vec<MoveType> = moves_onto(&fortress, sq(6, 5), sq(5, 5))
        .iter()
        .map(|mv| mv.move_type)
        .collect();
    assert_eq!(kinds, vec![MoveType::Capture]);
}

#[test]
fn marshal_topped_towers_only_take_captures() {
    let state = position("9/9/9/9/4m4/4G4/9/4D4/4M4 D1/- w 3 - 1");
    let moves = state.legal_moves();

    // Neither the soldier nor a placement may cover the own marshal.
    assert!(moves.iter().all(|mv| mv.to.square != sq(9, 5)));
    let onto_soldier = TieredSquare::new_unchecked(sq(8, 5), 2);
    assert!(moves
        .iter()
        .any(|mv| mv.move_type == MoveType::Arata && mv.to == onto_soldier));

    let onto_enemy: Vec<&Move> = moves.iter().filter(|mv| mv.to.square == sq(5, 5)).collect();
    assert_eq!(onto_enemy.len(), 1);
    assert_eq!(onto_enemy[0].move_type, MoveType::Capture);

    for mv in &moves {
        let next = state.apply(mv).unwrap();
        for (square, tower) in next.board.towers() {
            let below_top = usize::from(tower.height()) - 1;
            assert!(
                tower.iter().take(below_top).all(|piece| piece.piece_type != PieceType::Marshal),
                "{} covers a marshal at {square}",
                move_to_san(mv)
            );
        }
    }
}

#[test]
fn marshal_stacks_only_in_intermediate_and_advanced() {
    let beginner = position("4m4/9/9/9/4D4/4M4/9/9/9 -/- w 1 - 1");
    assert!(moves_onto(&beginner, sq(6, 5), sq(5, 5)).is_empty());

    let advanced = position("4m4/9/9/9/4D4/4M4/9/9/9 -/- w 3 - 1");
    let moves = moves_onto(&advanced, sq(6, 5), sq(5, 5));
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].move_type, MoveType::Tsuke);
    assert_eq!(moves[0].to.tier, 2);
}

#[test]
fn tactician_betray_variants() {
    let state = position("4m4/9/9/9/9/9/3d5/4T4/4M4 D1/- w 3 - 1");
    let generated = sans(&state.moves_from(sq(8, 5)));

    for expected in [
        "謀(8-5-1)(7-6-2)返兵",
        "謀(8-5-1)(7-6-2)付",
        "謀(8-5-1)取(7-6-1)",
        "謀(8-5-1)(7-4-1)",
    ] {
        assert!(
            generated.iter().any(|san| san == expected),
            "missing {expected} in {generated:?}"
        );
    }

    let betray = parse_san("謀(8-5-1)(7-6-2)返兵", &state).unwrap();
    let next = state.apply(&betray).unwrap();
    assert_eq!(next.fen(), "4m4/9/9/9/9/9/3|D:T|5/9/4M4 -/- b 3 - 1");

    let no_hand = position("4m4/9/9/9/9/9/3d5/4T4/4M4 -/- w 3 - 1");
    assert!(no_hand
        .moves_from(sq(8, 5))
        .iter()
        .all(|mv| mv.move_type != MoveType::Betray));
}

#[test]
fn betray_needs_matching_hand_piece_per_converted_piece() {
    // A tier-1 tactician cannot reach a two-high tower.
    let one = position("4m4/9/9/9/9/9/3|d:d|5/4T4/4M4 D1/- w 3 - 1");
    let betrays: Vec<Move> = one
        .moves_from(sq(8, 5))
        .into_iter()
        .filter(|mv| mv.move_type == MoveType::Betray)
        .collect();
    assert!(betrays.is_empty(), "the tower is too tall to reach");

    let reachable = position("4m4/9/9/9/9/9/3|d:d|5/4|D:T|4/4M4 D1/- w 3 - 1");
    // One soldier in hand pays for one converted soldier.
    let betrays: Vec<Move> = reachable
        .moves_from(sq(8, 5))
        .into_iter()
        .filter(|mv| mv.move_type == MoveType::Betray)
        .collect();
    assert_eq!(betrays.len(), 1);
    assert_eq!(betrays[0].captured.len(), 1);

    let two = position("4m4/9/9/9/9/9/3|d:d|5/4|D:T|4/4M4 D2/- w 3 - 1");
    let mut sizes: Vec<usize> = two
        .moves_from(sq(8, 5))
        .iter()
        .filter(|mv| mv.move_type == MoveType::Betray)
        .map(|mv| mv.captured.len())
        .collect();
    sizes.sort();
    assert_eq!(sizes, vec![1, 2]);
}

#[test]
fn betray_onto_marshal_top_is_not_generated() {
    let state = position("9/9/9/9/9/9/3m5/4T4/4M4 D1/- w 3 - 1");
    let kinds: Vec<MoveType> = moves_onto(&state, sq(8, 5), sq(7, 6))
        .iter()
        .map(|mv| mv.move_type)
        .collect();
    assert_eq!(kinds, vec![MoveType::Capture]);
}

#[test]
fn pinned_piece_may_only_stay_on_the_line() {
    let state = position("4m4/9/9/9/4g4/9/9/4W4/4M4 -/- w 3 - 1");
    let moves = state.moves_from(sq(8, 5));
    assert_eq!(sans(&moves), vec!["侍(8-5-1)(7-5-1)".to_string()]);

    let pseudo = gungi_core::movegen::pseudo_legal_moves(&state);
    assert!(pseudo.len() > state.legal_moves().len());
}

#[test]
fn marshal_must_be_placed_first_in_the_draft() {
    let state = position(ADVANCED_POSITION);
    let moves = state.legal_moves();

    assert_eq!(moves.len(), 54);
    assert!(moves.iter().all(|mv| mv.move_type == MoveType::Arata
        && mv.piece == PieceType::Marshal
        && (7..=9).contains(&mv.to.square.rank)));
    assert_eq!(moves.iter().filter(|mv| mv.draft_finished).count(), 27);

    assert!(state.placements(Some(PieceType::Soldier)).is_empty());
}

#[test]
fn drafting_side_places_on_its_own_band() {
    let mut state = position(ADVANCED_POSITION);
    let marshal = state
        .legal_moves()
        .into_iter()
        .find(|mv| mv.to.square == sq(9, 5) && !mv.draft_finished)
        .expect("marshal placement");
    state = state.apply(&marshal).unwrap();
    assert_eq!(state.turn, Color::Black);

    let black = state.legal_moves();
    assert_eq!(black.len(), 54);
    assert!(black.iter().all(|mv| (1..=3).contains(&mv.to.square.rank)));

    let black_marshal = black
        .iter()
        .find(|mv| mv.to.square == sq(1, 5) && !mv.draft_finished)
        .cloned()
        .expect("black marshal placement");
    state = state.apply(&black_marshal).unwrap();

    let white = state.legal_moves();
    assert!(white.iter().all(|mv| mv.move_type == MoveType::Arata));
    assert!(white.iter().all(|mv| (7..=9).contains(&mv.to.square.rank)));
    assert!(white.iter().any(|mv| mv.piece == PieceType::Soldier));
    assert!(white
        .iter()
        .all(|mv| mv.to.square != sq(9, 5)), "never onto the marshal");
}

#[test]
fn last_hand_piece_always_finishes_the_draft() {
    let single = position("9/9/9/9/9/9/9/9/4M4 D1/m1 w 3 w 1");
    let moves = single.legal_moves();
    assert_eq!(moves.len(), 26);
    assert!(moves.iter().all(|mv| mv.draft_finished));

    let double = position("9/9/9/9/9/9/9/9/4M4 D2/m1 w 3 w 1");
    let moves = double.legal_moves();
    assert_eq!(moves.len(), 52);
    assert_eq!(moves.iter().filter(|mv| mv.draft_finished).count(), 26);
}

#[test]
fn fortress_from_hand_needs_an_empty_square() {
    let state = position("9/9/9/9/9/9/9/8D/4M4 F1D1/- w 3 w 1");

    let fortress = state.placements(Some(PieceType::Fortress));
    assert!(!fortress.is_empty());
    assert!(fortress.iter().all(|mv| mv.to.square != sq(8, 1)));

    let soldier = state.placements(Some(PieceType::Soldier));
    assert!(soldier
        .iter()
        .any(|mv| mv.to.square == sq(8, 1) && mv.to.tier == 2));
}

#[test]
fn placements_reach_only_the_front_line_after_the_draft() {
    let state = position("4m4/9/9/9/9/4D4/9/9/4M4 D1/- w 3 - 1");
    let moves = state.placements(None);

    assert_eq!(moves.len(), 35);
    assert!(moves.iter().all(|mv| mv.to.square.rank >= 6));
    assert!(moves.iter().all(|mv| !mv.draft_finished));
    assert!(moves
        .iter()
        .any(|mv| mv.to.square == sq(6, 5) && mv.to.tier == 2));
}

#[test]
fn marshal_in_hand_is_placed_on_the_home_band() {
    let state = position("9/9/9/9/9/9/9/9/9 M1D1/- w 3 - 1");
    let moves = state.legal_moves();

    assert_eq!(moves.len(), 27);
    assert!(moves.iter().all(|mv| mv.piece == PieceType::Marshal));
    assert!(moves.iter().all(|mv| !mv.draft_finished));
}

#[test]
fn generated_san_parses_back_to_the_same_move() {
    let state = position(ADVANCED_POSITION);
    for mv in state.legal_moves().iter().take(10) {
        let san = move_to_san(mv);
        let parsed = parse_san(&san, &state).expect("parse generated san");
        assert_eq!(&parsed, mv);
    }

    let beginner = Position::new(SetupMode::Beginner);
    for mv in beginner.legal_moves() {
        let parsed = parse_san(&move_to_san(&mv), &beginner).unwrap();
        assert_eq!(parsed, mv);
    }
}

#[test]
fn perft_counts_leaves_of_the_move_tree() {
    let state = Position::new(SetupMode::Beginner);
    assert_eq!(gungi_core::perft(&state, 0), 1);
    assert_eq!(gungi_core::perft(&state, 1), state.legal_moves().len() as u64);

    let by_hand: u64 = state
        .legal_moves()
        .iter()
        .map(|mv| state.apply(mv).unwrap().legal_moves().len() as u64)
        .sum();
    assert_eq!(gungi_core::perft(&state, 2), by_hand);
}
