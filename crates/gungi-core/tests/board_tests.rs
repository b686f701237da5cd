use gungi_core::board::{Board, BoardError};
use gungi_core::types::{Color, Piece, PieceType, SetupMode, Square, TieredSquare};
use gungi_core::Position;

fn sq(rank: u8, file: u8) -> Square {
    Square::new(rank, file).expect("valid square")
}

#[test]
fn starting_boards_match_setup_modes() {
    let intro = Position::new(SetupMode::Intro).board;
    let beginner = Position::new(SetupMode::Beginner).board;
    let intermediate = Position::new(SetupMode::Intermediate).board;
    let advanced = Position::new(SetupMode::Advanced).board;

    assert_eq!(
        intro.get_top(sq(1, 5)),
        Ok(Some((Piece::new(PieceType::Marshal, Color::Black), 1)))
    );
    assert_eq!(
        intro.get_top(sq(2, 8)),
        Ok(Some((Piece::new(PieceType::Spy, Color::Black), 1)))
    );
    assert_eq!(
        intro.get_top(sq(9, 5)),
        Ok(Some((Piece::new(PieceType::Marshal, Color::White), 1)))
    );

    assert_eq!(
        beginner.get_top(sq(2, 8)),
        Ok(Some((Piece::new(PieceType::Rider, Color::Black), 1)))
    );
    assert_eq!(
        beginner.get_top(sq(8, 2)),
        Ok(Some((Piece::new(PieceType::Rider, Color::White), 1)))
    );
    assert_eq!(
        beginner.get_top(sq(2, 7)),
        Ok(Some((Piece::new(PieceType::Archer, Color::Black), 1)))
    );

    assert_eq!(intermediate.towers().count(), 0);
    assert_eq!(advanced.get_top(sq(9, 9)), Ok(None));
}

#[test]
fn put_and_remove_top_validate_height() {
    let mut board = Board::empty(SetupMode::Advanced);
    let square = sq(5, 5);
    let p1 = Piece::new(PieceType::Soldier, Color::White);
    let p2 = Piece::new(PieceType::Spy, Color::White);
    let p3 = Piece::new(PieceType::General, Color::White);

    assert_eq!(board.put(p1, square), Ok(1));
    assert_eq!(board.put(p2, square), Ok(2));
    assert_eq!(board.put(p3, square), Ok(3));
    assert_eq!(board.get(square).unwrap().map(|tower| tower.height()), Some(3));
    assert_eq!(
        board.put(p1, square),
        Err(BoardError::ExceedsModeMaxTier)
    );

    assert_eq!(board.remove_top(square).unwrap(), Some(p3));
    assert_eq!(board.remove_top(square).unwrap(), Some(p2));
    assert_eq!(board.remove_top(square).unwrap(), Some(p1));
    assert_eq!(board.remove_top(square).unwrap(), None);
    assert_eq!(board.get(square), Ok(None));

    let mut intro = Board::empty(SetupMode::Intro);
    let intro_square = sq(4, 4);
    intro
        .put(Piece::new(PieceType::Soldier, Color::Black), intro_square)
        .unwrap();
    assert_eq!(
        intro.put(Piece::new(PieceType::Fortress, Color::Black), intro_square),
        Ok(2)
    );
    assert_eq!(
        intro.put(Piece::new(PieceType::Spy, Color::Black), intro_square),
        Err(BoardError::ExceedsModeMaxTier)
    );
}

#[test]
fn out_of_bounds_squares_are_reported() {
    let mut board = Board::empty(SetupMode::Advanced);
    let off_board = Square::new_unchecked(10, 1);
    let piece = Piece::new(PieceType::Soldier, Color::White);

    assert_eq!(board.get(off_board), Err(BoardError::OutOfBounds));
    assert_eq!(board.get_top(off_board), Err(BoardError::OutOfBounds));
    assert_eq!(board.get_top(Square::new_unchecked(5, 0)), Err(BoardError::OutOfBounds));
    assert_eq!(board.put(piece, off_board), Err(BoardError::OutOfBounds));
    assert_eq!(board.remove_top(off_board), Err(BoardError::OutOfBounds));
    assert_eq!(board.remove(off_board, &[piece]), Err(BoardError::OutOfBounds));
    assert_eq!(board.convert(off_board, &[piece]), Err(BoardError::OutOfBounds));
    assert_eq!(board.tower_copy(Square::new_unchecked(0, 3)), Err(BoardError::OutOfBounds));
}

#[test]
fn remove_and_convert_operate_on_matching_pieces() {
    let mut board = Board::empty(SetupMode::Advanced);
    let square = sq(6, 6);
    let soldier = Piece::new(PieceType::Soldier, Color::Black);
    let spy = Piece::new(PieceType::Spy, Color::Black);
    let warrior = Piece::new(PieceType::Warrior, Color::Black);

    board.put(soldier, square).unwrap();
    board.put(spy, square).unwrap();
    board.put(warrior, square).unwrap();

    let converted = board.convert(square, &[spy, warrior]).unwrap();
    assert_eq!(converted, 2);

    let tower = board.get(square).unwrap().expect("tower");
    assert_eq!(tower.at(1), Some(soldier));
    assert_eq!(tower.at(2), Some(Piece::new(PieceType::Spy, Color::White)));
    assert_eq!(
        tower.at(3),
        Some(Piece::new(PieceType::Warrior, Color::White))
    );

    let removed = board.remove(square, &[soldier]).unwrap();
    assert_eq!(removed, 1);
    let tower = board.get(square).unwrap().expect("tower");
    assert_eq!(tower.height(), 2);
    assert_eq!(tower.at(1), Some(Piece::new(PieceType::Spy, Color::White)));
}

#[test]
fn remove_and_convert_match_each_listed_piece_once() {
    let mut board = Board::empty(SetupMode::Advanced);
    let square = sq(3, 3);
    let soldier = Piece::new(PieceType::Soldier, Color::Black);

    board.put(soldier, square).unwrap();
    board.put(soldier, square).unwrap();

    assert_eq!(board.convert(square, &[soldier]).unwrap(), 1);
    let tower = board.get(square).unwrap().expect("tower");
    assert_eq!(tower.count_color(Color::White), 1);
    assert_eq!(tower.count_color(Color::Black), 1);

    assert_eq!(board.remove(square, &[soldier, soldier]).unwrap(), 1);
    assert_eq!(board.get(square).unwrap().map(|tower| tower.height()), Some(1));
}

#[test]
fn marshal_lookup_and_piece_iteration() {
    let board = Position::new(SetupMode::Beginner).board;

    assert_eq!(
        board.find_marshal(Color::White),
        Some(TieredSquare::new_unchecked(sq(9, 5), 1))
    );
    assert_eq!(
        board.find_marshal(Color::Black),
        Some(TieredSquare::new_unchecked(sq(1, 5), 1))
    );
    assert_eq!(board.pieces().count(), 30);
    assert_eq!(
        board.count(Piece::new(PieceType::Soldier, Color::White)),
        3
    );
    assert_eq!(board.squares_topped_by(Color::Black).count(), 15);
}
