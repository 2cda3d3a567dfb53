//! Tests for coordinate parsing and win/draw detection.

use grid_duel::{Board, Cell, Coord, Mark, is_full, winner};

fn coord(code: &str) -> Coord {
    code.parse().expect("valid coordinate")
}

#[test]
fn test_coord_parsing_maps_letter_to_column() {
    assert_eq!(coord("A1"), Coord::new(0, 0).unwrap());
    assert_eq!(coord("B1"), Coord::new(0, 1).unwrap());
    assert_eq!(coord("C3"), Coord::new(2, 2).unwrap());
    assert_eq!(coord("A3"), Coord::new(2, 0).unwrap());
}

#[test]
fn test_coord_parsing_is_case_insensitive() {
    assert_eq!(coord("b2"), coord("B2"));
    assert_eq!(coord("c1"), coord("C1"));
}

#[test]
fn test_coord_rejects_malformed_codes() {
    for bad in ["", "A", "D1", "A4", "A0", "11", "AA", "A12", " A1"] {
        assert!(bad.parse::<Coord>().is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn test_coord_display_round_trips() {
    for c in Coord::all() {
        assert_eq!(coord(&c.to_string()), c);
    }
}

#[test]
fn test_empty_board_has_no_winner() {
    let board = Board::new();
    assert_eq!(winner(&board), None);
    assert!(!is_full(&board));
}

#[test]
fn test_row_win_detected() {
    let mut board = Board::new();
    for code in ["A1", "B1", "C1"] {
        board.set(coord(code), Mark::X);
    }
    board.set(coord("A2"), Mark::O);
    board.set(coord("B2"), Mark::O);
    assert_eq!(winner(&board), Some(Mark::X));
}

#[test]
fn test_column_win_detected() {
    let mut board = Board::new();
    for code in ["B1", "B2", "B3"] {
        board.set(coord(code), Mark::O);
    }
    assert_eq!(winner(&board), Some(Mark::O));
}

#[test]
fn test_diagonal_wins_detected() {
    let mut board = Board::new();
    for code in ["A1", "B2", "C3"] {
        board.set(coord(code), Mark::X);
    }
    assert_eq!(winner(&board), Some(Mark::X));

    let mut board = Board::new();
    for code in ["C1", "B2", "A3"] {
        board.set(coord(code), Mark::O);
    }
    assert_eq!(winner(&board), Some(Mark::O));
}

#[test]
fn test_full_board_without_line_is_a_draw() {
    // X O X / X O O / O X X - no completed line anywhere.
    let grid = [
        [Cell::X, Cell::O, Cell::X],
        [Cell::X, Cell::O, Cell::O],
        [Cell::O, Cell::X, Cell::X],
    ];
    let board = Board::from_grid(grid);
    assert!(is_full(&board));
    assert_eq!(winner(&board), None);
}

#[test]
fn test_grid_round_trips_through_from_grid() {
    let mut board = Board::new();
    board.set(coord("A1"), Mark::X);
    board.set(coord("C2"), Mark::O);
    assert_eq!(Board::from_grid(board.grid()), board);
}

#[test]
fn test_display_renders_marks_with_labels() {
    let mut board = Board::new();
    board.set(coord("A1"), Mark::X);
    let text = board.display();
    assert!(text.contains("A   B   C"));
    assert!(text.contains('X'));
}
