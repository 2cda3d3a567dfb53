//! Win and draw detection.

use super::types::{Board, Cell, Mark};

/// The 8 winning lines as row-major indices, scanned rows, then columns,
/// then diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Returns the mark holding a completed line, if any.
pub fn winner(board: &Board) -> Option<Mark> {
    let cells = board.cells();
    for [a, b, c] in LINES {
        let occ = cells[a];
        if occ != Cell::Empty && occ == cells[b] && occ == cells[c] {
            return occ.mark();
        }
    }
    None
}

/// Checks whether every cell is occupied.
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|&c| c != Cell::Empty)
}
