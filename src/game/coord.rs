//! Board coordinates in the client-facing "A1".."C3" notation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A board coordinate: column letter `A..C`, row digit `1..3`.
///
/// Stored zero-based. `"B3"` parses to `row = 2, col = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    row: usize,
    col: usize,
}

/// Error returned for a malformed coordinate code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("malformed coordinate, expected a letter A-C followed by a digit 1-3")]
pub struct ParseCoordError;

impl std::error::Error for ParseCoordError {}

impl Coord {
    /// Creates a coordinate from zero-based row and column.
    ///
    /// Returns `None` when either index is out of range.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        if row < 3 && col < 3 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Zero-based row.
    pub fn row(self) -> usize {
        self.row
    }

    /// Zero-based column.
    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major board index (0-8).
    pub fn index(self) -> usize {
        self.row * 3 + self.col
    }

    /// All nine coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..9).map(|i| Coord {
            row: i / 3,
            col: i % 3,
        })
    }
}

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseCoordError);
        };
        let col = match letter.to_ascii_uppercase() {
            'A' => 0,
            'B' => 1,
            'C' => 2,
            _ => return Err(ParseCoordError),
        };
        let row = match digit {
            '1' => 0,
            '2' => 1,
            '3' => 2,
            _ => return Err(ParseCoordError),
        };
        Ok(Self { row, col })
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = ['A', 'B', 'C'][self.col];
        write!(f, "{}{}", letter, self.row + 1)
    }
}
