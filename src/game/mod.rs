//! Pure tic-tac-toe rules: board representation, coordinate parsing, and
//! win/draw detection. No locking or I/O lives here.

mod coord;
mod rules;
mod types;

pub use coord::{Coord, ParseCoordError};
pub use rules::{is_full, winner};
pub use types::{Board, Cell, Mark};
