//! Grid Duel - authoritative two-player tic-tac-toe server.
//!
//! # Architecture
//!
//! - **Game**: pure board rules (coordinates, win/draw detection)
//! - **Session**: the authoritative match aggregate behind one coarse lock
//! - **Monitor**: background task ending stalled matches
//! - **Server**: axum JSON adapter exposing the session operations
//! - **Client**: reqwest polling client used by the text frontend

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod game;
mod monitor;
mod server;
mod session;

// Crate-level exports - Game types
pub use game::{Board, Cell, Coord, Mark, ParseCoordError, is_full, winner};

// Crate-level exports - Session management
pub use session::{
    MoveError, MoveOutcome, MoveReport, RegisterError, Registration, ScoreBoard, Session,
    SessionConfig, SessionHandle, Symbol,
};

// Crate-level exports - HTTP surface
pub use server::{
    EndedResponse, LeaveRequest, MoveRequest, MoveResponse, MoveStatus, RegisterRequest,
    RegisterResponse, RegisterStatus, router,
};

// Crate-level exports - Client
pub use client::GameClient;
