//! HTTP transport adapter: exposes the session operations as JSON
//! request/response procedures.
//!
//! Every outcome, including refusals, is a structured 200 response; the
//! error taxonomy is data for the client to act on, never an HTTP failure.

use crate::game::{Cell, Mark};
use crate::session::{MoveOutcome, RegisterError, ScoreBoard, SessionHandle, Symbol};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Request body for registering a player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Player-chosen name, the session key.
    pub name: String,
    /// Caller-supplied opaque credential bound to the name.
    pub token: String,
}

/// Registration outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterStatus {
    /// Slot allocated or reconnected.
    Ok,
    /// Both slots taken.
    Full,
    /// Session permanently ended.
    Ended,
    /// Name held by a different token.
    NameInUse,
    /// Match already running, no third registrant.
    AlreadyInProgress,
}

/// Response body for registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Registration outcome.
    pub status: RegisterStatus,
    /// Assigned symbol on success (may still be `Pending`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    /// Echo of the bound token on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// End reason when `status` is `ended`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Request body for making a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Acting player's name.
    pub name: String,
    /// Credential bound at registration.
    pub token: String,
    /// Two-character coordinate code, e.g. "B2".
    pub coordinate: String,
}

/// Move outcome category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    /// Move accepted, match continues.
    Ok,
    /// Move accepted and completed a line.
    Win,
    /// Move accepted and filled the board.
    Draw,
    /// Move refused; see `message`.
    Error,
}

/// Response body for a move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Move outcome.
    pub status: MoveStatus,
    /// Board snapshot after the call.
    pub board: [[Cell; 3]; 3],
    /// Winning mark when `status` is `win`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Mark>,
    /// Refusal detail when `status` is `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request body for leaving the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Leaving player's name.
    pub name: String,
    /// Credential bound at registration.
    pub token: String,
}

/// Response body for the end-of-session query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndedResponse {
    /// Whether the session has permanently ended.
    pub ended: bool,
    /// Why it ended; empty while open.
    pub reason: String,
}

/// Builds the RPC surface over one shared session.
pub fn router(session: SessionHandle) -> Router {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/move", post(make_move))
        .route("/api/leave", post(leave))
        .route("/api/restart", post(restart))
        .route("/api/board", get(board))
        .route("/api/turn", get(turn))
        .route("/api/players", get(players))
        .route("/api/ended", get(ended))
        .route("/api/stats", get(stats))
        .with_state(session)
}

#[instrument(skip(session, req), fields(name = %req.name))]
async fn register(
    State(session): State<SessionHandle>,
    Json(req): Json<RegisterRequest>,
) -> Json<RegisterResponse> {
    let response = match session.register(&req.name, &req.token) {
        Ok(registration) => RegisterResponse {
            status: RegisterStatus::Ok,
            symbol: Some(registration.symbol),
            token: Some(req.token),
            reason: None,
        },
        Err(RegisterError::Ended { reason }) => RegisterResponse {
            status: RegisterStatus::Ended,
            symbol: None,
            token: None,
            reason: Some(reason),
        },
        Err(RegisterError::NameInUse) => refusal(RegisterStatus::NameInUse),
        Err(RegisterError::AlreadyInProgress) => refusal(RegisterStatus::AlreadyInProgress),
        Err(RegisterError::Full) => refusal(RegisterStatus::Full),
    };
    Json(response)
}

fn refusal(status: RegisterStatus) -> RegisterResponse {
    RegisterResponse {
        status,
        symbol: None,
        token: None,
        reason: None,
    }
}

#[instrument(skip(session, req), fields(name = %req.name, coordinate = %req.coordinate))]
async fn make_move(
    State(session): State<SessionHandle>,
    Json(req): Json<MoveRequest>,
) -> Json<MoveResponse> {
    let response = match session.play(&req.name, &req.token, &req.coordinate) {
        Ok(report) => {
            let (status, winner) = match report.outcome {
                MoveOutcome::Continue => (MoveStatus::Ok, None),
                MoveOutcome::Win(mark) => (MoveStatus::Win, Some(mark)),
                MoveOutcome::Draw => (MoveStatus::Draw, None),
            };
            MoveResponse {
                status,
                board: report.board.grid(),
                winner,
                message: None,
            }
        }
        Err(e) => MoveResponse {
            status: MoveStatus::Error,
            board: session.board().grid(),
            winner: None,
            message: Some(e.to_string()),
        },
    };
    Json(response)
}

#[instrument(skip(session, req), fields(name = %req.name))]
async fn leave(
    State(session): State<SessionHandle>,
    Json(req): Json<LeaveRequest>,
) -> Json<bool> {
    Json(session.leave(&req.name, &req.token))
}

#[instrument(skip(session))]
async fn restart(State(session): State<SessionHandle>) -> Json<bool> {
    Json(session.restart())
}

async fn board(State(session): State<SessionHandle>) -> Json<[[Cell; 3]; 3]> {
    Json(session.board().grid())
}

async fn turn(State(session): State<SessionHandle>) -> Json<Option<String>> {
    Json(session.turn())
}

async fn players(State(session): State<SessionHandle>) -> Json<BTreeMap<String, Symbol>> {
    debug!("players snapshot requested");
    Json(session.players())
}

async fn ended(State(session): State<SessionHandle>) -> Json<EndedResponse> {
    Json(EndedResponse {
        ended: session.is_ended(),
        reason: session.end_reason(),
    })
}

async fn stats(State(session): State<SessionHandle>) -> Json<ScoreBoard> {
    Json(session.stats())
}
