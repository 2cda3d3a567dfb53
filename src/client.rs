//! Polling HTTP client for the game server.
//!
//! Thin wrapper over reqwest: one method per remote procedure. The server
//! never pushes, so callers poll `turn`/`board`/`ended` on their own cadence.

use crate::game::Cell;
use crate::server::{
    EndedResponse, LeaveRequest, MoveRequest, MoveResponse, RegisterRequest, RegisterResponse,
};
use crate::session::{ScoreBoard, Symbol};
use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// HTTP game client bound to one player identity.
#[derive(Debug, Clone)]
pub struct GameClient {
    base_url: String,
    http: reqwest::Client,
    /// Player name presented on every call.
    pub name: String,
    /// Capability token presented on every call.
    pub token: String,
}

impl GameClient {
    /// Creates a client for the given server and player identity.
    pub fn new(base_url: String, name: String, token: String) -> Self {
        Self {
            base_url,
            http: reqwest::Client::new(),
            name,
            token,
        }
    }

    /// Registers this player with the server.
    #[instrument(skip(self), fields(name = %self.name))]
    pub async fn register(&self) -> Result<RegisterResponse> {
        info!("registering with server");
        let response = self
            .http
            .post(format!("{}/api/register", self.base_url))
            .json(&RegisterRequest {
                name: self.name.clone(),
                token: self.token.clone(),
            })
            .send()
            .await?
            .json()
            .await?;
        debug!(?response, "register response");
        Ok(response)
    }

    /// Submits a move at the given coordinate code.
    #[instrument(skip(self), fields(name = %self.name))]
    pub async fn make_move(&self, coordinate: &str) -> Result<MoveResponse> {
        let response = self
            .http
            .post(format!("{}/api/move", self.base_url))
            .json(&MoveRequest {
                name: self.name.clone(),
                token: self.token.clone(),
                coordinate: coordinate.to_string(),
            })
            .send()
            .await?
            .json()
            .await?;
        Ok(response)
    }

    /// Leaves the session, ending it for both players.
    #[instrument(skip(self), fields(name = %self.name))]
    pub async fn leave(&self) -> Result<bool> {
        let left = self
            .http
            .post(format!("{}/api/leave", self.base_url))
            .json(&LeaveRequest {
                name: self.name.clone(),
                token: self.token.clone(),
            })
            .send()
            .await?
            .json()
            .await?;
        Ok(left)
    }

    /// Requests a rematch.
    #[instrument(skip(self))]
    pub async fn restart(&self) -> Result<bool> {
        let restarted = self
            .http
            .post(format!("{}/api/restart", self.base_url))
            .send()
            .await?
            .json()
            .await?;
        Ok(restarted)
    }

    /// Fetches the board snapshot.
    pub async fn board(&self) -> Result<[[Cell; 3]; 3]> {
        Ok(self.get("board").await?)
    }

    /// Fetches the current turn owner.
    pub async fn turn(&self) -> Result<Option<String>> {
        Ok(self.get("turn").await?)
    }

    /// Fetches the registered players and their symbols.
    pub async fn players(&self) -> Result<BTreeMap<String, Symbol>> {
        Ok(self.get("players").await?)
    }

    /// Fetches the end-of-session state.
    pub async fn ended(&self) -> Result<EndedResponse> {
        Ok(self.get("ended").await?)
    }

    /// Fetches the win tally.
    pub async fn stats(&self) -> Result<ScoreBoard> {
        Ok(self.get("stats").await?)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self
            .http
            .get(format!("{}/api/{}", self.base_url, path))
            .send()
            .await?
            .json()
            .await?;
        Ok(value)
    }
}
