//! Session management: the authoritative state for one two-player match.
//!
//! [`Session`] is the pure aggregate: registration, turn arbitration, move
//! validation, win/draw detection, and lifecycle. It takes the current time
//! as an explicit parameter so tests control the clock. [`SessionHandle`]
//! wraps it in an `Arc<Mutex<_>>`, serializing every operation under one
//! coarse lock, and arms the inactivity monitor when a match starts.

use crate::game::{self, Board, Coord, Mark};
use crate::monitor;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Timing knobs for a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// How long a match may sit without a move before it is terminated.
    pub move_timeout: Duration,
    /// How often the inactivity monitor wakes to check.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            move_timeout: Duration::from_secs(45),
            poll_interval: Duration::from_secs(10),
        }
    }
}

/// A player's slot symbol: unassigned until the second player registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Symbol {
    /// Waiting for the match to start.
    Pending,
    /// Plays X.
    X,
    /// Plays O.
    O,
}

impl Symbol {
    /// Returns the mark this symbol plays, if assigned.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Symbol::Pending => None,
            Symbol::X => Some(Mark::X),
            Symbol::O => Some(Mark::O),
        }
    }
}

impl From<Mark> for Symbol {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Symbol::X,
            Mark::O => Symbol::O,
        }
    }
}

/// Per-mark win tally. Survives rematches, frozen once the session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    /// Matches won by X.
    pub x: u32,
    /// Matches won by O.
    pub o: u32,
}

/// One of the two player positions.
#[derive(Debug, Clone)]
struct PlayerSlot {
    name: String,
    token: String,
    symbol: Symbol,
}

/// Successful registration: the symbol currently held by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Assigned symbol; `Pending` until the second player arrives.
    pub symbol: Symbol,
}

/// Why a registration was refused.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum RegisterError {
    /// The session has permanently ended.
    #[display("session ended: {reason}")]
    Ended {
        /// Why the session ended.
        reason: String,
    },
    /// The name is held by another player with a different token.
    #[display("name is already in use")]
    NameInUse,
    /// A match is already in progress, no third registrant.
    #[display("match already in progress")]
    AlreadyInProgress,
    /// Both slots are taken.
    #[display("session is full")]
    Full,
}

impl std::error::Error for RegisterError {}

/// Why a move was refused.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveError {
    /// The session has permanently ended.
    #[display("session ended: {reason}")]
    Ended {
        /// Why the session ended.
        reason: String,
    },
    /// The match has not started yet.
    #[display("match not started")]
    NotStarted,
    /// The name holds no slot in this session.
    #[display("player not registered")]
    NotRegistered,
    /// The token does not match the one bound at registration.
    #[display("invalid token")]
    InvalidToken,
    /// It is the other player's turn.
    #[display("not your turn")]
    NotYourTurn,
    /// The coordinate is not a letter A-C followed by a digit 1-3.
    #[display("invalid move")]
    InvalidMove,
    /// The target cell is already occupied.
    #[display("cell already occupied")]
    CellOccupied,
}

impl std::error::Error for MoveError {}

/// Outcome of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Match continues, turn passes to the opponent.
    Continue,
    /// The acting player completed a line.
    Win(Mark),
    /// Board full, no line.
    Draw,
}

/// An accepted move plus the resulting board snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MoveReport {
    /// What the move produced.
    pub outcome: MoveOutcome,
    /// Board state after the move.
    pub board: Board,
}

/// Authoritative state for one match, from first registration to permanent
/// termination.
#[derive(Debug)]
pub struct Session {
    board: Board,
    slots: Vec<PlayerSlot>,
    turn_owner: Option<String>,
    started: bool,
    ended: bool,
    end_reason: String,
    wins: ScoreBoard,
    last_move: Instant,
    needs_monitor: bool,
}

impl Session {
    /// Creates an empty session with no registered players.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            slots: Vec::new(),
            turn_owner: None,
            started: false,
            ended: false,
            end_reason: String::new(),
            wins: ScoreBoard::default(),
            last_move: Instant::now(),
            needs_monitor: false,
        }
    }

    /// Registers a player, or reconnects one presenting the same name and
    /// token. Filling the second slot starts the match: a uniformly random
    /// ordering assigns X and O, and X owns the first turn.
    pub fn register(
        &mut self,
        name: &str,
        token: &str,
        now: Instant,
    ) -> Result<Registration, RegisterError> {
        if self.ended {
            return Err(RegisterError::Ended {
                reason: self.end_reason.clone(),
            });
        }
        if let Some(slot) = self.slots.iter().find(|s| s.name == name) {
            if slot.token == token {
                // Idempotent reconnect.
                return Ok(Registration {
                    symbol: slot.symbol,
                });
            }
            return Err(RegisterError::NameInUse);
        }
        if self.started {
            return Err(RegisterError::AlreadyInProgress);
        }
        if self.slots.len() >= 2 {
            return Err(RegisterError::Full);
        }

        self.slots.push(PlayerSlot {
            name: name.to_string(),
            token: token.to_string(),
            symbol: Symbol::Pending,
        });

        if self.slots.len() == 2 {
            self.start_match(now);
        }

        let symbol = self
            .slots
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.symbol)
            .unwrap_or(Symbol::Pending);
        Ok(Registration { symbol })
    }

    /// Coin-flips the X/O assignment and opens the match.
    fn start_match(&mut self, now: Instant) {
        let (first, second) = if rand::random::<bool>() { (0, 1) } else { (1, 0) };
        self.slots[first].symbol = Symbol::X;
        self.slots[second].symbol = Symbol::O;
        self.turn_owner = Some(self.slots[first].name.clone());
        self.started = true;
        self.last_move = now;
        self.needs_monitor = true;
    }

    /// Validates and applies a move at the given coordinate code ("A1".."C3").
    pub fn play(
        &mut self,
        name: &str,
        token: &str,
        coordinate: &str,
        now: Instant,
    ) -> Result<MoveReport, MoveError> {
        if self.ended {
            return Err(MoveError::Ended {
                reason: self.end_reason.clone(),
            });
        }
        if !self.started {
            return Err(MoveError::NotStarted);
        }
        let slot = self
            .slots
            .iter()
            .find(|s| s.name == name)
            .ok_or(MoveError::NotRegistered)?;
        if slot.token != token {
            return Err(MoveError::InvalidToken);
        }
        if self.turn_owner.as_deref() != Some(name) {
            return Err(MoveError::NotYourTurn);
        }
        let Some(mark) = slot.symbol.mark() else {
            return Err(MoveError::NotStarted);
        };

        let coord: Coord = coordinate.parse().map_err(|_| MoveError::InvalidMove)?;
        if !self.board.is_empty(coord) {
            return Err(MoveError::CellOccupied);
        }

        self.board.set(coord, mark);
        self.last_move = now;

        let outcome = if let Some(winner) = game::winner(&self.board) {
            match winner {
                Mark::X => self.wins.x += 1,
                Mark::O => self.wins.o += 1,
            }
            MoveOutcome::Win(winner)
        } else if game::is_full(&self.board) {
            MoveOutcome::Draw
        } else {
            self.pass_turn(name);
            MoveOutcome::Continue
        };

        Ok(MoveReport {
            outcome,
            board: self.board,
        })
    }

    /// Hands the turn to the other registered player.
    fn pass_turn(&mut self, mover: &str) {
        self.turn_owner = self
            .slots
            .iter()
            .find(|s| s.name != mover)
            .map(|s| s.name.clone());
    }

    /// Voluntarily leaves the session, permanently ending it for both
    /// players. Returns whether the leave took effect.
    pub fn leave(&mut self, name: &str, token: &str) -> bool {
        if self.ended {
            return false;
        }
        let Some(slot) = self.slots.iter().find(|s| s.name == name) else {
            return false;
        };
        if slot.token != token {
            return false;
        }
        self.terminate(format!("{name} left the game"));
        true
    }

    /// Starts a rematch: fresh board, symbols rotated so the previous O
    /// opens as X. The scoreboard is untouched. Fails if the session has
    /// ended or the match never started.
    pub fn restart(&mut self, now: Instant) -> bool {
        if self.ended || !self.started {
            return false;
        }
        self.board = Board::new();
        for slot in &mut self.slots {
            slot.symbol = match slot.symbol {
                Symbol::X => Symbol::O,
                Symbol::O => Symbol::X,
                Symbol::Pending => Symbol::Pending,
            };
        }
        self.turn_owner = self
            .slots
            .iter()
            .find(|s| s.symbol == Symbol::X)
            .map(|s| s.name.clone());
        self.last_move = now;
        true
    }

    /// Ends the session if a started match has gone longer than `timeout`
    /// without a move. Returns whether the session was terminated.
    pub fn expire_if_inactive(&mut self, now: Instant, timeout: Duration) -> bool {
        if self.ended || !self.started {
            return false;
        }
        if now.duration_since(self.last_move) > timeout {
            self.terminate("ended due to inactivity".to_string());
            return true;
        }
        false
    }

    /// Absorbing transition: freezes the board and scoreboard and clears all
    /// slots and tokens so no further registration succeeds.
    fn terminate(&mut self, reason: String) {
        self.ended = true;
        self.end_reason = reason;
        self.slots.clear();
        self.turn_owner = None;
    }

    /// Board snapshot.
    pub fn board(&self) -> Board {
        self.board
    }

    /// Name of the player who owns the next move, if a match is running.
    pub fn turn(&self) -> Option<String> {
        self.turn_owner.clone()
    }

    /// Snapshot of registered players and their symbols.
    pub fn players(&self) -> BTreeMap<String, Symbol> {
        self.slots
            .iter()
            .map(|s| (s.name.clone(), s.symbol))
            .collect()
    }

    /// Whether the session has permanently ended.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Why the session ended; empty while the session is open.
    pub fn end_reason(&self) -> String {
        self.end_reason.clone()
    }

    /// Win tally for X and O.
    pub fn stats(&self) -> ScoreBoard {
        self.wins
    }

    /// Whether the match has started.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Clears the arm-monitor flag, reporting whether it was set. The handle
    /// calls this under the lock so exactly one monitor is spawned per match
    /// start.
    fn take_monitor_arm(&mut self) -> bool {
        std::mem::take(&mut self.needs_monitor)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to one session. Every operation acquires the session mutex,
/// does constant-time work, and releases it; no I/O happens under the lock.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
    config: SessionConfig,
}

impl SessionHandle {
    /// Creates a handle around a fresh session.
    #[instrument]
    pub fn new(config: SessionConfig) -> Self {
        info!(?config, "creating game session");
        Self {
            inner: Arc::new(Mutex::new(Session::new())),
            config,
        }
    }

    /// Registers a player. Spawns the inactivity monitor when this
    /// registration starts the match.
    #[instrument(skip(self, token))]
    pub fn register(&self, name: &str, token: &str) -> Result<Registration, RegisterError> {
        let mut session = self.inner.lock().unwrap();
        let result = session.register(name, token, Instant::now());
        match &result {
            Ok(registration) => {
                info!(symbol = %registration.symbol, "player registered");
            }
            Err(e) => warn!(error = %e, "registration refused"),
        }
        if session.take_monitor_arm() {
            info!("match started, arming inactivity monitor");
            tokio::spawn(monitor::run(Arc::clone(&self.inner), self.config));
        }
        result
    }

    /// Validates and applies a move.
    #[instrument(skip(self, token))]
    pub fn play(&self, name: &str, token: &str, coordinate: &str) -> Result<MoveReport, MoveError> {
        let mut session = self.inner.lock().unwrap();
        let result = session.play(name, token, coordinate, Instant::now());
        match &result {
            Ok(report) => info!(outcome = ?report.outcome, "move accepted"),
            Err(e) => debug!(error = %e, "move refused"),
        }
        result
    }

    /// Leaves the session, ending it for both players.
    #[instrument(skip(self, token))]
    pub fn leave(&self, name: &str, token: &str) -> bool {
        let mut session = self.inner.lock().unwrap();
        let left = session.leave(name, token);
        if left {
            info!("player left, session ended");
        }
        left
    }

    /// Starts a rematch with swapped symbols.
    #[instrument(skip(self))]
    pub fn restart(&self) -> bool {
        let mut session = self.inner.lock().unwrap();
        let restarted = session.restart(Instant::now());
        info!(restarted, "restart requested");
        restarted
    }

    /// Board snapshot.
    pub fn board(&self) -> Board {
        self.inner.lock().unwrap().board()
    }

    /// Current turn owner.
    pub fn turn(&self) -> Option<String> {
        self.inner.lock().unwrap().turn()
    }

    /// Registered players and their symbols.
    pub fn players(&self) -> BTreeMap<String, Symbol> {
        self.inner.lock().unwrap().players()
    }

    /// Whether the session has permanently ended.
    pub fn is_ended(&self) -> bool {
        self.inner.lock().unwrap().is_ended()
    }

    /// Why the session ended.
    pub fn end_reason(&self) -> String {
        self.inner.lock().unwrap().end_reason()
    }

    /// Win tally.
    pub fn stats(&self) -> ScoreBoard {
        self.inner.lock().unwrap().stats()
    }
}
