//! Inactivity monitor: terminates a stalled match.
//!
//! One monitor task runs per match start. It wakes on a fixed interval,
//! takes the same lock as every session operation, and ends the session
//! once no move has landed within the configured timeout. It exits as soon
//! as it observes the session ended by any means.

use crate::session::{Session, SessionConfig};
use std::sync::{Arc, Mutex};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

/// Runs the periodic inactivity sweep until the session ends.
#[instrument(skip(session, config), fields(timeout = ?config.move_timeout))]
pub async fn run(session: Arc<Mutex<Session>>, config: SessionConfig) {
    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately; the match just started, so it is
    // a no-op check.
    loop {
        ticker.tick().await;
        let mut session = session.lock().unwrap();
        if session.is_ended() {
            debug!("session ended, monitor exiting");
            return;
        }
        if session.expire_if_inactive(Instant::now(), config.move_timeout) {
            info!("session ended due to inactivity");
            return;
        }
    }
}
