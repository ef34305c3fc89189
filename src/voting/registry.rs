use std::sync::Arc;

use serenity::prelude::TypeMapKey;
use tokio::sync::Mutex;

use crate::error::BotError;
use crate::models::Suggestion;

/// The explicit record of the round currently on display. The rendered
/// message stays the wire format, but resolution goes through this record
/// first so a round can only be resolved once.
#[derive(Debug, Clone)]
pub struct ActiveRound {
    pub channel_id: u64,
    pub message_id: u64,
    pub started: chrono::NaiveDateTime,
    pub candidates: Vec<Suggestion>,
    pub resolved: bool,
}

#[derive(Default)]
pub struct RoundRegistry {
    current: Mutex<Option<ActiveRound>>,
}

impl RoundRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new round, returning whatever it displaced. The daily
    /// trigger and a manual /vote can race; last writer wins and the caller
    /// decides whether the displaced round is worth a warning.
    pub async fn begin(&self, round: ActiveRound) -> Option<ActiveRound> {
        self.current.lock().await.replace(round)
    }

    /// Claims the open round for resolution, flipping it to resolved in the
    /// same critical section. A second claim fails instead of re-resolving.
    pub async fn try_claim(&self) -> Result<ActiveRound, BotError> {
        let mut guard = self.current.lock().await;
        match guard.as_mut() {
            None => Err(BotError::RoundNotFound),
            Some(round) if round.resolved => Err(BotError::RoundResolved),
            Some(round) => {
                round.resolved = true;
                Ok(round.clone())
            }
        }
    }

    /// Undoes a claim whose resolution failed before any win was recorded.
    pub async fn reopen(&self) {
        if let Some(round) = self.current.lock().await.as_mut() {
            round.resolved = false;
        }
    }
}

pub struct Rounds;

impl TypeMapKey for Rounds {
    type Value = Arc<RoundRegistry>;
}
