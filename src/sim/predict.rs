//! Price prediction mini-game
//!
//! The player picks one of the catalog's tokens, waits out a short reveal
//! delay, and is scored on the token's one-hour price change. Scores add up
//! across rounds until the session ends.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{TokenCatalog, TokenDescriptor};
use crate::leaderboard::ScoreSubmission;

/// Delay between picking a token and seeing the result
pub const PREDICT_REVEAL_MS: f64 = 3000.0;

/// Points by one-hour change: strictly above 5%, above 0%, above -5%, else
pub const PREDICT_POINTS_SURGE: u64 = 100;
pub const PREDICT_POINTS_UP: u64 = 50;
pub const PREDICT_POINTS_FLAT: u64 = 25;
pub const PREDICT_POINTS_DOWN: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PredictPhase {
    Selecting,
    Waiting { since_ms: f64 },
    Result { points: u64 },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("cannot {action} while {phase:?}")]
    WrongPhase {
        action: &'static str,
        phase: PredictPhase,
    },
    #[error("token {0} is not in the catalog")]
    UnknownToken(u64),
}

/// Points for a token's one-hour price change (percent)
pub fn points_for_change(change_pct: f64) -> u64 {
    if change_pct > 5.0 {
        PREDICT_POINTS_SURGE
    } else if change_pct > 0.0 {
        PREDICT_POINTS_UP
    } else if change_pct > -5.0 {
        PREDICT_POINTS_FLAT
    } else {
        PREDICT_POINTS_DOWN
    }
}

/// One prediction session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionGame {
    pub phase: PredictPhase,
    pub selected: Option<Arc<TokenDescriptor>>,
    pub score: u64,
    pub rounds: u32,
    #[serde(skip)]
    pub catalog: Arc<TokenCatalog>,
}

impl PredictionGame {
    pub fn new(catalog: Arc<TokenCatalog>) -> Self {
        Self {
            phase: PredictPhase::Selecting,
            selected: None,
            score: 0,
            rounds: 0,
            catalog,
        }
    }

    /// Tokens on offer this round
    pub fn choices(&self) -> &[Arc<TokenDescriptor>] {
        self.catalog.tokens()
    }

    /// Lock in a pick; the result is revealed `PREDICT_REVEAL_MS` later
    pub fn select(&mut self, token_id: u64, now_ms: f64) -> Result<(), PredictError> {
        if self.phase != PredictPhase::Selecting {
            return Err(PredictError::WrongPhase {
                action: "select",
                phase: self.phase,
            });
        }
        let token = self
            .catalog
            .tokens()
            .iter()
            .find(|t| t.id == token_id)
            .ok_or(PredictError::UnknownToken(token_id))?;
        log::debug!("Predicting {} ({})", token.symbol, token.id);
        self.selected = Some(Arc::clone(token));
        self.phase = PredictPhase::Waiting { since_ms: now_ms };
        Ok(())
    }

    /// Frame callback; scores the pick on the first frame at or after the
    /// reveal time and returns the points awarded
    pub fn update(&mut self, now_ms: f64) -> Option<u64> {
        let PredictPhase::Waiting { since_ms } = self.phase else {
            return None;
        };
        if now_ms < since_ms + PREDICT_REVEAL_MS {
            return None;
        }
        let change = self
            .selected
            .as_ref()
            .and_then(|t| t.market_data.as_ref())
            .map_or(0.0, |m| m.price_change_1h_pct);
        let points = points_for_change(change);
        self.score += points;
        self.rounds += 1;
        self.phase = PredictPhase::Result { points };
        log::info!("Prediction scored {points} ({change:+.2}% in 1h), total {}", self.score);
        Some(points)
    }

    /// Back to picking; the score carries over
    pub fn play_again(&mut self) -> Result<(), PredictError> {
        if !matches!(self.phase, PredictPhase::Result { .. }) {
            return Err(PredictError::WrongPhase {
                action: "play again",
                phase: self.phase,
            });
        }
        self.selected = None;
        self.phase = PredictPhase::Selecting;
        Ok(())
    }

    /// Session total so far; prediction rounds earn no reward currency
    pub fn submission(&self) -> ScoreSubmission {
        ScoreSubmission {
            score: self.score,
            reward_earned: 0,
        }
    }
}
