//! Phase transitions and the burn gate
//!
//! ```text
//! Splash -> Loading -> Playing <-> BurnRequired
//!                         |            |
//!                         v            v
//!                      GameOver <------+
//!                         |
//!                         +--> Loading (restart)
//! ```

use super::state::{BurnProgress, GameEvent, GamePhase, GameSnapshot};
use crate::consts::*;

/// A phase change that the state machine does not allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    #[error("cannot move from {from:?} to {to:?}")]
    IllegalTransition { from: GamePhase, to: GamePhase },
}

/// Why a burn-gate action was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("not at the burn gate (phase is {0:?})")]
    NotGated(GamePhase),
    #[error("burn costs {cost} but only {available} is available")]
    InsufficientReward { cost: u64, available: u64 },
    #[error("a burn is already in progress")]
    BurnInProgress,
    #[error("skip is only offered while the burn cannot be afforded")]
    CanAffordBurn,
}

impl GamePhase {
    pub fn can_transition_to(self, to: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, to),
            (Splash, Loading)
                | (Loading, Playing)
                | (Playing, BurnRequired)
                | (BurnRequired, Playing)
                | (Playing, GameOver)
                | (BurnRequired, GameOver)
                | (GameOver, Loading)
        )
    }

    /// Phases in which the loop keeps ticking
    pub fn is_live(self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::BurnRequired)
    }
}

/// Checked phase change
pub fn transition(snap: &mut GameSnapshot, to: GamePhase) -> Result<(), PhaseError> {
    if !snap.phase.can_transition_to(to) {
        return Err(PhaseError::IllegalTransition {
            from: snap.phase,
            to,
        });
    }
    enter(snap, to);
    Ok(())
}

/// Unchecked phase change for callers that already hold the precondition
pub(crate) fn enter(snap: &mut GameSnapshot, to: GamePhase) {
    log::info!("Phase {:?} -> {:?}", snap.phase, to);
    snap.phase = to;
}

/// Start paying for the burn; it resolves in the tick once the delay has passed
pub fn begin_burn(snap: &mut GameSnapshot, now_ms: f64) -> Result<(), GateError> {
    if snap.phase != GamePhase::BurnRequired {
        return Err(GateError::NotGated(snap.phase));
    }
    if snap.burn.is_some() {
        return Err(GateError::BurnInProgress);
    }
    if !snap.can_afford_burn() {
        return Err(GateError::InsufficientReward {
            cost: BURN_COST,
            available: snap.reward,
        });
    }
    snap.burn = Some(BurnProgress { started_ms: now_ms });
    snap.events.push(GameEvent::BurnStarted);
    log::info!("Burning {} reward", BURN_COST);
    Ok(())
}

/// Whether the burn delay has elapsed at `now_ms`
pub fn burn_due(snap: &GameSnapshot, now_ms: f64) -> bool {
    snap.burn
        .is_some_and(|burn| now_ms >= burn.started_ms + BURN_DELAY_MS)
}

/// Whether the skip option should be offered
pub fn can_skip(snap: &GameSnapshot) -> bool {
    snap.phase == GamePhase::BurnRequired && snap.burn.is_none() && !snap.can_afford_burn()
}

/// Take the catch-up bonus instead of burning
///
/// The gate stays up; the bonus is meant to make the burn affordable.
pub fn take_skip(snap: &mut GameSnapshot) -> Result<(), GateError> {
    if snap.phase != GamePhase::BurnRequired {
        return Err(GateError::NotGated(snap.phase));
    }
    if snap.burn.is_some() {
        return Err(GateError::BurnInProgress);
    }
    if snap.can_afford_burn() {
        return Err(GateError::CanAffordBurn);
    }
    snap.reward += SKIP_BONUS;
    snap.confetti_ticks = CONFETTI_TICKS;
    snap.events.push(GameEvent::SkipTaken { bonus: SKIP_BONUS });
    log::info!("Skip taken, reward now {}", snap.reward);
    Ok(())
}
