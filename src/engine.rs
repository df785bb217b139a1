//! Game loop driver
//!
//! `GameEngine` owns the authoritative snapshot, the random source and the
//! loop state. Every change builds a new snapshot and swaps the `Arc`, so a
//! renderer holding the previous one never observes a half-applied tick.
//!
//! The engine is single-threaded: input edges and frames must be delivered
//! from the same thread (the animation-frame callback and its input
//! handlers).

use std::sync::Arc;

use crate::catalog::{CatalogError, TokenCatalog};
use crate::config::GameConfig;
use crate::leaderboard::ScoreSubmission;
use crate::sim::phase::{self, GateError, PhaseError};
use crate::sim::rng::{PcgSource, RandomSource};
use crate::sim::state::{GameEvent, GamePhase, GameSnapshot};
use crate::sim::tick::{self, InputEvent, TickInput};

/// Errors from loading the catalog into the engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Phase(#[from] PhaseError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub struct GameEngine {
    config: GameConfig,
    rng: Box<dyn RandomSource>,
    snapshot: Arc<GameSnapshot>,
    catalog_error: Option<CatalogError>,
    running: bool,
}

impl GameEngine {
    pub fn new(config: GameConfig, rng: Box<dyn RandomSource>) -> Self {
        let snapshot = Arc::new(GameSnapshot::new(config.mascot_start));
        Self {
            config,
            rng,
            snapshot,
            catalog_error: None,
            running: false,
        }
    }

    /// Engine backed by a seeded PCG source
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::new(config, Box::new(PcgSource::new(seed)))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current snapshot; stays valid after later frames
    pub fn snapshot(&self) -> Arc<GameSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn phase(&self) -> GamePhase {
        self.snapshot.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Splash screen finished; start waiting for the catalog
    pub fn splash_complete(&mut self) -> Result<(), PhaseError> {
        self.update(|snap| phase::transition(snap, GamePhase::Loading))
    }

    /// Deliver the catalog fetch result
    ///
    /// On success a fresh run starts and the loop begins ticking. On failure,
    /// including an empty catalog, the error is kept for display and the
    /// engine stays in Loading.
    pub fn catalog_loaded(
        &mut self,
        result: Result<TokenCatalog, CatalogError>,
        now_ms: f64,
    ) -> Result<(), LoadError> {
        let phase = self.phase();
        if phase != GamePhase::Loading {
            return Err(PhaseError::IllegalTransition {
                from: phase,
                to: GamePhase::Playing,
            }
            .into());
        }

        // A catalog with nothing to collect is as unusable as a failed fetch
        let result = result.and_then(|catalog| {
            if catalog.is_empty() {
                Err(CatalogError::Empty)
            } else {
                Ok(catalog)
            }
        });
        let catalog = match result {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Catalog unavailable: {e}");
                self.catalog_error = Some(e.clone());
                return Err(e.into());
            }
        };

        self.catalog_error = None;
        let run = tick::new_run(&self.config, Arc::new(catalog), now_ms, self.rng.as_mut());
        self.snapshot = Arc::new(run);
        self.running = true;
        Ok(())
    }

    /// Last catalog failure, if the engine is waiting on a retry
    pub fn catalog_error(&self) -> Option<&CatalogError> {
        self.catalog_error.as_ref()
    }

    /// Clear the catalog error so the app can fetch again
    pub fn retry_catalog(&mut self) -> Result<(), PhaseError> {
        if self.phase() != GamePhase::Loading {
            return Err(PhaseError::IllegalTransition {
                from: self.phase(),
                to: GamePhase::Loading,
            });
        }
        if let Some(e) = self.catalog_error.take() {
            log::info!("Retrying catalog after: {e}");
        }
        Ok(())
    }

    pub fn action_pressed(&mut self) {
        self.input(InputEvent::Pressed);
    }

    pub fn action_released(&mut self) {
        self.input(InputEvent::Released);
    }

    fn input(&mut self, event: InputEvent) {
        let mut next = GameSnapshot::clone(&self.snapshot);
        tick::apply_input(&mut next, event);
        self.snapshot = Arc::new(next);
    }

    /// Animation-frame callback: run one tick at `now_ms`
    ///
    /// Returns false (and does nothing) once the loop is stopped.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.running {
            return false;
        }
        let input = TickInput { now_ms };
        let next = tick::tick(&self.snapshot, &input, &self.config, self.rng.as_mut());
        self.snapshot = Arc::new(next);
        true
    }

    /// Pay for the burn; it resolves on the first frame 3 s after `now_ms`
    pub fn burn(&mut self, now_ms: f64) -> Result<(), GateError> {
        self.update(|snap| phase::begin_burn(snap, now_ms))
    }

    /// Whether the skip option should be offered
    pub fn can_skip(&self) -> bool {
        phase::can_skip(&self.snapshot)
    }

    pub fn skip_burn(&mut self) -> Result<(), GateError> {
        self.update(phase::take_skip)
    }

    /// End the run and hand back its result
    ///
    /// Succeeds once per run; the loop stops.
    pub fn end_run(&mut self) -> Result<ScoreSubmission, PhaseError> {
        let submission = self.update(|snap| {
            phase::transition(snap, GamePhase::GameOver)?;
            snap.events.push(GameEvent::RunEnded {
                score: snap.score,
                reward: snap.reward,
            });
            Ok(ScoreSubmission {
                score: snap.score,
                reward_earned: snap.reward,
            })
        })?;
        self.running = false;
        log::info!(
            "Run ended: score {} reward {}",
            submission.score,
            submission.reward_earned
        );
        Ok(submission)
    }

    /// Discard the finished run and wait for a new catalog
    pub fn restart(&mut self) -> Result<(), PhaseError> {
        if self.phase() != GamePhase::GameOver {
            return Err(PhaseError::IllegalTransition {
                from: self.phase(),
                to: GamePhase::Loading,
            });
        }
        let mut fresh = GameSnapshot::new(self.config.mascot_start);
        fresh.phase = GamePhase::GameOver;
        phase::transition(&mut fresh, GamePhase::Loading)?;
        self.snapshot = Arc::new(fresh);
        self.catalog_error = None;
        self.running = false;
        Ok(())
    }

    /// Cancel the loop (teardown)
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("Loop stopped in {:?}", self.phase());
        }
        self.running = false;
    }

    /// Apply a fallible change to a copy and swap it in only on success
    fn update<T, E>(
        &mut self,
        f: impl FnOnce(&mut GameSnapshot) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut next = GameSnapshot::clone(&self.snapshot);
        let out = f(&mut next)?;
        self.snapshot = Arc::new(next);
        Ok(out)
    }
}
