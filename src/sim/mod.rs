//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Randomness only through `RandomSource`
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod flood;
pub mod phase;
pub mod physics;
pub mod predict;
pub mod raft;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::ContactSummary;
pub use phase::{GateError, PhaseError};
pub use predict::{PredictError, PredictPhase, PredictionGame};
pub use raft::{RaftInput, RaftState, tick_raft};
pub use rng::{PcgSource, RandomSource, SequenceSource};
pub use state::{
    Bag, BurnProgress, BurstEffect, EntityId, Flood, FloodDirection, GameEvent, GamePhase,
    GameSnapshot, Platform,
};
pub use tick::{InputEvent, TickInput, apply_input, new_run, tick};
