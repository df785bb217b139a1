//! River Swimmer - a token-catching river arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, physics, collisions, floods, phases)
//!   plus the raft and price-prediction side modes
//! - `engine`: Loop driver that owns the authoritative snapshot
//! - `catalog`: Trending-token catalog consumed by the spawner
//! - `leaderboard`: Score submission and top-10 board
//! - `config`: Play-field geometry and spawn layout

pub mod catalog;
pub mod config;
pub mod engine;
pub mod leaderboard;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use catalog::{CatalogError, MarketData, TokenCatalog, TokenDescriptor};
pub use config::{ConfigError, GameConfig, Viewport};
pub use engine::{GameEngine, LoadError};
pub use leaderboard::{Leaderboard, LeaderboardEntry, Player, PlayerScore, ScoreSubmission};

/// Game rule constants
pub mod consts {
    /// Simulation rate the tick-counted lifetimes are tuned for
    pub const TICK_RATE_HZ: u32 = 60;

    /// Mascot drift from the river current (units/tick, leftward)
    pub const CURRENT_DRIFT: f32 = 0.8;
    /// Swim speed toward the target collectible, scaled by the multiplier
    pub const SWIM_SPEED: f32 = 2.0;

    /// Collectibles
    pub const COLLECTIBLE_SPEED_MIN: f32 = 1.5;
    pub const COLLECTIBLE_SPEED_SPAN: f32 = 1.0;
    pub const COLLECTIBLE_DRIFT_SPAN: f32 = 0.3; // vertical drift in [-0.15, 0.15]
    pub const COLLECTIBLE_WIDTH_MIN: f32 = 50.0;
    pub const COLLECTIBLE_WIDTH_SPAN: f32 = 30.0;
    /// Collectibles left of this x are retired
    pub const COLLECTIBLE_RETIRE_X: f32 = -50.0;
    /// Horizontal spacing of the initial stagger when a run starts
    pub const INITIAL_STAGGER: f32 = 120.0;
    pub const INITIAL_JITTER: f32 = 80.0;

    /// Reward/penalty bags
    pub const BAG_INTERVAL_MS: f64 = 3000.0;
    pub const BAG_POSITIVE_CHANCE: f32 = 0.4;
    pub const BAG_LIFETIME_TICKS: u32 = 60;
    pub const BAG_BONUS_SCORE: u64 = 200;
    pub const BAG_PENALTY_REWARD: u64 = 333;

    /// Pickup resolution
    pub const CONTACT_RADIUS: f32 = 60.0;
    pub const PICKUP_SCORE: u64 = 100;
    pub const PICKUP_REWARD_MIN: f32 = 10.0;
    pub const PICKUP_REWARD_SPAN: f32 = 50.0;
    pub const PICKUP_BURST_TICKS: u32 = 30;
    pub const BAG_BURST_TICKS: u32 = 20;

    /// Multiplier
    pub const MULTIPLIER_MIN: f32 = 1.0;
    pub const MULTIPLIER_MAX: f32 = 33.0;
    pub const MULTIPLIER_STEP: f32 = 0.5;

    /// Floods
    pub const FLOOD_INTERVAL_MIN_MS: f64 = 8000.0;
    pub const FLOOD_INTERVAL_SPAN_MS: f64 = 7000.0;
    pub const FLOOD_DURATION_TICKS: u32 = 60;
    pub const FLOOD_SPEED: f32 = 3.0;
    pub const FLOOD_RANGE: f32 = 80.0;
    pub const FLOOD_PUSH: f32 = 2.0;
    pub const FLOOD_JITTER: f32 = 3.0;
    pub const FLOOD_INTENSITY_MIN: f32 = 0.8;
    pub const FLOOD_INTENSITY_SPAN: f32 = 0.4;

    /// Burn gate
    pub const FLOODS_BEFORE_BURN: u32 = 10;
    pub const BURN_COST: u64 = 3000;
    pub const BURN_DELAY_MS: f64 = 3000.0;
    pub const SKIP_BONUS: u64 = 3000;

    /// Cosmetic timers (ticks)
    pub const SIZZLE_PICKUP_TICKS: u32 = 12; // ~200ms
    pub const SIZZLE_RELEASE_TICKS: u32 = 30; // ~500ms
    pub const CONFETTI_TICKS: u32 = 180; // ~3s

    /// Starting lives (only the raft variant loses them)
    pub const STARTING_LIVES: u8 = 3;
}

/// Duration of one tick in milliseconds at the nominal rate
#[inline]
pub fn tick_ms() -> f64 {
    1000.0 / consts::TICK_RATE_HZ as f64
}
