//! Game snapshot and core simulation types
//!
//! `GameSnapshot` is the single source of truth. Ticks never mutate it in
//! place; they build the next one from a copy.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::{TokenCatalog, TokenDescriptor};
use crate::consts::*;

/// Entity identifier, unique within a run
pub type EntityId = u32;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Splash screen, waiting for the renderer to finish it
    Splash,
    /// Waiting on the token catalog
    Loading,
    /// Active gameplay
    Playing,
    /// Frozen after ten floods until the player burns or skips
    BurnRequired,
    /// Run ended
    GameOver,
}

/// A drifting collectible tied to a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub pos: Vec2,
    /// Constant once spawned
    pub vel: Vec2,
    pub width: f32,
    pub token: Arc<TokenDescriptor>,
    pub collected: bool,
}

/// A short-lived reward (positive) or penalty bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bag {
    pub id: EntityId,
    pub pos: Vec2,
    pub remaining_life: u32,
    pub is_positive: bool,
}

/// Cosmetic burst; the renderer owns the visuals, we only count its life down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstEffect {
    pub id: EntityId,
    pub pos: Vec2,
    pub remaining_life: u32,
}

/// Direction a flood travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloodDirection {
    Left,
    Right,
    Up,
    Down,
}

impl FloodDirection {
    pub const ALL: [FloodDirection; 4] = [
        FloodDirection::Left,
        FloodDirection::Right,
        FloodDirection::Up,
        FloodDirection::Down,
    ];

    /// Horizontal floods sweep along x, vertical ones along y
    pub fn is_horizontal(&self) -> bool {
        matches!(self, FloodDirection::Left | FloodDirection::Right)
    }

    /// Sign of the flood front's movement along its axis
    pub fn travel_sign(&self) -> f32 {
        match self {
            FloodDirection::Left | FloodDirection::Up => -1.0,
            FloodDirection::Right | FloodDirection::Down => 1.0,
        }
    }

    /// Unit push applied to a mascot caught by the flood
    pub fn push(&self) -> Vec2 {
        match self {
            FloodDirection::Left => Vec2::X,
            FloodDirection::Right => Vec2::NEG_X,
            FloodDirection::Up => Vec2::Y,
            FloodDirection::Down => Vec2::NEG_Y,
        }
    }
}

/// The flood hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flood {
    pub active: bool,
    pub direction: FloodDirection,
    /// Position of the flood front along its axis
    pub position: f32,
    pub intensity: f32,
    pub remaining_duration: u32,
}

impl Default for Flood {
    fn default() -> Self {
        Self {
            active: false,
            direction: FloodDirection::Left,
            position: 0.0,
            intensity: 0.0,
            remaining_duration: 0,
        }
    }
}

impl Flood {
    /// Distance from a point to the flood front along the flood's axis
    pub fn axis_distance(&self, point: Vec2) -> f32 {
        let coord = if self.direction.is_horizontal() {
            point.x
        } else {
            point.y
        };
        (coord - self.position).abs()
    }
}

/// Burn in progress (cosmetic delay before it resolves)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnProgress {
    pub started_ms: f64,
}

/// Things that happened during the last tick, for renderers and audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    TokenCollected {
        id: EntityId,
        symbol: String,
        score: u64,
        reward: u64,
    },
    BagCaught { id: EntityId, score: u64 },
    BagPenalty { id: EntityId, reward_lost: u64 },
    BagMissed { id: EntityId },
    FloodStarted { direction: FloodDirection },
    FloodEnded,
    BurnRequired { flood_count: u32 },
    BurnStarted,
    BurnCompleted,
    SkipTaken { bonus: u64 },
    MultiplierReset,
    RunEnded { score: u64, reward: u64 },
}

/// Complete game state for one tick (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    /// Ticks simulated while Playing
    pub time_ticks: u64,
    pub mascot: Vec2,
    pub score: u64,
    /// Accumulated reward currency
    pub reward: u64,
    pub multiplier: f32,
    /// Only the raft variant loses lives
    pub lives: u8,
    /// Collectibles (ordered by id)
    pub collectibles: Vec<Platform>,
    /// Bags (ordered by id)
    pub bags: Vec<Bag>,
    pub bursts: Vec<BurstEffect>,
    pub flood: Flood,
    /// Floods survived since the last burn
    pub flood_count: u32,
    pub holding: bool,
    /// Release seen outside Playing; the multiplier resets on resume
    pub release_pending: bool,
    pub target: Option<EntityId>,

    // === Clocks (frame timestamps, ms) ===
    pub last_flood_ms: f64,
    /// Threshold drawn when the last flood was scheduled
    pub flood_interval_ms: f64,
    pub last_bag_ms: f64,

    // === Burn gate ===
    pub burn: Option<BurnProgress>,

    // === Cosmetics (tick-counted) ===
    pub sizzle_ticks: u32,
    pub confetti_ticks: u32,

    /// Invariant clamps applied so far (should stay 0)
    pub clamp_count: u32,
    /// Events from the last tick, then any raised since by input edges or
    /// gate actions; those carry into the next tick's list
    pub events: Vec<GameEvent>,
    /// How many leading `events` the last tick produced
    #[serde(skip)]
    pub(crate) tick_events: usize,

    #[serde(skip)]
    pub catalog: Arc<TokenCatalog>,
    next_id: EntityId,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self::new(Vec2::new(100.0, 200.0))
    }
}

impl GameSnapshot {
    /// Fresh snapshot in the Splash phase with the mascot at `start`
    pub fn new(start: Vec2) -> Self {
        Self {
            phase: GamePhase::Splash,
            time_ticks: 0,
            mascot: start,
            score: 0,
            reward: 0,
            multiplier: MULTIPLIER_MIN,
            lives: STARTING_LIVES,
            collectibles: Vec::new(),
            bags: Vec::new(),
            bursts: Vec::new(),
            flood: Flood::default(),
            flood_count: 0,
            holding: false,
            release_pending: false,
            target: None,
            last_flood_ms: 0.0,
            flood_interval_ms: FLOOD_INTERVAL_MIN_MS,
            last_bag_ms: 0.0,
            burn: None,
            sizzle_ticks: 0,
            confetti_ticks: 0,
            clamp_count: 0,
            events: Vec::new(),
            tick_events: 0,
            catalog: Arc::new(TokenCatalog::default()),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Collectibles not yet picked up
    pub fn active_collectibles(&self) -> impl Iterator<Item = &Platform> {
        self.collectibles.iter().filter(|p| !p.collected)
    }

    /// Whether the burn can be paid for
    pub fn can_afford_burn(&self) -> bool {
        self.reward >= BURN_COST
    }

    pub fn push_burst(&mut self, pos: Vec2, life: u32) {
        let id = self.next_entity_id();
        self.bursts.push(BurstEffect {
            id,
            pos,
            remaining_life: life,
        });
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.collectibles.sort_by_key(|p| p.id);
        self.bags.sort_by_key(|b| b.id);
        self.bursts.sort_by_key(|b| b.id);
    }
}
