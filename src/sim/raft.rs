//! Legacy raft platformer
//!
//! The older game mode: the mascot hops between token platforms scrolling
//! past under gravity. Falling off the bottom costs a life; running out ends
//! the run. This is the only mode that uses lives.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::state::{EntityId, GamePhase, Platform};
use crate::catalog::{TokenCatalog, TokenDescriptor};
use crate::consts::{PICKUP_REWARD_MIN, PICKUP_REWARD_SPAN, PICKUP_SCORE, STARTING_LIVES};
use crate::leaderboard::ScoreSubmission;

pub const RAFT_GRAVITY: f32 = 0.5;
pub const RAFT_MOVE_SPEED: f32 = 3.0;
pub const RAFT_JUMP_SPEED: f32 = -8.0;
pub const RAFT_SCROLL_SPEED: f32 = 2.0;
pub const RAFT_RESPAWN: Vec2 = Vec2::new(50.0, 300.0);
/// Falling below this y costs a life
pub const RAFT_FLOOR_Y: f32 = 600.0;
pub const RAFT_RETIRE_X: f32 = -100.0;
pub const RAFT_MIN_PLATFORMS: usize = 3;
/// Landing window around a platform's top, above and below
pub const RAFT_LAND_ABOVE: f32 = 20.0;
pub const RAFT_LAND_BELOW: f32 = 10.0;

/// Held keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RaftInput {
    /// -1 left, 1 right, 0 none
    pub direction: i8,
    pub jump: bool,
}

/// Complete state of a raft run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaftState {
    pub phase: GamePhase,
    pub mascot: Vec2,
    pub velocity: Vec2,
    pub score: u64,
    pub reward: u64,
    pub lives: u8,
    pub platforms: Vec<Platform>,
    #[serde(skip)]
    pub catalog: Arc<TokenCatalog>,
    next_id: EntityId,
}

impl RaftState {
    /// One platform per catalog token, spread along the stream
    pub fn new(catalog: Arc<TokenCatalog>, rng: &mut dyn RandomSource) -> Self {
        let mut state = Self {
            phase: GamePhase::Playing,
            mascot: RAFT_RESPAWN,
            velocity: Vec2::ZERO,
            score: 0,
            reward: 0,
            lives: STARTING_LIVES,
            platforms: Vec::new(),
            catalog,
            next_id: 1,
        };
        for (i, token) in state.catalog.tokens().to_vec().into_iter().enumerate() {
            let x = 100.0 + i as f32 * 200.0 + rng.next_f32() * 100.0;
            let platform = state.platform_at(x, token, rng);
            state.platforms.push(platform);
        }
        state
    }

    /// The run's result once it is over
    pub fn submission(&self) -> Option<ScoreSubmission> {
        (self.phase == GamePhase::GameOver).then_some(ScoreSubmission {
            score: self.score,
            reward_earned: self.reward,
        })
    }

    /// Draw order: y, width
    fn platform_at(
        &mut self,
        x: f32,
        token: Arc<TokenDescriptor>,
        rng: &mut dyn RandomSource,
    ) -> Platform {
        let y = rng.range(400.0, 200.0);
        let width = rng.range(80.0, 40.0);
        let id = self.next_id;
        self.next_id += 1;
        Platform {
            id,
            pos: Vec2::new(x, y),
            vel: Vec2::new(-RAFT_SCROLL_SPEED, 0.0),
            width,
            token,
            collected: false,
        }
    }
}

/// Advance a raft run by one tick
pub fn tick_raft(prev: &RaftState, input: &RaftInput, rng: &mut dyn RandomSource) -> RaftState {
    let mut next = prev.clone();
    if next.phase != GamePhase::Playing {
        return next;
    }

    next.velocity.x = input.direction.signum() as f32 * RAFT_MOVE_SPEED;
    if input.jump {
        next.velocity.y = RAFT_JUMP_SPEED;
    }
    let pos = next.mascot + next.velocity;

    // Landing freezes the stream for this tick
    if let Some(platform) = next.platforms.iter_mut().find(|p| lands_on(p, pos)) {
        platform.collected = true;
        next.score += PICKUP_SCORE;
        next.reward += rng.range(PICKUP_REWARD_MIN, PICKUP_REWARD_SPAN).floor() as u64;
        next.mascot = Vec2::new(pos.x, platform.pos.y - RAFT_LAND_ABOVE);
        next.velocity.y = RAFT_JUMP_SPEED;
        return next;
    }

    if pos.y > RAFT_FLOOR_Y {
        next.lives = next.lives.saturating_sub(1);
        if next.lives == 0 {
            log::info!("Raft run over: score {} reward {}", next.score, next.reward);
            next.phase = GamePhase::GameOver;
        } else {
            next.mascot = RAFT_RESPAWN;
            next.velocity = Vec2::ZERO;
        }
        return next;
    }

    for platform in &mut next.platforms {
        platform.pos += platform.vel;
    }
    next.platforms.retain(|p| p.pos.x > RAFT_RETIRE_X);
    if next.platforms.len() < RAFT_MIN_PLATFORMS {
        let x = match next.platforms.last() {
            Some(last) => last.pos.x + 200.0 + rng.next_f32() * 100.0,
            None => 800.0,
        };
        if let Some(token) = next.catalog.pick(rng.next_f32()) {
            let platform = next.platform_at(x, token, rng);
            next.platforms.push(platform);
        }
    }

    next.mascot = pos;
    next.velocity.y += RAFT_GRAVITY;
    next
}

fn lands_on(platform: &Platform, pos: Vec2) -> bool {
    !platform.collected
        && (platform.pos.x..=platform.pos.x + platform.width).contains(&pos.x)
        && (platform.pos.y - RAFT_LAND_ABOVE..=platform.pos.y + RAFT_LAND_BELOW).contains(&pos.y)
}
