//! Flood hazard scheduling and the burn-gate escalation
//!
//! While no flood is running, the scheduler waits out a randomized interval
//! (drawn once when the previous flood was scheduled). Every spawn attempt
//! counts; the tenth one since the last burn freezes the run instead of
//! spawning.

use super::phase;
use super::rng::RandomSource;
use super::state::{Flood, FloodDirection, GameEvent, GamePhase, GameSnapshot};
use crate::config::GameConfig;
use crate::consts::*;

/// Outcome of one scheduler pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodStep {
    Idle,
    Advanced,
    Ended,
    Spawned,
    BurnGate,
}

/// Draw the wait before the next spawn attempt
pub fn draw_interval(rng: &mut dyn RandomSource) -> f64 {
    FLOOD_INTERVAL_MIN_MS + rng.next_f32() as f64 * FLOOD_INTERVAL_SPAN_MS
}

/// Start the flood clock at `now_ms`
pub fn schedule(snap: &mut GameSnapshot, now_ms: f64, rng: &mut dyn RandomSource) {
    snap.last_flood_ms = now_ms;
    snap.flood_interval_ms = draw_interval(rng);
}

/// One scheduler pass
pub fn step(
    snap: &mut GameSnapshot,
    now_ms: f64,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
) -> FloodStep {
    if snap.flood.active {
        return advance(snap);
    }

    if now_ms - snap.last_flood_ms <= snap.flood_interval_ms {
        return FloodStep::Idle;
    }

    snap.flood_count += 1;
    if snap.flood_count >= FLOODS_BEFORE_BURN {
        phase::enter(snap, GamePhase::BurnRequired);
        snap.events.push(GameEvent::BurnRequired {
            flood_count: snap.flood_count,
        });
        log::info!("Survived {} floods, burn required", snap.flood_count);
        return FloodStep::BurnGate;
    }

    snap.flood = spawn(config, rng);
    schedule(snap, now_ms, rng);
    snap.events.push(GameEvent::FloodStarted {
        direction: snap.flood.direction,
    });
    log::debug!(
        "Flood {} from {:?} (intensity {:.2})",
        snap.flood_count,
        snap.flood.direction,
        snap.flood.intensity
    );
    FloodStep::Spawned
}

/// Draw order: direction, intensity
fn spawn(config: &GameConfig, rng: &mut dyn RandomSource) -> Flood {
    let idx = ((rng.next_f32() * 4.0) as usize).min(3);
    let direction = FloodDirection::ALL[idx];
    let position = if direction.is_horizontal() {
        config.flood_origin.x
    } else {
        config.flood_origin.y
    };
    Flood {
        active: true,
        direction,
        position,
        intensity: rng.range(FLOOD_INTENSITY_MIN, FLOOD_INTENSITY_SPAN),
        remaining_duration: FLOOD_DURATION_TICKS,
    }
}

fn advance(snap: &mut GameSnapshot) -> FloodStep {
    let flood = &mut snap.flood;
    flood.remaining_duration = flood.remaining_duration.saturating_sub(1);
    if flood.remaining_duration == 0 {
        flood.active = false;
        flood.intensity = 0.0;
        snap.events.push(GameEvent::FloodEnded);
        return FloodStep::Ended;
    }
    flood.position += flood.direction.travel_sign() * FLOOD_SPEED;
    FloodStep::Advanced
}
