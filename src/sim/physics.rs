//! Position integration
//!
//! Order within a tick: collectibles move, the mascot drifts and steers toward
//! the nearest collectible, a nearby flood shoves it, then it is clamped to
//! the field.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{EntityId, Flood, GameSnapshot, Platform};
use crate::config::GameConfig;
use crate::consts::*;

/// One integration pass
pub fn step(snap: &mut GameSnapshot, config: &GameConfig, rng: &mut dyn RandomSource) {
    for platform in &mut snap.collectibles {
        platform.pos += platform.vel;
    }

    let start = snap.mascot;
    let mut pos = start - Vec2::new(CURRENT_DRIFT, 0.0);

    if snap.holding {
        snap.target = None;
        if let Some((id, target)) = nearest_collectible(&snap.collectibles, start) {
            pos += steer(start, target, SWIM_SPEED * snap.multiplier);
            snap.target = Some(id);
        }
    }

    pos += flood_displacement(&snap.flood, pos, rng);

    let (min, max) = config.mascot_bounds();
    snap.mascot = pos.clamp(min, max);
}

/// Closest unconsumed collectible to `from`; ties keep the earlier one
pub fn nearest_collectible(platforms: &[Platform], from: Vec2) -> Option<(EntityId, Vec2)> {
    platforms
        .iter()
        .filter(|p| !p.collected)
        .fold(None::<(EntityId, Vec2, f32)>, |best, p| {
            let d = from.distance(p.pos);
            match best {
                Some((_, _, best_d)) if best_d <= d => best,
                _ => Some((p.id, p.pos, d)),
            }
        })
        .map(|(id, pos, _)| (id, pos))
}

/// Movement of `speed` units from `from` toward `to`
fn steer(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    (to - from).normalize_or_zero() * speed
}

/// Push from an active flood when the mascot is within range of its front
///
/// Draws one random value (the perpendicular jitter) only when in range.
pub fn flood_displacement(flood: &Flood, mascot: Vec2, rng: &mut dyn RandomSource) -> Vec2 {
    if !flood.active || flood.axis_distance(mascot) >= FLOOD_RANGE {
        return Vec2::ZERO;
    }
    let push = flood.direction.push() * flood.intensity * FLOOD_PUSH;
    let jitter = (rng.next_f32() - 0.5) * flood.intensity * FLOOD_JITTER;
    let perpendicular = if flood.direction.is_horizontal() {
        Vec2::Y
    } else {
        Vec2::X
    };
    push + perpendicular * jitter
}
