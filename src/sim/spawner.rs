//! Collectible and bag population
//!
//! Runs first in every Playing tick: retire what is spent, age what is left,
//! then top up. Collectibles arrive one per tick until the target count is
//! reached; bags at most once per interval.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Bag, GameSnapshot, Platform};
use crate::config::GameConfig;
use crate::consts::*;

/// One spawner pass
pub fn step(snap: &mut GameSnapshot, now_ms: f64, config: &GameConfig, rng: &mut dyn RandomSource) {
    retire(snap);
    age(snap);
    top_up_collectibles(snap, config, rng);
    maybe_spawn_bag(snap, now_ms, config, rng);
}

/// Drop collected, off-screen and expired entities
pub fn retire(snap: &mut GameSnapshot) {
    snap.collectibles
        .retain(|p| !p.collected && p.pos.x >= COLLECTIBLE_RETIRE_X);
    snap.bags.retain(|b| b.remaining_life > 0);
    snap.bursts.retain(|b| b.remaining_life > 0);
}

/// Count down bag and burst lifetimes
fn age(snap: &mut GameSnapshot) {
    for bag in &mut snap.bags {
        bag.remaining_life = bag.remaining_life.saturating_sub(1);
    }
    for burst in &mut snap.bursts {
        burst.remaining_life = burst.remaining_life.saturating_sub(1);
    }
}

/// Add one collectible past the right edge if below the target count
pub fn top_up_collectibles(
    snap: &mut GameSnapshot,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
) {
    if snap.active_collectibles().count() >= config.target_collectibles {
        return;
    }
    let x = config.field_width + rng.next_f32() * config.spawn_offscreen_span;
    let (band_top, band_height) = (config.spawn_band_top, config.spawn_band_height);
    if let Some(platform) = new_platform(snap, x, band_top, band_height, rng) {
        log::debug!("Spawned collectible {} at {:?}", platform.id, platform.pos);
        snap.collectibles.push(platform);
    }
}

/// Seed a new run: one collectible per catalog token, staggered off-screen
pub fn seed_collectibles(snap: &mut GameSnapshot, config: &GameConfig, rng: &mut dyn RandomSource) {
    let count = snap.catalog.len().min(config.target_collectibles);
    // Initial spread covers most of the field height
    let band_top = config.bag_margin;
    let band_height = (config.field_height - 2.0 * config.bag_margin).max(config.spawn_band_height);
    for i in 0..count {
        let x = config.field_width
            + i as f32 * INITIAL_STAGGER
            + rng.next_f32() * INITIAL_JITTER;
        if let Some(platform) = new_platform(snap, x, band_top, band_height, rng) {
            snap.collectibles.push(platform);
        }
    }
}

/// Draw order: y, speed, vertical drift, width, token
fn new_platform(
    snap: &mut GameSnapshot,
    x: f32,
    band_top: f32,
    band_height: f32,
    rng: &mut dyn RandomSource,
) -> Option<Platform> {
    if snap.catalog.is_empty() {
        return None;
    }
    let y = rng.range(band_top, band_height);
    let speed = rng.range(COLLECTIBLE_SPEED_MIN, COLLECTIBLE_SPEED_SPAN);
    let vy = (rng.next_f32() - 0.5) * COLLECTIBLE_DRIFT_SPAN;
    let width = rng.range(COLLECTIBLE_WIDTH_MIN, COLLECTIBLE_WIDTH_SPAN);
    let token = snap.catalog.pick(rng.next_f32())?;
    Some(Platform {
        id: snap.next_entity_id(),
        pos: Vec2::new(x, y),
        vel: Vec2::new(-speed, vy),
        width,
        token,
        collected: false,
    })
}

/// Draw order: polarity, x, y
fn maybe_spawn_bag(
    snap: &mut GameSnapshot,
    now_ms: f64,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
) {
    if now_ms - snap.last_bag_ms < BAG_INTERVAL_MS {
        return;
    }
    let is_positive = rng.chance(BAG_POSITIVE_CHANCE);
    let margin = config.bag_margin;
    let x = rng.range(margin, (config.field_width - 2.0 * margin).max(0.0));
    let y = rng.range(margin, (config.field_height - 2.0 * margin).max(0.0));
    let id = snap.next_entity_id();
    snap.bags.push(Bag {
        id,
        pos: Vec2::new(x, y),
        remaining_life: BAG_LIFETIME_TICKS,
        is_positive,
    });
    snap.last_bag_ms = now_ms;
    log::debug!("Spawned {} bag {}", if is_positive { "reward" } else { "penalty" }, id);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::sim::rng::SequenceSource;

    fn snapshot() -> GameSnapshot {
        let mut snap = GameSnapshot::default();
        snap.catalog = Arc::new(sample_catalog());
        snap
    }

    #[test]
    fn test_top_up_spawns_beyond_right_edge() {
        let config = GameConfig::default();
        let mut snap = snapshot();
        // x, y, speed, drift, width, token
        let mut rng = SequenceSource::new(vec![0.5, 0.0, 0.5, 1.0, 0.5, 0.7]);
        top_up_collectibles(&mut snap, &config, &mut rng);

        assert_eq!(snap.collectibles.len(), 1);
        let p = &snap.collectibles[0];
        assert_eq!(p.pos.x, 1024.0 + 50.0);
        assert_eq!(p.pos.y, 50.0);
        assert_eq!(p.vel.x, -2.0);
        assert!((p.vel.y - 0.15).abs() < 1e-3);
        assert_eq!(p.width, 65.0);
        assert_eq!(p.token.symbol, "RAFT");
        assert!(!p.collected);
    }

    #[test]
    fn test_spawn_ranges() {
        let config = GameConfig::default();
        let mut snap = snapshot();
        let mut rng = crate::sim::rng::PcgSource::new(3);
        for _ in 0..200 {
            snap.collectibles.clear();
            top_up_collectibles(&mut snap, &config, &mut rng);
            let p = &snap.collectibles[0];
            assert!(p.pos.x >= config.field_width);
            assert!((1.5..=2.5).contains(&-p.vel.x));
            assert!((-0.15..=0.15).contains(&p.vel.y));
            assert!((50.0..=80.0).contains(&p.width));
        }
    }

    #[test]
    fn test_top_up_one_per_tick_until_target() {
        let config = GameConfig::default();
        let mut snap = snapshot();
        let mut rng = SequenceSource::constant(0.3);
        for expected in 1..=8 {
            top_up_collectibles(&mut snap, &config, &mut rng);
            assert_eq!(snap.collectibles.len(), expected);
        }
        top_up_collectibles(&mut snap, &config, &mut rng);
        assert_eq!(snap.collectibles.len(), 8);

        // Collected ones do not count toward the target
        snap.collectibles[0].collected = true;
        top_up_collectibles(&mut snap, &config, &mut rng);
        assert_eq!(snap.collectibles.len(), 9);
    }

    #[test]
    fn test_no_spawn_without_catalog() {
        let config = GameConfig::default();
        let mut snap = GameSnapshot::default();
        let mut rng = SequenceSource::constant(0.3);
        top_up_collectibles(&mut snap, &config, &mut rng);
        assert!(snap.collectibles.is_empty());
    }

    #[test]
    fn test_retire_collected_and_offscreen() {
        let config = GameConfig::default();
        let mut snap = snapshot();
        let mut rng = SequenceSource::constant(0.3);
        for _ in 0..3 {
            top_up_collectibles(&mut snap, &config, &mut rng);
        }
        snap.collectibles[0].collected = true;
        snap.collectibles[1].pos.x = -50.5;
        let keep = snap.collectibles[2].id;
        retire(&mut snap);
        assert_eq!(snap.collectibles.len(), 1);
        assert_eq!(snap.collectibles[0].id, keep);
    }

    #[test]
    fn test_bag_interval() {
        let config = GameConfig::default();
        let mut snap = snapshot();
        snap.last_bag_ms = 1000.0;
        // polarity 0.1 (< 0.4 -> positive), x, y
        let mut rng = SequenceSource::new(vec![0.1, 0.0, 0.0]);

        maybe_spawn_bag(&mut snap, 3999.0, &config, &mut rng);
        assert!(snap.bags.is_empty());

        maybe_spawn_bag(&mut snap, 4000.0, &config, &mut rng);
        assert_eq!(snap.bags.len(), 1);
        let bag = &snap.bags[0];
        assert!(bag.is_positive);
        assert_eq!(bag.pos, Vec2::new(60.0, 60.0));
        assert_eq!(bag.remaining_life, 60);
        assert_eq!(snap.last_bag_ms, 4000.0);

        maybe_spawn_bag(&mut snap, 5000.0, &config, &mut rng);
        assert_eq!(snap.bags.len(), 1);
    }

    #[test]
    fn test_bag_polarity_threshold() {
        let config = GameConfig::default();
        let mut snap = snapshot();
        let mut rng = SequenceSource::new(vec![0.4, 0.5, 0.5]);
        maybe_spawn_bag(&mut snap, 3000.0, &config, &mut rng);
        assert!(!snap.bags[0].is_positive);
    }

    #[test]
    fn test_bags_expire_after_lifetime() {
        let config = GameConfig::default();
        let mut snap = snapshot();
        snap.collectibles.clear();
        let mut rng = SequenceSource::constant(0.5);
        snap.bags.push(Bag {
            id: 99,
            pos: Vec2::ZERO,
            remaining_life: 2,
            is_positive: true,
        });
        step(&mut snap, 0.0, &config, &mut rng);
        assert_eq!(snap.bags[0].remaining_life, 1);
        step(&mut snap, 0.0, &config, &mut rng);
        assert_eq!(snap.bags[0].remaining_life, 0);
        step(&mut snap, 0.0, &config, &mut rng);
        assert!(snap.bags.is_empty());
    }

    #[test]
    fn test_seed_one_per_token() {
        let config = GameConfig::default();
        let mut snap = snapshot();
        let mut rng = SequenceSource::constant(0.0);
        seed_collectibles(&mut snap, &config, &mut rng);
        assert_eq!(snap.collectibles.len(), 2);
        assert_eq!(snap.collectibles[0].pos.x, 1024.0);
        assert_eq!(snap.collectibles[1].pos.x, 1024.0 + 120.0);
    }
}
