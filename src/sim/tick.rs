//! Fixed timestep simulation tick
//!
//! `tick` is pure: it reads the previous snapshot and returns the next one.
//! Wall-clock time enters only through `TickInput::now_ms`, the frame
//! timestamp, which drives the flood and bag intervals.

use std::sync::Arc;

use super::phase;
use super::rng::RandomSource;
use super::state::{GameEvent, GamePhase, GameSnapshot};
use super::{collision, flood, physics, spawner};
use crate::catalog::TokenCatalog;
use crate::config::GameConfig;
use crate::consts::*;

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Frame timestamp in milliseconds
    pub now_ms: f64,
}

/// Edge-triggered action button events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed,
    Released,
}

/// Apply a button edge between ticks
pub fn apply_input(snap: &mut GameSnapshot, event: InputEvent) {
    match event {
        InputEvent::Pressed => snap.holding = true,
        InputEvent::Released => {
            snap.holding = false;
            if snap.phase == GamePhase::Playing {
                reset_multiplier(snap);
                snap.sizzle_ticks = SIZZLE_RELEASE_TICKS;
            } else {
                snap.release_pending = true;
            }
        }
    }
}

/// Build a fresh Playing snapshot for a new run
pub fn new_run(
    config: &GameConfig,
    catalog: Arc<TokenCatalog>,
    now_ms: f64,
    rng: &mut dyn RandomSource,
) -> GameSnapshot {
    let mut snap = GameSnapshot::new(config.mascot_start);
    snap.phase = GamePhase::Loading;
    snap.catalog = catalog;
    spawner::seed_collectibles(&mut snap, config, rng);
    snap.last_bag_ms = now_ms;
    flood::schedule(&mut snap, now_ms, rng);
    phase::enter(&mut snap, GamePhase::Playing);
    log::info!(
        "Run started with {} tokens, {} collectibles",
        snap.catalog.len(),
        snap.collectibles.len()
    );
    snap
}

/// Advance the game by one fixed timestep
pub fn tick(
    prev: &GameSnapshot,
    input: &TickInput,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
) -> GameSnapshot {
    let mut next = prev.clone();
    // Drop the previous tick's events; ones raised between ticks stay
    let stale = next.tick_events.min(next.events.len());
    next.events.drain(..stale);

    match next.phase {
        GamePhase::Playing => play(&mut next, input.now_ms, config, rng),
        GamePhase::BurnRequired => gate(&mut next, input.now_ms, rng),
        GamePhase::Splash | GamePhase::Loading | GamePhase::GameOver => {}
    }

    next.tick_events = next.events.len();
    next
}

fn play(snap: &mut GameSnapshot, now_ms: f64, config: &GameConfig, rng: &mut dyn RandomSource) {
    snap.time_ticks += 1;
    decay_cosmetics(snap);

    if snap.release_pending {
        snap.release_pending = false;
        reset_multiplier(snap);
    }

    spawner::step(snap, now_ms, config, rng);
    physics::step(snap, config, rng);
    collision::resolve(snap, rng);
    flood::step(snap, now_ms, config, rng);

    enforce_invariants(snap);
    snap.normalize_order();
}

fn gate(snap: &mut GameSnapshot, now_ms: f64, rng: &mut dyn RandomSource) {
    decay_cosmetics(snap);

    if !phase::burn_due(snap, now_ms) {
        return;
    }
    snap.reward = snap.reward.saturating_sub(BURN_COST);
    snap.flood_count = 0;
    snap.burn = None;
    snap.last_bag_ms = now_ms;
    flood::schedule(snap, now_ms, rng);
    phase::enter(snap, GamePhase::Playing);
    snap.events.push(GameEvent::BurnCompleted);
}

fn reset_multiplier(snap: &mut GameSnapshot) {
    snap.multiplier = MULTIPLIER_MIN;
    snap.target = None;
    snap.events.push(GameEvent::MultiplierReset);
}

fn decay_cosmetics(snap: &mut GameSnapshot) {
    snap.sizzle_ticks = snap.sizzle_ticks.saturating_sub(1);
    snap.confetti_ticks = snap.confetti_ticks.saturating_sub(1);
}

/// Clamp values that should never leave their range; counted, never fatal
fn enforce_invariants(snap: &mut GameSnapshot) {
    if !(MULTIPLIER_MIN..=MULTIPLIER_MAX).contains(&snap.multiplier) {
        log::warn!("Multiplier {} out of range, clamping", snap.multiplier);
        snap.multiplier = snap.multiplier.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);
        snap.clamp_count += 1;
    }
    if snap.flood_count > FLOODS_BEFORE_BURN {
        log::warn!("Flood count {} above gate, clamping", snap.flood_count);
        snap.flood_count = FLOODS_BEFORE_BURN;
        snap.clamp_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::sim::rng::{PcgSource, SequenceSource};
    use crate::sim::state::{Bag, BurstEffect, Platform};

    fn start(config: &GameConfig, rng: &mut dyn RandomSource) -> GameSnapshot {
        new_run(config, Arc::new(sample_catalog()), 0.0, rng)
    }

    fn at(frame: u64) -> TickInput {
        TickInput {
            now_ms: frame as f64 * crate::tick_ms(),
        }
    }

    #[test]
    fn test_new_run() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let snap = start(&config, &mut rng);
        assert_eq!(snap.phase, GamePhase::Playing);
        assert_eq!(snap.collectibles.len(), 2);
        assert_eq!(snap.mascot, config.mascot_start);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.flood_interval_ms, 11500.0);
    }

    #[test]
    fn test_other_phases_do_not_tick() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        for phase in [GamePhase::Splash, GamePhase::Loading, GamePhase::GameOver] {
            let mut snap = GameSnapshot::default();
            snap.phase = phase;
            let next = tick(&snap, &at(100), &config, &mut rng);
            assert_eq!(next, snap);
        }
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_drift_invariant() {
        let config = GameConfig::default();
        let mut rng = PcgSource::new(7);
        let mut snap = start(&config, &mut rng);

        for frame in 1..=30 {
            let next = tick(&snap, &at(frame), &config, &mut rng);
            assert!(!next.flood.active);
            assert!((snap.mascot.x - next.mascot.x - 0.8).abs() < 1e-4);
            assert_eq!(snap.mascot.y, next.mascot.y);
            snap = next;
        }
        assert_eq!(snap.time_ticks, 30);
    }

    #[test]
    fn test_drift_stops_at_left_bound() {
        let config = GameConfig::default();
        let mut rng = PcgSource::new(7);
        let mut snap = start(&config, &mut rng);
        for frame in 1..=120 {
            snap = tick(&snap, &at(frame), &config, &mut rng);
        }
        assert_eq!(snap.mascot.x, config.mascot_bounds().0.x);
    }

    #[test]
    fn test_collected_platform_removed_next_tick() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let mut snap = start(&config, &mut rng);
        let id = snap.next_entity_id();
        let token = snap.catalog.pick(0.0).unwrap();
        snap.collectibles.push(Platform {
            id,
            pos: snap.mascot,
            vel: Vec2::ZERO,
            width: 60.0,
            token,
            collected: false,
        });

        let next = tick(&snap, &at(1), &config, &mut rng);
        let picked = next.collectibles.iter().find(|p| p.id == id).unwrap();
        assert!(picked.collected);
        assert_eq!(next.score, 100);
        assert!(matches!(
            next.events.as_slice(),
            [GameEvent::TokenCollected { symbol, .. }] if symbol == "FLUD"
        ));

        let after = tick(&next, &at(2), &config, &mut rng);
        assert!(after.collectibles.iter().all(|p| p.id != id));
        assert!(after.events.is_empty());
    }

    #[test]
    fn test_offscreen_platform_retired() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let mut snap = start(&config, &mut rng);
        snap.collectibles[0].pos.x = -51.0;
        let id = snap.collectibles[0].id;
        let next = tick(&snap, &at(1), &config, &mut rng);
        assert!(next.collectibles.iter().all(|p| p.id != id));
    }

    #[test]
    fn test_removal_idempotent() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let mut snap = GameSnapshot::default();
        snap.phase = GamePhase::Playing;
        snap.last_bag_ms = 0.0;
        snap.flood_interval_ms = 10_000.0;
        for _ in 0..2 {
            let id = snap.next_entity_id();
            snap.bags.push(Bag {
                id,
                pos: Vec2::ZERO,
                remaining_life: 0,
                is_positive: true,
            });
            let id = snap.next_entity_id();
            snap.bursts.push(BurstEffect {
                id,
                pos: Vec2::ZERO,
                remaining_life: 0,
            });
        }

        let once = tick(&snap, &at(1), &config, &mut rng);
        let twice = tick(&once, &at(2), &config, &mut rng);
        assert!(once.bags.is_empty() && once.bursts.is_empty());
        assert_eq!(once.bags, twice.bags);
        assert_eq!(once.bursts, twice.bursts);
        assert_eq!(once.collectibles, twice.collectibles);
    }

    #[test]
    fn test_release_resets_multiplier() {
        let mut snap = GameSnapshot::default();
        snap.phase = GamePhase::Playing;
        apply_input(&mut snap, InputEvent::Pressed);
        snap.multiplier = 6.5;
        snap.target = Some(3);

        apply_input(&mut snap, InputEvent::Released);
        assert!(!snap.holding);
        assert_eq!(snap.multiplier, 1.0);
        assert_eq!(snap.target, None);
        assert_eq!(snap.sizzle_ticks, 30);
        assert_eq!(snap.events, vec![GameEvent::MultiplierReset]);
    }

    #[test]
    fn test_release_event_reaches_next_frame() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let first = start(&config, &mut rng);
        let mut snap = tick(&first, &at(1), &config, &mut rng);
        snap.multiplier = 3.0;

        apply_input(&mut snap, InputEvent::Released);
        let next = tick(&snap, &at(2), &config, &mut rng);
        assert_eq!(next.events.first(), Some(&GameEvent::MultiplierReset));
        assert_eq!(next.multiplier, 1.0);

        // Delivered once
        let after = tick(&next, &at(3), &config, &mut rng);
        assert!(!after.events.contains(&GameEvent::MultiplierReset));
    }

    #[test]
    fn test_release_while_frozen_applies_on_resume() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let mut snap = GameSnapshot::default();
        snap.phase = GamePhase::BurnRequired;
        snap.holding = true;
        snap.multiplier = 4.0;
        snap.reward = 3500;

        apply_input(&mut snap, InputEvent::Released);
        assert_eq!(snap.multiplier, 4.0);
        assert!(snap.release_pending);

        phase::begin_burn(&mut snap, 0.0).unwrap();
        let resumed = tick(&snap, &TickInput { now_ms: 3000.0 }, &config, &mut rng);
        assert_eq!(resumed.phase, GamePhase::Playing);
        let next = tick(&resumed, &TickInput { now_ms: 3016.0 }, &config, &mut rng);
        assert_eq!(next.multiplier, 1.0);
        assert!(!next.release_pending);
        assert!(next.events.contains(&GameEvent::MultiplierReset));
    }

    #[test]
    fn test_burn_resolution() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let mut snap = GameSnapshot::default();
        snap.phase = GamePhase::BurnRequired;
        snap.flood_count = 10;
        snap.reward = 3200;

        phase::begin_burn(&mut snap, 1000.0).unwrap();
        let waiting = tick(&snap, &TickInput { now_ms: 3999.0 }, &config, &mut rng);
        assert_eq!(waiting.phase, GamePhase::BurnRequired);
        assert_eq!(waiting.reward, 3200);
        assert_eq!(waiting.events, vec![GameEvent::BurnStarted]);

        let done = tick(&waiting, &TickInput { now_ms: 4000.0 }, &config, &mut rng);
        assert_eq!(done.phase, GamePhase::Playing);
        assert_eq!(done.reward, 200);
        assert_eq!(done.flood_count, 0);
        assert!(done.burn.is_none());
        assert_eq!(done.last_flood_ms, 4000.0);
        assert_eq!(done.last_bag_ms, 4000.0);
        assert_eq!(done.events, vec![GameEvent::BurnCompleted]);
    }

    #[test]
    fn test_cosmetics_decay() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let mut snap = GameSnapshot::default();
        snap.phase = GamePhase::BurnRequired;
        snap.confetti_ticks = 2;
        snap.sizzle_ticks = 1;
        let snap = tick(&snap, &at(1), &config, &mut rng);
        assert_eq!((snap.confetti_ticks, snap.sizzle_ticks), (1, 0));
        let snap = tick(&snap, &at(2), &config, &mut rng);
        assert_eq!((snap.confetti_ticks, snap.sizzle_ticks), (0, 0));
    }

    #[test]
    fn test_invariant_clamps_counted() {
        let config = GameConfig::default();
        let mut rng = SequenceSource::constant(0.5);
        let mut snap = GameSnapshot::default();
        snap.phase = GamePhase::Playing;
        snap.holding = true;
        snap.multiplier = 40.0;
        snap.flood_count = 12;
        snap.flood_interval_ms = 10_000.0;

        let next = tick(&snap, &at(1), &config, &mut rng);
        assert_eq!(next.multiplier, 33.0);
        assert_eq!(next.flood_count, 10);
        assert_eq!(next.clamp_count, 2);
        assert_eq!(next.phase, GamePhase::Playing);
    }

    #[test]
    fn test_determinism() {
        let config = GameConfig::default();
        let run = |seed: u64| {
            let mut rng = PcgSource::new(seed);
            let mut snap = start(&config, &mut rng);
            for frame in 1..=900 {
                if frame % 90 == 0 {
                    apply_input(&mut snap, InputEvent::Pressed);
                } else if frame % 90 == 60 {
                    apply_input(&mut snap, InputEvent::Released);
                }
                snap = tick(&snap, &at(frame), &config, &mut rng);
            }
            snap
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99).collectibles, run(100).collectibles);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn multiplier_and_mascot_stay_bounded(
                seed in 0u64..1000,
                script in proptest::collection::vec(any::<bool>(), 50..400)
            ) {
                let config = GameConfig::default();
                let (min, max) = config.mascot_bounds();
                let mut rng = PcgSource::new(seed);
                let mut snap = start(&config, &mut rng);

                for (frame, &hold) in script.iter().enumerate() {
                    if hold != snap.holding {
                        let event = if hold { InputEvent::Pressed } else { InputEvent::Released };
                        apply_input(&mut snap, event);
                        if !hold && snap.phase == GamePhase::Playing {
                            prop_assert_eq!(snap.multiplier, 1.0);
                        }
                    }
                    snap = tick(&snap, &at(frame as u64 + 1), &config, &mut rng);

                    prop_assert!((1.0..=33.0).contains(&snap.multiplier));
                    prop_assert!(snap.mascot.cmpge(min).all() && snap.mascot.cmple(max).all());
                    prop_assert!(snap.flood_count <= 10);
                }
                prop_assert_eq!(snap.clamp_count, 0);
            }
        }
    }
}
