//! Contact resolution between the mascot and entities
//!
//! Runs once per tick after movement. Bags resolve first (at the multiplier
//! the tick started with), then collectible pickups in id order.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{GameEvent, GameSnapshot};
use crate::consts::*;

/// Summary of what one resolution pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactSummary {
    pub pickups: u32,
    pub bags_caught: u32,
    pub bag_penalties: u32,
    pub bags_missed: u32,
}

/// Whether `point` is within contact range of the mascot
#[inline]
pub fn in_contact(mascot: Vec2, point: Vec2) -> bool {
    mascot.distance(point) < CONTACT_RADIUS
}

/// `base × multiplier`, rounded down
#[inline]
pub fn scaled(base: u64, multiplier: f32) -> u64 {
    (base as f64 * multiplier as f64).floor() as u64
}

/// Resolve every contact for this tick
pub fn resolve(snap: &mut GameSnapshot, rng: &mut dyn RandomSource) -> ContactSummary {
    let mut summary = ContactSummary::default();
    resolve_bags(snap, &mut summary);
    resolve_pickups(snap, rng, &mut summary);
    summary
}

fn resolve_bags(snap: &mut GameSnapshot, summary: &mut ContactSummary) {
    let mascot = snap.mascot;
    let mut bursts = Vec::new();

    for bag in &mut snap.bags {
        if bag.remaining_life == 0 || !in_contact(mascot, bag.pos) {
            continue;
        }
        match (snap.holding, bag.is_positive) {
            (true, true) => {
                let gain = scaled(BAG_BONUS_SCORE, snap.multiplier);
                snap.score += gain;
                snap.sizzle_ticks = snap.sizzle_ticks.max(SIZZLE_PICKUP_TICKS);
                snap.events.push(GameEvent::BagCaught { id: bag.id, score: gain });
                summary.bags_caught += 1;
            }
            (false, false) => {
                let lost = snap.reward.min(BAG_PENALTY_REWARD);
                snap.reward -= lost;
                snap.events.push(GameEvent::BagPenalty {
                    id: bag.id,
                    reward_lost: lost,
                });
                summary.bag_penalties += 1;
            }
            _ => {
                snap.events.push(GameEvent::BagMissed { id: bag.id });
                summary.bags_missed += 1;
            }
        }
        bag.remaining_life = 0;
        bursts.push(bag.pos);
    }

    for pos in bursts {
        snap.push_burst(pos, BAG_BURST_TICKS);
    }
}

fn resolve_pickups(
    snap: &mut GameSnapshot,
    rng: &mut dyn RandomSource,
    summary: &mut ContactSummary,
) {
    let mascot = snap.mascot;
    let mut bursts = Vec::new();

    for platform in &mut snap.collectibles {
        if platform.collected || !in_contact(mascot, platform.pos) {
            continue;
        }
        platform.collected = true;

        let score = scaled(PICKUP_SCORE, snap.multiplier);
        let base_reward = rng.range(PICKUP_REWARD_MIN, PICKUP_REWARD_SPAN).floor() as u64;
        let reward = scaled(base_reward, snap.multiplier);
        snap.score += score;
        snap.reward += reward;
        snap.multiplier = (snap.multiplier + MULTIPLIER_STEP).min(MULTIPLIER_MAX);
        snap.target = None;
        snap.sizzle_ticks = snap.sizzle_ticks.max(SIZZLE_PICKUP_TICKS);

        snap.events.push(GameEvent::TokenCollected {
            id: platform.id,
            symbol: platform.token.symbol.clone(),
            score,
            reward,
        });
        bursts.push(platform.pos);
        summary.pickups += 1;
    }

    for pos in bursts {
        snap.push_burst(pos, PICKUP_BURST_TICKS);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::sim::rng::SequenceSource;
    use crate::sim::state::{Bag, Platform};

    fn snapshot() -> GameSnapshot {
        let mut snap = GameSnapshot::new(Vec2::new(300.0, 200.0));
        snap.catalog = Arc::new(sample_catalog());
        snap.phase = crate::sim::GamePhase::Playing;
        snap
    }

    fn add_platform(snap: &mut GameSnapshot, pos: Vec2) {
        let id = snap.next_entity_id();
        let token = snap.catalog.pick(0.0).unwrap();
        snap.collectibles.push(Platform {
            id,
            pos,
            vel: Vec2::new(-2.0, 0.0),
            width: 60.0,
            token,
            collected: false,
        });
    }

    fn add_bag(snap: &mut GameSnapshot, pos: Vec2, is_positive: bool) {
        let id = snap.next_entity_id();
        snap.bags.push(Bag {
            id,
            pos,
            remaining_life: 30,
            is_positive,
        });
    }

    #[test]
    fn test_pickup_scoring() {
        let mut snap = snapshot();
        snap.holding = true;
        snap.multiplier = 2.0;
        snap.target = Some(1);
        add_platform(&mut snap, Vec2::new(340.0, 200.0)); // distance 40
        // base reward 10 + 0.5 * 50 = 35
        let mut rng = SequenceSource::constant(0.5);

        let summary = resolve(&mut snap, &mut rng);

        assert_eq!(summary.pickups, 1);
        assert_eq!(snap.score, 200);
        assert_eq!(snap.reward, 70);
        assert_eq!(snap.multiplier, 2.5);
        assert!(snap.collectibles[0].collected);
        assert_eq!(snap.target, None);
        assert_eq!(snap.bursts.len(), 1);
        assert_eq!(snap.bursts[0].remaining_life, 30);
        assert_eq!(snap.bursts[0].pos, Vec2::new(340.0, 200.0));
    }

    #[test]
    fn test_reward_rounds_down_at_half_multiplier() {
        let mut snap = snapshot();
        snap.multiplier = 1.5;
        add_platform(&mut snap, Vec2::new(300.0, 230.0));
        // base reward floor(10 + 0.03 * 50) = 11, 11 * 1.5 = 16.5 -> 16
        let mut rng = SequenceSource::constant(0.03);
        resolve(&mut snap, &mut rng);
        assert_eq!(snap.reward, 16);
        assert_eq!(snap.score, 150);
    }

    #[test]
    fn test_out_of_range_untouched() {
        let mut snap = snapshot();
        add_platform(&mut snap, Vec2::new(360.0, 200.0)); // exactly 60
        add_bag(&mut snap, Vec2::new(300.0, 261.0), true);
        let mut rng = SequenceSource::constant(0.5);
        let summary = resolve(&mut snap, &mut rng);
        assert_eq!(summary, ContactSummary::default());
        assert!(!snap.collectibles[0].collected);
        assert_eq!(snap.bags[0].remaining_life, 30);
        assert!(snap.bursts.is_empty());
    }

    #[test]
    fn test_multiple_pickups_stack_multiplier() {
        let mut snap = snapshot();
        snap.holding = true;
        for dx in [0.0, 10.0, 20.0] {
            add_platform(&mut snap, Vec2::new(300.0 + dx, 200.0));
        }
        let mut rng = SequenceSource::constant(0.0);
        resolve(&mut snap, &mut rng);
        // 100 * 1 + 100 * 1.5 + 100 * 2
        assert_eq!(snap.score, 450);
        assert_eq!(snap.multiplier, 2.5);
        assert_eq!(snap.bursts.len(), 3);
    }

    #[test]
    fn test_multiplier_capped() {
        let mut snap = snapshot();
        snap.multiplier = 32.75;
        add_platform(&mut snap, Vec2::new(300.0, 200.0));
        add_platform(&mut snap, Vec2::new(301.0, 200.0));
        let mut rng = SequenceSource::constant(0.0);
        resolve(&mut snap, &mut rng);
        assert_eq!(snap.multiplier, 33.0);
    }

    #[test]
    fn test_positive_bag_while_holding() {
        let mut snap = snapshot();
        snap.holding = true;
        snap.multiplier = 3.0;
        add_bag(&mut snap, Vec2::new(310.0, 210.0), true);
        let mut rng = SequenceSource::constant(0.5);
        let summary = resolve(&mut snap, &mut rng);
        assert_eq!(summary.bags_caught, 1);
        assert_eq!(snap.score, 600);
        assert_eq!(snap.bags[0].remaining_life, 0);
        assert_eq!(snap.bursts[0].remaining_life, 20);
        assert!(snap.sizzle_ticks > 0);
    }

    #[test]
    fn test_penalty_bag_while_released() {
        let mut snap = snapshot();
        snap.reward = 1000;
        add_bag(&mut snap, Vec2::new(300.0, 200.0), false);
        let mut rng = SequenceSource::constant(0.5);
        resolve(&mut snap, &mut rng);
        assert_eq!(snap.reward, 667);
        assert_eq!(snap.events, vec![GameEvent::BagPenalty { id: 1, reward_lost: 333 }]);

        // Never below zero
        let mut snap = snapshot();
        snap.reward = 100;
        add_bag(&mut snap, Vec2::new(300.0, 200.0), false);
        resolve(&mut snap, &mut rng);
        assert_eq!(snap.reward, 0);
    }

    #[test]
    fn test_bag_mismatch_is_a_miss() {
        let mut snap = snapshot();
        snap.holding = true;
        snap.score = 50;
        snap.reward = 50;
        add_bag(&mut snap, Vec2::new(330.0, 200.0), false);
        let mut rng = SequenceSource::constant(0.5);

        let summary = resolve(&mut snap, &mut rng);

        assert_eq!(summary.bags_missed, 1);
        assert_eq!(snap.score, 50);
        assert_eq!(snap.reward, 50);
        assert_eq!(snap.bags[0].remaining_life, 0);
        assert_eq!(snap.bursts.len(), 1);
        assert_eq!(snap.bursts[0].remaining_life, 20);
    }

    #[test]
    fn test_spent_bag_ignored() {
        let mut snap = snapshot();
        snap.holding = true;
        add_bag(&mut snap, Vec2::new(300.0, 200.0), true);
        snap.bags[0].remaining_life = 0;
        let mut rng = SequenceSource::constant(0.5);
        resolve(&mut snap, &mut rng);
        assert_eq!(snap.score, 0);
        assert!(snap.bursts.is_empty());
    }
}
