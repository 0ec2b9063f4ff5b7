//! Integration tests for the habitat tick cycle.
//!
//! These drive a full companion lifecycle through the public API: adopt,
//! level up, activate abilities, and run whole in-game days through
//! `run_tick`, asserting the timer, periodic-bonus, and rollover
//! behavior end to end.

#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]

use std::sync::Arc;

use chroma_companion::{
    Activation, CompanionKeeper, RecordingSink, RefusalReason, SpeciesProfile,
};
use chroma_core::{DayClock, Habitat, RuntimeConfig};
use chroma_types::{AbilityId, ItemCategory, PetId};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn owl_habitat(ticks_per_day: u64) -> (Habitat, PetId, Arc<SpeciesProfile>) {
    let profile = Arc::new(SpeciesProfile::owl());
    let clock = DayClock::new(ticks_per_day, 30).unwrap();
    let mut habitat = Habitat::new(clock);
    let mut keeper = CompanionKeeper::new();
    let (pet, state) = keeper.adopt(String::from("Hoot"), &profile).unwrap();
    let id = pet.id;
    habitat
        .add_resident(pet, state, Arc::clone(&profile))
        .unwrap();
    (habitat, id, profile)
}

#[test]
fn care_actions_level_a_fresh_companion_to_its_first_unlock() {
    let (mut habitat, pet, _) = owl_habitat(240);
    let mut sink = RecordingSink::default();

    // 100 XP to reach level 2: puzzles award 6 XP each.
    for _ in 0..17 {
        habitat.give_item(pet, ItemCategory::Puzzle, &mut sink).unwrap();
    }
    let resident = habitat.resident(pet).unwrap();
    assert_eq!(resident.state.level, 2);
    assert!(resident.state.is_unlocked(AbilityId::WisdomAura));
    assert_eq!(sink.unlocks, vec![(pet, AbilityId::WisdomAura)]);

    // Happiness clamps at the species maximum along the way.
    assert_eq!(resident.state.happiness, 100);
}

#[test]
fn a_full_day_in_the_habitat() {
    let (mut habitat, pet, _) = owl_habitat(100);
    let mut sink = RecordingSink::default();
    let mut rng = SmallRng::seed_from_u64(11);

    // Level 10 in one grant; all four abilities unlock in a single pass.
    let report = habitat.grant_experience(pet, 4500, &mut sink).unwrap();
    assert_eq!(report.new_level, 10);
    assert_eq!(sink.unlocks.len(), 4);

    // Two play sessions: happiness 60 -> 90, energy 70 -> 50.
    habitat.play(pet, &mut sink).unwrap();
    habitat.play(pet, &mut sink).unwrap();

    // Prophecy: three successes, then the daily cap refuses.
    for _ in 0..3 {
        let outcome = habitat
            .activate(pet, AbilityId::Prophecy, &mut sink, &mut rng)
            .unwrap();
        assert!(outcome.performed());
    }
    let fourth = habitat
        .activate(pet, AbilityId::Prophecy, &mut sink, &mut rng)
        .unwrap();
    assert_eq!(
        fourth,
        Activation::Refused {
            reason: RefusalReason::DailyLimitReached
        }
    );
    assert_eq!(sink.messages.len(), 3);

    // Night vision opens its window and costs 15 energy.
    let vision = habitat
        .activate(pet, AbilityId::NightVision, &mut sink, &mut rng)
        .unwrap();
    assert!(vision.performed());
    {
        let resident = habitat.resident(pet).unwrap();
        assert!(resident.state.is_active(AbilityId::NightVision));
        assert_eq!(resident.state.energy, 35);
    }

    // The ultimate empties energy and pays level-scaled coins. Any chain
    // roll hits the already-open window and is silently refused.
    let hunt = habitat
        .activate(pet, AbilityId::SilentHunt, &mut sink, &mut rng)
        .unwrap();
    assert!(hunt.performed());
    assert_eq!(sink.coins, vec![(pet, 100)]);
    assert_eq!(habitat.resident(pet).unwrap().state.energy, 0);

    // Run out the day. Along the way the 30-tick window closes and the
    // periodic bonus (started on the first tick, period 60) fires once
    // with happiness 90 above the floor: round(5 * 10 * 1.5) = 75 XP.
    let mut windows_closed = 0_u32;
    let mut periodic_xp = 0_u32;
    let mut rollovers = 0_u32;
    for _ in 0..100 {
        let summary = habitat.run_tick(&mut sink, &mut rng).unwrap();
        windows_closed += summary.windows_closed;
        periodic_xp += summary.xp_granted;
        rollovers += summary.rollovers;
    }
    assert_eq!(windows_closed, 1);
    assert_eq!(periodic_xp, 75);
    assert_eq!(rollovers, 1);

    // After the rollover: window closed, daily counter reset, bounded
    // recovery applied (energy 0 + 25, health 100 + 10).
    let resident = habitat.resident(pet).unwrap();
    assert!(!resident.state.is_active(AbilityId::NightVision));
    assert_eq!(resident.state.daily_uses(AbilityId::Prophecy), 0);
    assert_eq!(resident.state.energy, 25);
    assert_eq!(resident.state.health, 110);

    // The new day admits prophecy again.
    let renewed = habitat
        .activate(pet, AbilityId::Prophecy, &mut sink, &mut rng)
        .unwrap();
    assert!(renewed.performed());
}

#[test]
fn locked_abilities_refuse_without_side_effects() {
    let (mut habitat, pet, _) = owl_habitat(240);
    let mut sink = RecordingSink::default();
    let mut rng = SmallRng::seed_from_u64(5);

    let outcome = habitat
        .activate(pet, AbilityId::NightVision, &mut sink, &mut rng)
        .unwrap();
    assert_eq!(
        outcome,
        Activation::Refused {
            reason: RefusalReason::NotUnlocked
        }
    );
    let resident = habitat.resident(pet).unwrap();
    assert_eq!(resident.state.energy, 70);
    assert_eq!(habitat.pending_timers(), 0);
}

#[test]
fn periodic_bonus_keeps_firing_across_days() {
    let (mut habitat, pet, _) = owl_habitat(100);
    let mut sink = RecordingSink::default();
    let mut rng = SmallRng::seed_from_u64(2);

    habitat.grant_experience(pet, 100, &mut sink).unwrap(); // level 2
    habitat.play(pet, &mut sink).unwrap();
    habitat.play(pet, &mut sink).unwrap(); // happiness 90

    // Started at tick 1; firings land at ticks 61, 121, 181 over two
    // days.
    let mut firings = 0_u32;
    for _ in 0..200 {
        let summary = habitat.run_tick(&mut sink, &mut rng).unwrap();
        firings += summary.periodic_firings;
    }
    assert_eq!(firings, 3);
    // Still rescheduled for the next firing.
    assert_eq!(habitat.pending_timers(), 1);
}

#[test]
fn default_config_builds_a_valid_clock() {
    let config = RuntimeConfig::default();
    let clock = DayClock::new(
        config.habitat.ticks_per_day,
        config.habitat.night_fraction_pct,
    );
    assert!(clock.is_ok());
    assert_eq!(clock.unwrap().ticks_per_day(), 240);
}
