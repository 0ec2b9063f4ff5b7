//! Daily rollover: per-day counter reset and bounded stat recovery.
//!
//! A single rollover event always resets every per-day counter fully to
//! zero -- never a partial decrement. Recovery is bounded additive and
//! clamped to the species maxima; whether it applies at all is decided
//! by the configured [`RecoveryPolicy`].
//!
//! The function itself does not guard against double invocation within
//! one day: calling it twice resets and recovers twice. The tick cycle
//! is the single invoker and calls it exactly once per day boundary.

use chroma_types::{CompanionState, StatField, TimeOfDay, TimedAbilityState};
use rand::Rng;
use tracing::debug;

use crate::config::{RecoveryPolicy, SpeciesProfile};
use crate::stats;

/// What a rollover did to one companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolloverSummary {
    /// Number of per-day counters reset to zero.
    pub counters_reset: u32,
    /// Whether the recovery policy admitted recovery this rollover.
    pub recovered: bool,
    /// Energy after the rollover.
    pub energy_after: u32,
    /// Health after the rollover.
    pub health_after: u32,
}

/// Apply one daily rollover to a companion.
///
/// `closing` is the phase of day the rollover closes (a boundary
/// rollover closes the night).
pub fn apply_rollover<R: Rng>(
    state: &mut CompanionState,
    profile: &SpeciesProfile,
    closing: TimeOfDay,
    rng: &mut R,
) -> RolloverSummary {
    let mut counters_reset: u32 = 0;
    for gate in state.gates.values_mut() {
        if let TimedAbilityState::DailyCounter { used } = gate {
            *used = 0;
            counters_reset = counters_reset.saturating_add(1);
        }
    }

    let recovered = match profile.rollover.policy {
        RecoveryPolicy::Always => true,
        RecoveryPolicy::CoinFlip { chance_pct } => rng.random_range(0..100) < chance_pct,
        RecoveryPolicy::Nightly => closing == TimeOfDay::Night,
    };

    if recovered {
        let energy = i32::try_from(profile.rollover.energy_recovery).unwrap_or(i32::MAX);
        let health = i32::try_from(profile.rollover.health_recovery).unwrap_or(i32::MAX);
        let _ = stats::modify(state, &profile.maxima, StatField::Energy, energy);
        let _ = stats::modify(state, &profile.maxima, StatField::Health, health);
    }

    debug!(
        pet_id = %state.pet_id,
        counters_reset,
        recovered,
        energy = state.energy,
        health = state.health,
        "daily rollover applied"
    );

    RolloverSummary {
        counters_reset,
        recovered,
        energy_after: state.energy,
        health_after: state.health,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chroma_types::{AbilityId, PetId};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::config::RolloverConfig;

    fn owl_with_uses(used: u32) -> (CompanionState, SpeciesProfile) {
        let profile = SpeciesProfile::owl();
        let mut state = CompanionState {
            pet_id: PetId::new(),
            level: 7,
            experience: 0,
            health: 60,
            energy: 20,
            happiness: 60,
            unlocked: BTreeSet::from([AbilityId::Prophecy]),
            gates: profile.initial_gates(),
        };
        state
            .gates
            .insert(AbilityId::Prophecy, TimedAbilityState::DailyCounter { used });
        (state, profile)
    }

    #[test]
    fn rollover_fully_resets_daily_counters() {
        let (mut state, profile) = owl_with_uses(3);
        let mut rng = SmallRng::seed_from_u64(1);
        let summary = apply_rollover(&mut state, &profile, TimeOfDay::Night, &mut rng);
        assert_eq!(summary.counters_reset, 1);
        assert_eq!(state.daily_uses(AbilityId::Prophecy), 0);
    }

    #[test]
    fn always_policy_recovers_bounded_and_clamped() {
        let (mut state, profile) = owl_with_uses(0);
        let mut rng = SmallRng::seed_from_u64(1);
        let summary = apply_rollover(&mut state, &profile, TimeOfDay::Night, &mut rng);
        assert!(summary.recovered);
        assert_eq!(state.energy, 45); // 20 + 25
        assert_eq!(state.health, 70); // 60 + 10
    }

    #[test]
    fn recovery_clamps_to_maxima() {
        let (mut state, profile) = owl_with_uses(0);
        state.energy = 85;
        state.health = 115;
        let mut rng = SmallRng::seed_from_u64(1);
        let _ = apply_rollover(&mut state, &profile, TimeOfDay::Night, &mut rng);
        assert_eq!(state.energy, 90);
        assert_eq!(state.health, 120);
    }

    #[test]
    fn nightly_policy_skips_daytime_rollovers() {
        let (mut state, mut profile) = owl_with_uses(2);
        profile.rollover = RolloverConfig {
            policy: RecoveryPolicy::Nightly,
            energy_recovery: 25,
            health_recovery: 10,
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let summary = apply_rollover(&mut state, &profile, TimeOfDay::Day, &mut rng);
        assert!(!summary.recovered);
        assert_eq!(state.energy, 20);
        // Counters reset regardless of recovery.
        assert_eq!(state.daily_uses(AbilityId::Prophecy), 0);
    }

    #[test]
    fn coin_flip_policy_is_probabilistic() {
        let (_, mut profile) = owl_with_uses(0);
        profile.rollover = RolloverConfig {
            policy: RecoveryPolicy::CoinFlip { chance_pct: 50 },
            energy_recovery: 25,
            health_recovery: 10,
        };
        let mut rng = SmallRng::seed_from_u64(9);
        let mut hits: u32 = 0;
        for _ in 0..200 {
            let (mut state, _) = owl_with_uses(0);
            let summary = apply_rollover(&mut state, &profile, TimeOfDay::Night, &mut rng);
            if summary.recovered {
                hits = hits.saturating_add(1);
            }
        }
        // Both branches occur over 200 seeded flips.
        assert!(hits > 0);
        assert!(hits < 200);
    }

    #[test]
    fn double_invocation_resets_and_recovers_twice() {
        let (mut state, profile) = owl_with_uses(1);
        let mut rng = SmallRng::seed_from_u64(1);
        let first = apply_rollover(&mut state, &profile, TimeOfDay::Night, &mut rng);
        let second = apply_rollover(&mut state, &profile, TimeOfDay::Night, &mut rng);
        assert_eq!(first.energy_after, 45);
        assert_eq!(second.energy_after, 70);
        assert_eq!(state.daily_uses(AbilityId::Prophecy), 0);
    }
}
