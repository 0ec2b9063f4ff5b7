//! Leveling and the ability unlock check.
//!
//! # Level-Up Formula
//!
//! XP required to advance from level N to N+1 is `N * 100`, capped at
//! [`MAX_LEVEL`]. A single grant can cross several levels, so the unlock
//! check must run after every level-increasing event and unlock ALL
//! eligible tags in one pass -- not just the highest or lowest.
//!
//! # Monotonicity
//!
//! Level never decreases and tags are never removed from the unlocked
//! set, so unlocking is monotonic: once present, a tag stays for the
//! companion's lifetime. Inserting an already-present tag is a no-op and
//! emits no signal, which makes the "ability unlocked" signal one-shot
//! per tag per companion.

use std::collections::{BTreeMap, BTreeSet};

use chroma_types::{AbilityId, CompanionState};
use tracing::debug;

use crate::config::SpeciesProfile;
use crate::error::CompanionError;

/// Maximum level a companion can reach.
pub const MAX_LEVEL: u32 = 30;

/// Result of an experience grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpReport {
    /// Levels gained by this grant (0 if none).
    pub levels_gained: u32,
    /// The level after the grant.
    pub new_level: u32,
    /// Tags newly added to the unlocked set, each emitted exactly once.
    pub newly_unlocked: Vec<AbilityId>,
}

/// Return the XP threshold required to advance from `level` to the next.
///
/// Returns `None` at [`MAX_LEVEL`] or on arithmetic overflow.
pub fn xp_for_next_level(level: u32) -> Option<u32> {
    if level >= MAX_LEVEL {
        return None;
    }
    level.checked_mul(100)
}

/// Add experience to a companion, applying any level-ups and running the
/// unlock check once.
///
/// A large grant can cross several thresholds; the loop levels up until
/// the remaining XP is below the next threshold or the cap is reached.
/// At the cap, residual XP is discarded.
pub fn grant_experience(
    state: &mut CompanionState,
    profile: &SpeciesProfile,
    amount: u32,
) -> Result<LevelUpReport, CompanionError> {
    if amount == 0 {
        return Ok(LevelUpReport {
            levels_gained: 0,
            new_level: state.level,
            newly_unlocked: Vec::new(),
        });
    }

    state.experience = state.experience.checked_add(amount).ok_or_else(|| {
        CompanionError::ArithmeticOverflow {
            context: String::from("experience grant overflow"),
        }
    })?;

    let mut levels_gained: u32 = 0;
    while let Some(threshold) = xp_for_next_level(state.level) {
        if state.experience < threshold {
            break;
        }
        state.experience = state.experience.saturating_sub(threshold);
        state.level = state.level.checked_add(1).ok_or_else(|| {
            CompanionError::ArithmeticOverflow {
                context: String::from("level increment overflow"),
            }
        })?;
        levels_gained = levels_gained.saturating_add(1);
    }
    if state.level >= MAX_LEVEL {
        state.experience = 0;
    }

    let newly_unlocked = if levels_gained > 0 {
        check_unlocks(state.level, &profile.unlock_table, &mut state.unlocked)
    } else {
        Vec::new()
    };

    if levels_gained > 0 {
        debug!(
            pet_id = %state.pet_id,
            new_level = state.level,
            levels_gained,
            unlocked = newly_unlocked.len(),
            "companion leveled up"
        );
    }

    Ok(LevelUpReport {
        levels_gained,
        new_level: state.level,
        newly_unlocked,
    })
}

/// One-pass unlock check against the species unlock table.
///
/// Every ability whose threshold is satisfied and which is not already
/// in `unlocked` is inserted and returned. Iteration order over ties is
/// immaterial: all qualifying tags unlock in the same pass and emission
/// order does not affect final state.
pub fn check_unlocks(
    level: u32,
    table: &BTreeMap<AbilityId, u32>,
    unlocked: &mut BTreeSet<AbilityId>,
) -> Vec<AbilityId> {
    let mut newly = Vec::new();
    for (ability, threshold) in table {
        if level >= *threshold && unlocked.insert(*ability) {
            newly.push(*ability);
        }
    }
    newly
}

#[cfg(test)]
mod tests {
    use chroma_types::PetId;

    use super::*;

    fn owl_state() -> (CompanionState, SpeciesProfile) {
        let profile = SpeciesProfile::owl();
        let state = CompanionState {
            pet_id: PetId::new(),
            level: 1,
            experience: 0,
            health: 100,
            energy: 70,
            happiness: 60,
            unlocked: BTreeSet::new(),
            gates: profile.initial_gates(),
        };
        (state, profile)
    }

    #[test]
    fn xp_curve_matches_formula() {
        assert_eq!(xp_for_next_level(1), Some(100));
        assert_eq!(xp_for_next_level(2), Some(200));
        assert_eq!(xp_for_next_level(MAX_LEVEL), None);
    }

    #[test]
    fn zero_grant_is_a_no_op() {
        let (mut state, profile) = owl_state();
        let report = grant_experience(&mut state, &profile, 0);
        assert!(matches!(report, Ok(r) if r.levels_gained == 0));
        assert_eq!(state.level, 1);
        assert_eq!(state.experience, 0);
    }

    #[test]
    fn single_level_up() {
        let (mut state, profile) = owl_state();
        let report = grant_experience(&mut state, &profile, 100);
        let report = report.ok();
        assert_eq!(state.level, 2);
        assert_eq!(state.experience, 0);
        // Level 2 unlocks the aura.
        assert_eq!(
            report.map(|r| r.newly_unlocked),
            Some(vec![AbilityId::WisdomAura])
        );
    }

    #[test]
    fn one_grant_crosses_multiple_thresholds() {
        let (mut state, profile) = owl_state();
        // Enough XP to go 1 -> 10 in a single grant:
        // sum of N*100 for N in 1..=9 is 4500.
        let report = grant_experience(&mut state, &profile, 4500).ok();
        assert_eq!(state.level, 10);
        // All four owl abilities unlock in one pass, each emitted once.
        let unlocked = report.map(|r| r.newly_unlocked).unwrap_or_default();
        assert_eq!(unlocked.len(), 4);
        assert!(state.is_unlocked(AbilityId::WisdomAura));
        assert!(state.is_unlocked(AbilityId::NightVision));
        assert!(state.is_unlocked(AbilityId::Prophecy));
        assert!(state.is_unlocked(AbilityId::SilentHunt));
    }

    #[test]
    fn rerunning_check_never_removes_or_reemits() {
        let (mut state, profile) = owl_state();
        let _ = grant_experience(&mut state, &profile, 4500);
        let before = state.unlocked.clone();
        let again = check_unlocks(state.level, &profile.unlock_table, &mut state.unlocked);
        assert!(again.is_empty());
        assert_eq!(state.unlocked, before);
    }

    #[test]
    fn unlock_table_example_from_three_thresholds() {
        // Level 9 against {2:A, 5:B, 9:C} from the empty set yields all
        // three tags in a single check.
        let table = BTreeMap::from([
            (AbilityId::WisdomAura, 2),
            (AbilityId::NightVision, 5),
            (AbilityId::Prophecy, 9),
        ]);
        let mut unlocked = BTreeSet::new();
        let newly = check_unlocks(9, &table, &mut unlocked);
        assert_eq!(newly.len(), 3);
        assert_eq!(unlocked.len(), 3);
    }

    #[test]
    fn residual_xp_carries_between_levels() {
        let (mut state, profile) = owl_state();
        let _ = grant_experience(&mut state, &profile, 150);
        assert_eq!(state.level, 2);
        assert_eq!(state.experience, 50);
    }

    #[test]
    fn xp_discarded_at_level_cap() {
        let (mut state, profile) = owl_state();
        state.level = MAX_LEVEL;
        let report = grant_experience(&mut state, &profile, 10_000).ok();
        assert_eq!(state.level, MAX_LEVEL);
        assert_eq!(state.experience, 0);
        assert_eq!(report.map(|r| r.levels_gained), Some(0));
    }
}
