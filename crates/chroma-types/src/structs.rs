//! Core entity structs for the Chroma Companions core.
//!
//! Covers the companion identity record, the mutable stat/ability state,
//! and the per-ability timed gates. Everything here is plain data with
//! serde derives so an external save system can persist level, stat
//! values, the unlocked-ability set, and per-day counters verbatim.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::AbilityId;
use crate::ids::PetId;

// ---------------------------------------------------------------------------
// Pet identity
// ---------------------------------------------------------------------------

/// Immutable identity record for a companion.
///
/// Created once at adoption and never mutated. Mutable progress lives in
/// [`CompanionState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Unique identifier.
    pub id: PetId,
    /// Display name (unique within a keeper).
    pub name: String,
    /// Species/variant name, e.g. `"owl"`.
    pub species: String,
    /// Wall-clock timestamp of adoption.
    pub adopted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Timed ability gates
// ---------------------------------------------------------------------------

/// Per-ability runtime gate enforcing the ability's usage policy.
///
/// Each gated ability carries exactly one of these, chosen by its policy
/// at companion creation. The gate is explicit persisted state -- never a
/// name-based "is this already running" lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedAbilityState {
    /// Usage counter reset to zero on every daily rollover.
    DailyCounter {
        /// Successful uses since the last rollover, in `[0, daily_max]`.
        used: u32,
    },
    /// Mutually-exclusive-in-time window with scheduled deactivation.
    ActiveFlag {
        /// Whether the ability window is currently open.
        active: bool,
    },
    /// Guard for a periodic background process.
    Periodic {
        /// Whether the periodic process has been started. Set exactly
        /// once per companion; a second unlock check can never spawn a
        /// duplicate process.
        started: bool,
    },
    /// No persistent gate: the ability is checked only against the
    /// unlocked set.
    Instant,
}

// ---------------------------------------------------------------------------
// Companion state
// ---------------------------------------------------------------------------

/// Mutable state of a companion: level, stats, unlocked abilities, and
/// per-ability gates.
///
/// All stat fields are clamped to the species maxima on every mutation;
/// see the stat helpers in the companion crate. `level` starts at 1 and
/// never decreases, so the unlocked set only grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionState {
    /// The companion this state belongs to.
    pub pet_id: PetId,
    /// Current level (>= 1, never decreases).
    pub level: u32,
    /// Experience accumulated toward the next level.
    pub experience: u32,
    /// Hit points in `[0, species health maximum]`.
    pub health: u32,
    /// Action resource in `[0, species energy maximum]`.
    pub energy: u32,
    /// Mood in `[0, 100]`.
    pub happiness: u32,
    /// Abilities unlocked so far. Grows monotonically; inserts are
    /// idempotent.
    pub unlocked: BTreeSet<AbilityId>,
    /// Runtime gate for each configured ability.
    pub gates: BTreeMap<AbilityId, TimedAbilityState>,
}

impl CompanionState {
    /// Return the per-day usage counter for an ability, or 0 if the
    /// ability has no daily gate.
    pub fn daily_uses(&self, ability: AbilityId) -> u32 {
        match self.gates.get(&ability) {
            Some(TimedAbilityState::DailyCounter { used }) => *used,
            _ => 0,
        }
    }

    /// Whether an ability's exclusive window is currently open.
    pub fn is_active(&self, ability: AbilityId) -> bool {
        matches!(
            self.gates.get(&ability),
            Some(TimedAbilityState::ActiveFlag { active: true })
        )
    }

    /// Whether an ability's periodic process has been started.
    pub fn periodic_started(&self, ability: AbilityId) -> bool {
        matches!(
            self.gates.get(&ability),
            Some(TimedAbilityState::Periodic { started: true })
        )
    }

    /// Whether an ability tag is present in the unlocked set.
    pub fn is_unlocked(&self, ability: AbilityId) -> bool {
        self.unlocked.contains(&ability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CompanionState {
        CompanionState {
            pet_id: PetId::new(),
            level: 1,
            experience: 0,
            health: 100,
            energy: 70,
            happiness: 60,
            unlocked: BTreeSet::new(),
            gates: BTreeMap::new(),
        }
    }

    #[test]
    fn gate_accessors_default_to_inactive() {
        let s = state();
        assert_eq!(s.daily_uses(AbilityId::Prophecy), 0);
        assert!(!s.is_active(AbilityId::NightVision));
        assert!(!s.periodic_started(AbilityId::WisdomAura));
        assert!(!s.is_unlocked(AbilityId::SilentHunt));
    }

    #[test]
    fn gate_accessors_read_stored_gates() {
        let mut s = state();
        s.gates
            .insert(AbilityId::Prophecy, TimedAbilityState::DailyCounter { used: 2 });
        s.gates
            .insert(AbilityId::NightVision, TimedAbilityState::ActiveFlag { active: true });
        s.gates
            .insert(AbilityId::WisdomAura, TimedAbilityState::Periodic { started: true });
        assert_eq!(s.daily_uses(AbilityId::Prophecy), 2);
        assert!(s.is_active(AbilityId::NightVision));
        assert!(s.periodic_started(AbilityId::WisdomAura));
    }

    #[test]
    fn state_roundtrip_serde() {
        let mut s = state();
        s.unlocked.insert(AbilityId::WisdomAura);
        s.gates
            .insert(AbilityId::Prophecy, TimedAbilityState::DailyCounter { used: 3 });
        let json = serde_json::to_string(&s).ok();
        assert!(json.is_some());
        let back: Result<CompanionState, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        // Per-day counters and the unlocked set must restore verbatim.
        assert_eq!(back.ok(), Some(s));
    }
}
