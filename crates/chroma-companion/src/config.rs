//! Species configuration: stat maxima, unlock thresholds, and ability
//! policies.
//!
//! A [`SpeciesProfile`] is shared, read-only configuration. It is never
//! mutated after construction and is safe to share across companion
//! instances (typically behind an `Arc`) without synchronization. The
//! unlock table and ability policies are data, so new species variants
//! are profiles, not code.

use std::collections::BTreeMap;

use chroma_types::{AbilityId, TimedAbilityState};
use serde::{Deserialize, Serialize};

/// Upper bounds for each stat field, per species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatMaxima {
    /// Maximum health.
    pub health: u32,
    /// Maximum energy.
    pub energy: u32,
    /// Maximum happiness (100 for every species in the current content).
    pub happiness: u32,
}

/// Stat values a freshly adopted companion starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingStats {
    /// Starting health.
    pub health: u32,
    /// Starting energy.
    pub energy: u32,
    /// Starting happiness.
    pub happiness: u32,
}

/// Usage policy for a single ability.
///
/// The policy decides which [`TimedAbilityState`] gate the ability
/// carries and how activation behaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityPolicy {
    /// Recurring bonus that runs on a fixed tick period while the tag is
    /// unlocked. Each firing grants experience when the happiness
    /// precondition holds.
    PeriodicBonus {
        /// Ticks between firings.
        period_ticks: u64,
        /// Minimum happiness for the bonus to be granted.
        happiness_floor: u32,
        /// Base experience per firing.
        xp_base: u32,
        /// Level scaling as a percentage; the grant is
        /// `round(xp_base * level * pct / 100)` in integer arithmetic.
        level_multiplier_pct: u32,
    },
    /// Temporary window that refuses re-activation while open.
    TimedExclusive {
        /// Energy deducted on a successful activation (clamped at 0).
        energy_cost: u32,
        /// Ticks until the scheduled automatic deactivation fires.
        duration_ticks: u64,
    },
    /// Capped number of successful uses per in-game day.
    DailyLimited {
        /// Maximum successful activations between rollovers.
        daily_max: u32,
        /// Fixed finite content set; each success draws one entry
        /// uniformly at random.
        visions: Vec<String>,
    },
    /// Sets energy to exactly zero and grants a level-scaled coin
    /// reward, with a fixed-probability chained activation.
    Exhausting {
        /// Coins awarded per level (`coin_base * level`).
        coin_base: u32,
        /// Ability to attempt to chain-trigger on a successful roll. The
        /// chained activation goes through the normal gate and may be
        /// refused.
        chain: Option<AbilityId>,
        /// Probability of the chain in percent, `[0, 100]`.
        chain_chance_pct: u32,
    },
}

impl AbilityPolicy {
    /// The gate a fresh companion carries for an ability with this
    /// policy.
    pub const fn initial_gate(&self) -> TimedAbilityState {
        match self {
            Self::PeriodicBonus { .. } => TimedAbilityState::Periodic { started: false },
            Self::TimedExclusive { .. } => TimedAbilityState::ActiveFlag { active: false },
            Self::DailyLimited { .. } => TimedAbilityState::DailyCounter { used: 0 },
            Self::Exhausting { .. } => TimedAbilityState::Instant,
        }
    }
}

/// Condition under which the daily rollover applies its bounded stat
/// recovery.
///
/// The source material used a random coin flip labeled "night time"; that
/// is treated as placeholder behavior, so the trigger is configuration
/// rather than a hard-coded rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryPolicy {
    /// Recover on every rollover.
    Always,
    /// Recover with a fixed probability per rollover.
    CoinFlip {
        /// Chance of recovery in percent, `[0, 100]`.
        chance_pct: u32,
    },
    /// Recover only when the rollover closes a night phase.
    Nightly,
}

/// Rollover behavior for a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverConfig {
    /// When the recovery applies.
    pub policy: RecoveryPolicy,
    /// Bounded additive energy recovery (clamped to the maximum).
    pub energy_recovery: u32,
    /// Bounded additive health recovery (clamped to the maximum).
    pub health_recovery: u32,
}

/// Shared, immutable configuration for one species/variant.
///
/// Owns the ability unlock table (level threshold per ability tag,
/// unique per tag; several abilities may share a threshold) and the
/// per-ability policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Species/variant name, e.g. `"owl"`.
    pub species: String,
    /// Stat upper bounds.
    pub maxima: StatMaxima,
    /// Stats at adoption.
    pub starting: StartingStats,
    /// Ability tag to the level at which it unlocks.
    pub unlock_table: BTreeMap<AbilityId, u32>,
    /// Ability tag to its usage policy.
    pub abilities: BTreeMap<AbilityId, AbilityPolicy>,
    /// Daily rollover behavior.
    pub rollover: RolloverConfig,
}

impl SpeciesProfile {
    /// The owl variant: high health cap, modest energy cap, and the four
    /// canonical owl abilities.
    pub fn owl() -> Self {
        let unlock_table = BTreeMap::from([
            (AbilityId::WisdomAura, 2),
            (AbilityId::NightVision, 5),
            (AbilityId::Prophecy, 7),
            (AbilityId::SilentHunt, 10),
        ]);

        let abilities = BTreeMap::from([
            (
                AbilityId::WisdomAura,
                AbilityPolicy::PeriodicBonus {
                    period_ticks: 60,
                    happiness_floor: 70,
                    xp_base: 5,
                    level_multiplier_pct: 150,
                },
            ),
            (
                AbilityId::NightVision,
                AbilityPolicy::TimedExclusive {
                    energy_cost: 15,
                    duration_ticks: 30,
                },
            ),
            (
                AbilityId::Prophecy,
                AbilityPolicy::DailyLimited {
                    daily_max: 3,
                    visions: vec![
                        String::from("A stranger brings a bright thread."),
                        String::from("Rain before dusk; seeds after."),
                        String::from("Something lost returns by moonrise."),
                        String::from("The tall grass hides a small fortune."),
                        String::from("A friend's call carries farther than usual."),
                        String::from("Tomorrow favors the patient."),
                    ],
                },
            ),
            (
                AbilityId::SilentHunt,
                AbilityPolicy::Exhausting {
                    coin_base: 10,
                    chain: Some(AbilityId::NightVision),
                    chain_chance_pct: 25,
                },
            ),
        ]);

        Self {
            species: String::from("owl"),
            maxima: StatMaxima {
                health: 120,
                energy: 90,
                happiness: 100,
            },
            starting: StartingStats {
                health: 100,
                energy: 70,
                happiness: 60,
            },
            unlock_table,
            abilities,
            rollover: RolloverConfig {
                policy: RecoveryPolicy::Always,
                energy_recovery: 25,
                health_recovery: 10,
            },
        }
    }

    /// Build the initial gate map for a fresh companion of this species.
    pub fn initial_gates(&self) -> BTreeMap<AbilityId, TimedAbilityState> {
        self.abilities
            .iter()
            .map(|(ability, policy)| (*ability, policy.initial_gate()))
            .collect()
    }
}
