//! Gated ability activation and the passive periodic bonus.
//!
//! Activation enforces each ability's usage policy. Failure is silent
//! refusal -- a typed [`Activation::Refused`] value, never an error --
//! because callers are expected to poll unlock state before offering the
//! action. Errors surface only for ambient arithmetic overflow.
//!
//! Side effects that touch the scheduler (deactivation timers) are
//! returned declaratively as [`AbilityEffect`] values; the orchestration
//! layer owns the timer queue and turns them into scheduled tasks.

use chroma_types::{AbilityId, CompanionState, StatField, TimedAbilityState};
use rand::Rng;
use tracing::debug;

use crate::config::{AbilityPolicy, SpeciesProfile};
use crate::error::CompanionError;
use crate::stats;
use crate::unlocks::{self, LevelUpReport};

/// Why an activation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// The ability tag is not in the unlocked set.
    NotUnlocked,
    /// The exclusive window is already open; the cost is not re-deducted
    /// and no second deactivation is scheduled.
    AlreadyActive,
    /// The per-day counter has reached its cap; refused until the next
    /// rollover.
    DailyLimitReached,
    /// The ability has no directly activatable policy (passive, or not
    /// configured for this species).
    NotActivatable,
}

/// A declarative side effect of a successful activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityEffect {
    /// User-visible message text.
    Message(String),
    /// Coins to forward to the currency sink.
    CoinsAwarded(u32),
    /// Ask the scheduler for a one-shot deactivation after a fixed
    /// delay. Never cancelled by later state changes; re-activation is
    /// blocked instead.
    ScheduleDeactivation {
        /// The ability whose window closes.
        ability: AbilityId,
        /// Delay in ticks from the moment of activation.
        after_ticks: u64,
    },
}

/// Outcome of an activation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The action happened; effects are to be applied by the caller.
    Performed {
        /// Ordered side effects of the activation.
        effects: Vec<AbilityEffect>,
    },
    /// The action did not happen. State is unchanged.
    Refused {
        /// Why nothing was performed.
        reason: RefusalReason,
    },
}

impl Activation {
    /// Whether the action was performed.
    pub const fn performed(&self) -> bool {
        matches!(self, Self::Performed { .. })
    }
}

/// Result of one firing of the passive periodic bonus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicOutcome {
    /// Experience granted this firing (0 when the happiness precondition
    /// failed or the ability is not a periodic bonus).
    pub xp_granted: u32,
    /// Level-up report when experience was granted.
    pub report: Option<LevelUpReport>,
}

/// Attempt to activate an ability.
///
/// Dispatches on the species policy for `ability`. Chained activations
/// (from the energy-exhausting ultimate) go through the same gates and
/// are limited to a single hop.
pub fn activate<R: Rng>(
    state: &mut CompanionState,
    profile: &SpeciesProfile,
    ability: AbilityId,
    rng: &mut R,
) -> Result<Activation, CompanionError> {
    activate_inner(state, profile, ability, rng, 0)
}

fn activate_inner<R: Rng>(
    state: &mut CompanionState,
    profile: &SpeciesProfile,
    ability: AbilityId,
    rng: &mut R,
    chain_depth: u8,
) -> Result<Activation, CompanionError> {
    if !state.is_unlocked(ability) {
        return Ok(Activation::Refused {
            reason: RefusalReason::NotUnlocked,
        });
    }

    let Some(policy) = profile.abilities.get(&ability) else {
        return Ok(Activation::Refused {
            reason: RefusalReason::NotActivatable,
        });
    };

    match policy {
        AbilityPolicy::PeriodicBonus { .. } => Ok(Activation::Refused {
            reason: RefusalReason::NotActivatable,
        }),

        AbilityPolicy::TimedExclusive {
            energy_cost,
            duration_ticks,
        } => {
            if state.is_active(ability) {
                return Ok(Activation::Refused {
                    reason: RefusalReason::AlreadyActive,
                });
            }
            state
                .gates
                .insert(ability, TimedAbilityState::ActiveFlag { active: true });
            let cost = i32::try_from(*energy_cost).unwrap_or(i32::MAX);
            let energy = stats::modify(state, &profile.maxima, StatField::Energy, -cost);
            debug!(
                pet_id = %state.pet_id,
                ?ability,
                energy,
                duration_ticks,
                "exclusive window opened"
            );
            Ok(Activation::Performed {
                effects: vec![
                    AbilityEffect::Message(String::from(
                        "The dark sharpens; nothing stays hidden for long.",
                    )),
                    AbilityEffect::ScheduleDeactivation {
                        ability,
                        after_ticks: *duration_ticks,
                    },
                ],
            })
        }

        AbilityPolicy::DailyLimited { daily_max, visions } => {
            let used = state.daily_uses(ability);
            if used >= *daily_max {
                return Ok(Activation::Refused {
                    reason: RefusalReason::DailyLimitReached,
                });
            }
            state.gates.insert(
                ability,
                TimedAbilityState::DailyCounter {
                    used: used.saturating_add(1),
                },
            );
            let mut effects = Vec::new();
            if !visions.is_empty() {
                let idx = rng.random_range(0..visions.len());
                if let Some(vision) = visions.get(idx) {
                    effects.push(AbilityEffect::Message(vision.clone()));
                }
            }
            Ok(Activation::Performed { effects })
        }

        AbilityPolicy::Exhausting {
            coin_base,
            chain,
            chain_chance_pct,
        } => {
            stats::exhaust_energy(state);
            let coins = coin_base.checked_mul(state.level).ok_or_else(|| {
                CompanionError::ArithmeticOverflow {
                    context: String::from("ultimate coin reward overflow"),
                }
            })?;
            let mut effects = vec![
                AbilityEffect::Message(String::from(
                    "A soundless dive; the hunt takes everything.",
                )),
                AbilityEffect::CoinsAwarded(coins),
            ];

            if let Some(chained) = chain
                && chain_depth == 0
                && rng.random_range(0..100) < *chain_chance_pct
            {
                match activate_inner(state, profile, *chained, rng, 1)? {
                    Activation::Performed {
                        effects: chained_effects,
                    } => effects.extend(chained_effects),
                    Activation::Refused { reason } => {
                        // The chain rolls through the normal gate; a
                        // refusal is silent here too.
                        debug!(pet_id = %state.pet_id, ?chained, ?reason, "chain refused");
                    }
                }
            }

            Ok(Activation::Performed { effects })
        }
    }
}

/// Close an ability's exclusive window.
///
/// Invoked when the scheduled deactivation fires. The timer always fires
/// after its fixed delay regardless of state changes in between, so a
/// window that is already closed is a no-op. Returns whether the window
/// was open.
pub fn deactivate(state: &mut CompanionState, ability: AbilityId) -> bool {
    let was_active = state.is_active(ability);
    if was_active {
        state
            .gates
            .insert(ability, TimedAbilityState::ActiveFlag { active: false });
        debug!(pet_id = %state.pet_id, ?ability, "exclusive window closed");
    }
    was_active
}

/// Mark a periodic process as started.
///
/// Returns `true` only on the transition from not-started to started for
/// an unlocked periodic ability; all other calls return `false`. This is
/// the explicit re-entrancy guard: a second unlock check cannot start a
/// duplicate process.
pub fn start_periodic(state: &mut CompanionState, ability: AbilityId) -> bool {
    if !state.is_unlocked(ability) {
        return false;
    }
    match state.gates.get(&ability) {
        Some(TimedAbilityState::Periodic { started: false }) => {
            state
                .gates
                .insert(ability, TimedAbilityState::Periodic { started: true });
            debug!(pet_id = %state.pet_id, ?ability, "periodic process started");
            true
        }
        _ => false,
    }
}

/// Run one firing of a periodic bonus ability.
///
/// Grants the level-scaled experience reward when the happiness
/// precondition holds: `round(xp_base * level * pct / 100)` computed as
/// `(xp_base * level * pct + 50) / 100` in integer arithmetic. The grant
/// may itself level the companion up and unlock further abilities.
pub fn periodic_tick(
    state: &mut CompanionState,
    profile: &SpeciesProfile,
    ability: AbilityId,
) -> Result<PeriodicOutcome, CompanionError> {
    let Some(AbilityPolicy::PeriodicBonus {
        happiness_floor,
        xp_base,
        level_multiplier_pct,
        ..
    }) = profile.abilities.get(&ability)
    else {
        return Ok(PeriodicOutcome {
            xp_granted: 0,
            report: None,
        });
    };

    if !state.is_unlocked(ability) || state.happiness < *happiness_floor {
        return Ok(PeriodicOutcome {
            xp_granted: 0,
            report: None,
        });
    }

    let scaled = u64::from(*xp_base)
        .checked_mul(u64::from(state.level))
        .and_then(|v| v.checked_mul(u64::from(*level_multiplier_pct)))
        .and_then(|v| v.checked_add(50))
        .map(|v| v / 100)
        .ok_or_else(|| CompanionError::ArithmeticOverflow {
            context: String::from("periodic bonus scaling overflow"),
        })?;
    let xp = u32::try_from(scaled).map_err(|_err| CompanionError::ArithmeticOverflow {
        context: String::from("periodic bonus exceeds u32 range"),
    })?;

    let report = unlocks::grant_experience(state, profile, xp)?;
    Ok(PeriodicOutcome {
        xp_granted: xp,
        report: Some(report),
    })
}
