//! Tick cycle: the habitat loop that drives companions.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance the day clock and detect day boundaries.
//! 2. **Timers** -- fire due scheduled tasks: close expired exclusive
//!    windows and run due periodic bonus firings (rescheduling them).
//! 3. **Periodic starts** -- start the periodic process for any
//!    companion whose periodic tag is unlocked and not yet started. The
//!    explicit started flag guards re-entry; a repeated unlock check can
//!    never spawn a duplicate process.
//! 4. **Rollover** -- on a day boundary, apply the daily rollover to
//!    every companion exactly once.
//!
//! Direct operations (`give_item`, `play`, `activate`) run between ticks
//! through [`Habitat`] methods so their scheduling effects land in the
//! shared timer queue. All mutation is single-writer and single-threaded;
//! no locking is required. The species profiles are read-only shared
//! configuration ([`Arc`]), safe for concurrent read by many habitats.

use std::collections::BTreeMap;
use std::sync::Arc;

use chroma_companion::abilities::{self, Activation, AbilityEffect};
use chroma_companion::care::{self, CareOutcome};
use chroma_companion::config::{AbilityPolicy, SpeciesProfile};
use chroma_companion::error::CompanionError;
use chroma_companion::rollover;
use chroma_companion::sinks::CompanionSink;
use chroma_types::{AbilityId, CompanionState, ItemCategory, Pet, PetId, TimeOfDay};
use rand::Rng;
use tracing::{debug, info};

use crate::clock::{ClockError, DayClock};
use crate::timer::{TimerError, TimerQueue};

/// Errors that can occur during habitat operations.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A timer operation failed.
    #[error("timer error: {source}")]
    Timer {
        /// The underlying timer error.
        #[from]
        source: TimerError,
    },

    /// A companion computation failed.
    #[error("companion error for {pet_id}: {source}")]
    Companion {
        /// The companion that caused the error.
        pet_id: PetId,
        /// The underlying companion error.
        source: CompanionError,
    },

    /// The companion is not a resident of this habitat.
    #[error("no such resident: {0}")]
    NoSuchResident(PetId),

    /// A companion with this ID is already a resident.
    #[error("resident already present: {0}")]
    ResidentExists(PetId),
}

/// A deferred task in the habitat's timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HabitatTask {
    /// Close an ability's exclusive window.
    Deactivate {
        /// The companion whose window closes.
        pet: PetId,
        /// The ability whose window closes.
        ability: AbilityId,
    },
    /// Run one firing of a periodic bonus, then reschedule.
    PeriodicBonus {
        /// The companion the bonus belongs to.
        pet: PetId,
        /// The periodic ability.
        ability: AbilityId,
    },
}

/// One companion living in the habitat.
#[derive(Debug, Clone)]
pub struct Resident {
    /// Immutable identity.
    pub pet: Pet,
    /// Mutable stat/ability state.
    pub state: CompanionState,
    /// Shared species configuration.
    pub profile: Arc<SpeciesProfile>,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Whether a day boundary was crossed.
    pub day_rolled: bool,
    /// Exclusive windows closed by expiring timers.
    pub windows_closed: u32,
    /// Periodic bonus firings executed.
    pub periodic_firings: u32,
    /// Total experience granted by periodic bonuses.
    pub xp_granted: u32,
    /// Ability tags newly unlocked during the tick.
    pub abilities_unlocked: u32,
    /// Companions that received the daily rollover.
    pub rollovers: u32,
}

/// The mutable habitat state: the clock, the timer queue, and the
/// roster of companions.
#[derive(Debug)]
pub struct Habitat {
    /// The day clock.
    clock: DayClock,
    /// Scheduled deferred tasks.
    timers: TimerQueue<HabitatTask>,
    /// Residents by companion ID.
    residents: BTreeMap<PetId, Resident>,
}

impl Habitat {
    /// Create an empty habitat driven by the given clock.
    pub const fn new(clock: DayClock) -> Self {
        Self {
            clock,
            timers: TimerQueue::new(),
            residents: BTreeMap::new(),
        }
    }

    /// Add a companion to the habitat.
    ///
    /// For state restored from persistence, deferred work is rebuilt
    /// from the gates: a started periodic process is rescheduled one
    /// full period out, and an open exclusive window is rescheduled for
    /// its full duration (the deactivation always fires after a fixed
    /// delay).
    ///
    /// # Errors
    ///
    /// Returns [`TickError::ResidentExists`] if the ID is already
    /// present.
    pub fn add_resident(
        &mut self,
        pet: Pet,
        state: CompanionState,
        profile: Arc<SpeciesProfile>,
    ) -> Result<(), TickError> {
        let id = pet.id;
        if self.residents.contains_key(&id) {
            return Err(TickError::ResidentExists(id));
        }

        let now = self.clock.tick();
        for (ability, policy) in &profile.abilities {
            match policy {
                AbilityPolicy::PeriodicBonus { period_ticks, .. }
                    if state.periodic_started(*ability) =>
                {
                    let due = now.saturating_add(*period_ticks);
                    self.timers.schedule(
                        due,
                        HabitatTask::PeriodicBonus {
                            pet: id,
                            ability: *ability,
                        },
                    )?;
                }
                AbilityPolicy::TimedExclusive { duration_ticks, .. }
                    if state.is_active(*ability) =>
                {
                    let due = now.saturating_add(*duration_ticks);
                    self.timers.schedule(
                        due,
                        HabitatTask::Deactivate {
                            pet: id,
                            ability: *ability,
                        },
                    )?;
                }
                _ => {}
            }
        }

        info!(pet_id = %id, name = pet.name, species = profile.species, "resident added");
        self.residents.insert(id, Resident { pet, state, profile });
        Ok(())
    }

    /// Remove a companion, cancelling all scheduled work that references
    /// it.
    pub fn remove_resident(&mut self, pet: PetId) -> Option<Resident> {
        let removed = self.residents.remove(&pet);
        if removed.is_some() {
            let cancelled = self.timers.cancel_where(|task| match task {
                HabitatTask::Deactivate { pet: p, .. }
                | HabitatTask::PeriodicBonus { pet: p, .. } => *p == pet,
            });
            debug!(pet_id = %pet, cancelled, "resident removed");
        }
        removed
    }

    /// Read access to a resident.
    pub fn resident(&self, pet: PetId) -> Option<&Resident> {
        self.residents.get(&pet)
    }

    /// The habitat's clock.
    pub const fn clock(&self) -> &DayClock {
        &self.clock
    }

    /// Number of scheduled tasks currently pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Give a resident a care item.
    pub fn give_item(
        &mut self,
        pet: PetId,
        category: ItemCategory,
        sink: &mut dyn CompanionSink,
    ) -> Result<CareOutcome, TickError> {
        let resident = self
            .residents
            .get_mut(&pet)
            .ok_or(TickError::NoSuchResident(pet))?;
        let outcome = care::give_item(&mut resident.state, &resident.profile, category)
            .map_err(|source| TickError::Companion { pet_id: pet, source })?;
        for ability in &outcome.newly_unlocked {
            sink.ability_unlocked(pet, *ability);
        }
        Ok(outcome)
    }

    /// Play with a resident.
    pub fn play(
        &mut self,
        pet: PetId,
        sink: &mut dyn CompanionSink,
    ) -> Result<CareOutcome, TickError> {
        let resident = self
            .residents
            .get_mut(&pet)
            .ok_or(TickError::NoSuchResident(pet))?;
        let outcome = care::play(&mut resident.state, &resident.profile)
            .map_err(|source| TickError::Companion { pet_id: pet, source })?;
        for ability in &outcome.newly_unlocked {
            sink.ability_unlocked(pet, *ability);
        }
        Ok(outcome)
    }

    /// Grant experience to a resident directly (the external
    /// experience/level-up notification).
    pub fn grant_experience(
        &mut self,
        pet: PetId,
        amount: u32,
        sink: &mut dyn CompanionSink,
    ) -> Result<chroma_companion::LevelUpReport, TickError> {
        let resident = self
            .residents
            .get_mut(&pet)
            .ok_or(TickError::NoSuchResident(pet))?;
        let report =
            chroma_companion::unlocks::grant_experience(&mut resident.state, &resident.profile, amount)
                .map_err(|source| TickError::Companion { pet_id: pet, source })?;
        for ability in &report.newly_unlocked {
            sink.ability_unlocked(pet, *ability);
        }
        Ok(report)
    }

    /// Attempt to activate a resident's ability.
    ///
    /// On success, messages and coin awards are forwarded to the sink
    /// and any deactivation lands in the timer queue. A refusal changes
    /// nothing.
    pub fn activate<R: Rng>(
        &mut self,
        pet: PetId,
        ability: AbilityId,
        sink: &mut dyn CompanionSink,
        rng: &mut R,
    ) -> Result<Activation, TickError> {
        let resident = self
            .residents
            .get_mut(&pet)
            .ok_or(TickError::NoSuchResident(pet))?;
        let activation =
            abilities::activate(&mut resident.state, &resident.profile, ability, rng)
                .map_err(|source| TickError::Companion { pet_id: pet, source })?;

        if let Activation::Performed { effects } = &activation {
            let now = self.clock.tick();
            for effect in effects {
                match effect {
                    AbilityEffect::Message(text) => sink.message(pet, text),
                    AbilityEffect::CoinsAwarded(amount) => sink.coins_awarded(pet, *amount),
                    AbilityEffect::ScheduleDeactivation {
                        ability: closing,
                        after_ticks,
                    } => {
                        let due = now.saturating_add(*after_ticks);
                        self.timers.schedule(
                            due,
                            HabitatTask::Deactivate {
                                pet,
                                ability: *closing,
                            },
                        )?;
                    }
                }
            }
        }
        Ok(activation)
    }

    /// Execute one tick.
    pub fn run_tick<R: Rng>(
        &mut self,
        sink: &mut dyn CompanionSink,
        rng: &mut R,
    ) -> Result<TickSummary, TickError> {
        // Phase 1: clock.
        let advance = self.clock.advance()?;

        let mut summary = TickSummary {
            tick: advance.tick,
            day_rolled: advance.day_rolled,
            windows_closed: 0,
            periodic_firings: 0,
            xp_granted: 0,
            abilities_unlocked: 0,
            rollovers: 0,
        };

        // Phase 2: fire due timers.
        for task in self.timers.fire_due(advance.tick) {
            match task {
                HabitatTask::Deactivate { pet, ability } => {
                    if let Some(resident) = self.residents.get_mut(&pet)
                        && abilities::deactivate(&mut resident.state, ability)
                    {
                        summary.windows_closed = summary.windows_closed.saturating_add(1);
                    }
                }
                HabitatTask::PeriodicBonus { pet, ability } => {
                    let Some(resident) = self.residents.get_mut(&pet) else {
                        continue;
                    };
                    let outcome =
                        abilities::periodic_tick(&mut resident.state, &resident.profile, ability)
                            .map_err(|source| TickError::Companion { pet_id: pet, source })?;
                    summary.periodic_firings = summary.periodic_firings.saturating_add(1);
                    summary.xp_granted = summary.xp_granted.saturating_add(outcome.xp_granted);
                    if let Some(report) = outcome.report {
                        for unlocked in &report.newly_unlocked {
                            sink.ability_unlocked(pet, *unlocked);
                            summary.abilities_unlocked =
                                summary.abilities_unlocked.saturating_add(1);
                        }
                    }
                    // The tag cannot be revoked, so the process runs for
                    // the companion's remaining lifetime.
                    if let Some(AbilityPolicy::PeriodicBonus { period_ticks, .. }) =
                        resident.profile.abilities.get(&ability)
                    {
                        let due = advance.tick.saturating_add(*period_ticks);
                        self.timers
                            .schedule(due, HabitatTask::PeriodicBonus { pet, ability })?;
                    }
                }
            }
        }

        // Phase 3: start pending periodic processes.
        for (id, resident) in &mut self.residents {
            let Resident { state, profile, .. } = resident;
            for (ability, policy) in &profile.abilities {
                let AbilityPolicy::PeriodicBonus { period_ticks, .. } = policy else {
                    continue;
                };
                if abilities::start_periodic(state, *ability) {
                    let due = advance.tick.saturating_add(*period_ticks);
                    self.timers.schedule(
                        due,
                        HabitatTask::PeriodicBonus {
                            pet: *id,
                            ability: *ability,
                        },
                    )?;
                }
            }
        }

        // Phase 4: daily rollover, exactly once per boundary.
        if advance.day_rolled {
            for resident in self.residents.values_mut() {
                // A boundary rollover closes the night phase.
                let _ = rollover::apply_rollover(
                    &mut resident.state,
                    &resident.profile,
                    TimeOfDay::Night,
                    rng,
                );
                summary.rollovers = summary.rollovers.saturating_add(1);
            }
        }

        debug!(
            tick = summary.tick,
            day_rolled = summary.day_rolled,
            windows_closed = summary.windows_closed,
            periodic_firings = summary.periodic_firings,
            xp_granted = summary.xp_granted,
            "tick complete"
        );
        Ok(summary)
    }
}
