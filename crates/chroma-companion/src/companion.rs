//! Companion creation and restoration.
//!
//! The [`CompanionKeeper`] creates new companions with identity and
//! starting state from a species profile. It produces both an immutable
//! [`Pet`] record (identity) and a mutable [`CompanionState`] (stats and
//! gates), and enforces name uniqueness.

use std::collections::BTreeSet;

use chrono::Utc;
use chroma_types::{CompanionState, Pet, PetId};

use crate::config::SpeciesProfile;
use crate::error::CompanionError;

/// Creates and tracks companions.
///
/// Enforces display-name uniqueness and provides factory methods for
/// fresh adoption and for restoration from externally persisted state.
#[derive(Debug, Default)]
pub struct CompanionKeeper {
    /// Set of all companion names currently in use.
    names_in_use: BTreeSet<String>,
}

impl CompanionKeeper {
    /// Create a new empty keeper.
    pub const fn new() -> Self {
        Self {
            names_in_use: BTreeSet::new(),
        }
    }

    /// Adopt a fresh companion of the given species.
    ///
    /// The companion starts at level 1 with the profile's starting stats,
    /// an empty unlocked set, and the initial gate for each configured
    /// ability.
    ///
    /// # Errors
    ///
    /// Returns [`CompanionError::DuplicateName`] if the name is taken.
    pub fn adopt(
        &mut self,
        name: String,
        profile: &SpeciesProfile,
    ) -> Result<(Pet, CompanionState), CompanionError> {
        if self.names_in_use.contains(&name) {
            return Err(CompanionError::DuplicateName(name));
        }
        self.names_in_use.insert(name.clone());

        let id = PetId::new();
        let pet = Pet {
            id,
            name,
            species: profile.species.clone(),
            adopted_at: Utc::now(),
        };
        let state = CompanionState {
            pet_id: id,
            level: 1,
            experience: 0,
            health: profile.starting.health,
            energy: profile.starting.energy,
            happiness: profile.starting.happiness,
            unlocked: BTreeSet::new(),
            gates: profile.initial_gates(),
        };
        Ok((pet, state))
    }

    /// Register a companion restored from persisted state.
    ///
    /// Level, stat values, the unlocked set, and per-day counters are
    /// taken verbatim from the stored state; the keeper only reclaims
    /// the name.
    ///
    /// # Errors
    ///
    /// Returns [`CompanionError::DuplicateName`] if the name is taken.
    pub fn restore(&mut self, pet: &Pet) -> Result<(), CompanionError> {
        if self.names_in_use.contains(&pet.name) {
            return Err(CompanionError::DuplicateName(pet.name.clone()));
        }
        self.names_in_use.insert(pet.name.clone());
        Ok(())
    }

    /// Release a companion's name (teardown).
    pub fn release(&mut self, name: &str) -> bool {
        self.names_in_use.remove(name)
    }
}
