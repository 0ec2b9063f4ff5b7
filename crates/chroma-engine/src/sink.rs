//! Companion sink that forwards signals to structured logging.
//!
//! The habitat core emits unlock, message, and coin signals through the
//! [`CompanionSink`] trait; this implementation turns each into a
//! tracing event so a run can be followed from the log stream alone.

use chroma_companion::sinks::CompanionSink;
use chroma_types::{AbilityId, PetId};
use tracing::info;

/// Sink that logs every signal it receives.
#[derive(Debug, Default)]
pub struct TracingSink {
    /// Running total of coins awarded across all companions.
    coins_total: u64,
}

impl TracingSink {
    /// Create a new sink with a zeroed coin total.
    pub const fn new() -> Self {
        Self { coins_total: 0 }
    }

    /// Total coins awarded so far.
    pub const fn coins_total(&self) -> u64 {
        self.coins_total
    }
}

impl CompanionSink for TracingSink {
    fn ability_unlocked(&mut self, pet: PetId, ability: AbilityId) {
        info!(pet_id = %pet, ?ability, "ability unlocked");
    }

    fn message(&mut self, pet: PetId, text: &str) {
        info!(pet_id = %pet, text, "companion says");
    }

    fn coins_awarded(&mut self, pet: PetId, amount: u32) {
        self.coins_total = self.coins_total.saturating_add(u64::from(amount));
        info!(pet_id = %pet, amount, total = self.coins_total, "coins awarded");
    }
}
