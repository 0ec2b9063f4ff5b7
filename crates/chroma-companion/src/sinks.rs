//! Collaborator sinks for user-visible output.
//!
//! The companion core never reaches for ambient singletons; collaborators
//! are passed in explicitly wherever signals leave the core. The sink
//! receives the one-shot "ability unlocked" signal (at most once per tag
//! per companion), user-visible message text, and currency awards.

use chroma_types::{AbilityId, PetId};

/// Receiver for the signals the companion core exposes.
pub trait CompanionSink {
    /// An ability tag entered the unlocked set. Fired exactly once per
    /// tag per companion lifetime.
    fn ability_unlocked(&mut self, pet: PetId, ability: AbilityId);

    /// An ability or care action produced user-visible text.
    fn message(&mut self, pet: PetId, text: &str);

    /// Coins to credit to the owning player's balance.
    fn coins_awarded(&mut self, pet: PetId, amount: u32);
}

/// A no-op sink for testing.
#[derive(Debug, Default)]
pub struct NullSink;

impl CompanionSink for NullSink {
    fn ability_unlocked(&mut self, _pet: PetId, _ability: AbilityId) {}
    fn message(&mut self, _pet: PetId, _text: &str) {}
    fn coins_awarded(&mut self, _pet: PetId, _amount: u32) {}
}

/// A sink that records everything it receives, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Unlock signals in arrival order.
    pub unlocks: Vec<(PetId, AbilityId)>,
    /// Messages in arrival order.
    pub messages: Vec<(PetId, String)>,
    /// Coin awards in arrival order.
    pub coins: Vec<(PetId, u32)>,
}

impl CompanionSink for RecordingSink {
    fn ability_unlocked(&mut self, pet: PetId, ability: AbilityId) {
        self.unlocks.push((pet, ability));
    }

    fn message(&mut self, pet: PetId, text: &str) {
        self.messages.push((pet, String::from(text)));
    }

    fn coins_awarded(&mut self, pet: PetId, amount: u32) {
        self.coins.push((pet, amount));
    }
}
