//! Clamped stat arithmetic for companion state.
//!
//! Every public mutator in this crate (care actions, ability activation,
//! daily rollover) routes stat changes through [`modify`]:
//! `new = clamp(old + delta, 0, max[field])`. No field is ever observably
//! outside its bound, even transiently, and no delta is an error --
//! clamping absorbs all out-of-range input.

use chroma_types::{CompanionState, StatField};

use crate::config::StatMaxima;

/// Apply a signed delta to a stat field, clamping to `[0, max]`.
///
/// Returns the new clamped value. The arithmetic widens to `i64`, so no
/// combination of `u32` stat and `i32` delta can overflow.
pub fn modify(
    state: &mut CompanionState,
    maxima: &StatMaxima,
    field: StatField,
    delta: i32,
) -> u32 {
    let (current, max) = match field {
        StatField::Health => (state.health, maxima.health),
        StatField::Energy => (state.energy, maxima.energy),
        StatField::Happiness => (state.happiness, maxima.happiness),
    };

    let widened = i64::from(current).saturating_add(i64::from(delta));
    let clamped = widened.clamp(0, i64::from(max));
    // clamped is within [0, u32::MAX] by construction.
    let new = u32::try_from(clamped).unwrap_or(0);

    match field {
        StatField::Health => state.health = new,
        StatField::Energy => state.energy = new,
        StatField::Happiness => state.happiness = new,
    }
    new
}

/// Set energy to exactly zero.
///
/// The energy-exhausting ultimate does not decrement -- it empties the
/// resource regardless of the prior value.
pub const fn exhaust_energy(state: &mut CompanionState) {
    state.energy = 0;
}
