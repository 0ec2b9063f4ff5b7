//! Care actions: giving items and playing.
//!
//! An item reaches the core only as a category tag; the category alone
//! decides the stat bonuses. All stat changes route through the clamped
//! arithmetic in [`stats`](crate::stats), and every experience award runs
//! the unlock check so a care action can cross unlock thresholds.
//!
//! All values are whole integers -- no floating point.

use chroma_types::{AbilityId, CompanionState, ItemCategory, StatField};
use tracing::debug;

use crate::config::SpeciesProfile;
use crate::error::CompanionError;
use crate::unlocks;

/// Energy deducted by a play session (clamped at 0; an exhausted
/// companion can still play).
pub const PLAY_ENERGY_COST: u32 = 10;

/// Happiness gained by a play session.
pub const PLAY_HAPPINESS_GAIN: u32 = 15;

/// XP awarded per play session.
pub const XP_PLAY: u32 = 5;

/// Stat and experience deltas granted by one care item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemEffects {
    /// Signed health delta.
    pub health: i32,
    /// Signed energy delta (toys cost energy).
    pub energy: i32,
    /// Signed happiness delta.
    pub happiness: i32,
    /// Experience awarded.
    pub xp: u32,
}

/// Per-category item effects.
///
/// - Snack: light energy, a little happiness
/// - Meal: health and a large energy restore
/// - Treat: mostly happiness
/// - Toy: happiness at an energy cost
/// - Puzzle: happiness and extra experience at a small energy cost
pub const fn item_effects(category: ItemCategory) -> ItemEffects {
    match category {
        ItemCategory::Snack => ItemEffects {
            health: 0,
            energy: 10,
            happiness: 5,
            xp: 2,
        },
        ItemCategory::Meal => ItemEffects {
            health: 10,
            energy: 25,
            happiness: 5,
            xp: 4,
        },
        ItemCategory::Treat => ItemEffects {
            health: 5,
            energy: 5,
            happiness: 15,
            xp: 3,
        },
        ItemCategory::Toy => ItemEffects {
            health: 0,
            energy: -10,
            happiness: 20,
            xp: 5,
        },
        ItemCategory::Puzzle => ItemEffects {
            health: 0,
            energy: -5,
            happiness: 15,
            xp: 6,
        },
    }
}

/// Result of a care action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareOutcome {
    /// Level after the action.
    pub new_level: u32,
    /// Abilities newly unlocked by the action's experience award.
    pub newly_unlocked: Vec<AbilityId>,
}

/// Give the companion a care item of the given category.
pub fn give_item(
    state: &mut CompanionState,
    profile: &SpeciesProfile,
    category: ItemCategory,
) -> Result<CareOutcome, CompanionError> {
    let effects = item_effects(category);
    apply_care(state, profile, &effects, "item")
}

/// Play with the companion: costs energy, raises happiness, awards XP.
pub fn play(
    state: &mut CompanionState,
    profile: &SpeciesProfile,
) -> Result<CareOutcome, CompanionError> {
    let cost = i32::try_from(PLAY_ENERGY_COST).unwrap_or(i32::MAX);
    let gain = i32::try_from(PLAY_HAPPINESS_GAIN).unwrap_or(i32::MAX);
    let effects = ItemEffects {
        health: 0,
        energy: cost.saturating_neg(),
        happiness: gain,
        xp: XP_PLAY,
    };
    apply_care(state, profile, &effects, "play")
}

fn apply_care(
    state: &mut CompanionState,
    profile: &SpeciesProfile,
    effects: &ItemEffects,
    action: &str,
) -> Result<CareOutcome, CompanionError> {
    let health = crate::stats::modify(state, &profile.maxima, StatField::Health, effects.health);
    let energy = crate::stats::modify(state, &profile.maxima, StatField::Energy, effects.energy);
    let happiness =
        crate::stats::modify(state, &profile.maxima, StatField::Happiness, effects.happiness);
    let report = unlocks::grant_experience(state, profile, effects.xp)?;

    debug!(
        pet_id = %state.pet_id,
        action,
        health,
        energy,
        happiness,
        level = report.new_level,
        "care action applied"
    );

    Ok(CareOutcome {
        new_level: report.new_level,
        newly_unlocked: report.newly_unlocked,
    })
}
