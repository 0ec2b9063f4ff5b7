//! Enumeration types for the Chroma Companions core.
//!
//! Ability identifiers are a closed enum rather than strings: membership
//! tests against the unlocked set are tag comparisons, never runtime
//! string comparison.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Ability identifiers
// ---------------------------------------------------------------------------

/// An ability a companion can unlock by reaching a level threshold.
///
/// These are the abilities of the owl variant. Each has a distinct gating
/// policy configured in the species profile:
/// - [`WisdomAura`](Self::WisdomAura) runs passively on a fixed period.
/// - [`NightVision`](Self::NightVision) is a timed-exclusive window.
/// - [`Prophecy`](Self::Prophecy) is limited to a fixed number of uses per day.
/// - [`SilentHunt`](Self::SilentHunt) exhausts all energy on activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbilityId {
    /// Passive aura granting periodic bonus experience while the
    /// companion is happy.
    WisdomAura,
    /// Temporary reveal mode with a fixed active duration.
    NightVision,
    /// Daily-limited fortune draw from a fixed set of visions.
    Prophecy,
    /// Energy-exhausting ultimate: a level-scaled coin reward with a
    /// chance to chain into [`NightVision`](Self::NightVision).
    SilentHunt,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// A mutable field of the companion's stat record.
///
/// Every mutation of one of these fields routes through clamped
/// arithmetic against the species maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatField {
    /// Hit points, clamped to the species health maximum.
    Health,
    /// Action resource, clamped to the species energy maximum.
    Energy,
    /// Mood, clamped to `[0, 100]`.
    Happiness,
}

// ---------------------------------------------------------------------------
// Care items
// ---------------------------------------------------------------------------

/// Category tag carried by a toy/food item descriptor.
///
/// The category alone decides the stat bonuses a care action grants;
/// the companion core never sees the concrete item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Small food item: a little energy, a little happiness.
    Snack,
    /// Full food item: restores health and a large amount of energy.
    Meal,
    /// Indulgence: mostly happiness.
    Treat,
    /// Plaything: happiness at an energy cost.
    Toy,
    /// Enrichment item: happiness and extra experience at a small
    /// energy cost.
    Puzzle,
}

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

/// Coarse phase of the in-game day, derived from the day clock.
///
/// Used by the rollover recovery policy; never stored independently of
/// the tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// The waking portion of the day.
    Day,
    /// The trailing portion of the day, before the next rollover.
    Night,
}
