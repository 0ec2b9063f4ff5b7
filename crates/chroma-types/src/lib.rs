//! Shared type definitions for the Chroma Companions core.
//!
//! This crate holds plain data: identifier newtypes, closed enumerations,
//! and the companion identity/state structs. It contains no behavior
//! beyond accessors -- the logic layer lives in `chroma-companion` and
//! orchestration in `chroma-core`.

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::{AbilityId, ItemCategory, StatField, TimeOfDay};
pub use ids::PetId;
pub use structs::{CompanionState, Pet, TimedAbilityState};
