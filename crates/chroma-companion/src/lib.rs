//! Companion state, abilities, care actions, and lifecycle for the
//! Chroma Companions core.
//!
//! This crate contains the logic layer for companions -- everything that
//! operates on companion state without touching I/O or scheduling. It
//! sits between `chroma-types` (which defines the data structures) and
//! `chroma-core` (which owns the clock, the timer queue, and the tick
//! cycle).
//!
//! # Modules
//!
//! - [`abilities`] -- Gated activation, periodic bonus, refusal reasons
//! - [`care`] -- Feed/play actions with per-category effect tables
//! - [`companion`] -- Companion creation and restoration ([`CompanionKeeper`])
//! - [`config`] -- Species profiles, unlock tables, ability policies
//! - [`error`] -- Error types for companion operations ([`CompanionError`])
//! - [`rollover`] -- Daily counter reset and bounded stat recovery
//! - [`sinks`] -- Collaborator traits for unlock/message/coin signals
//! - [`stats`] -- Clamped stat arithmetic
//! - [`unlocks`] -- Leveling and the one-pass unlock check

pub mod abilities;
pub mod care;
pub mod companion;
pub mod config;
pub mod error;
pub mod rollover;
pub mod sinks;
pub mod stats;
pub mod unlocks;

// Re-export primary types at crate root for convenience.
pub use abilities::{Activation, AbilityEffect, PeriodicOutcome, RefusalReason};
pub use care::{CareOutcome, ItemEffects, PLAY_ENERGY_COST, PLAY_HAPPINESS_GAIN, XP_PLAY};
pub use companion::CompanionKeeper;
pub use config::{
    AbilityPolicy, RecoveryPolicy, RolloverConfig, SpeciesProfile, StartingStats, StatMaxima,
};
pub use error::CompanionError;
pub use rollover::RolloverSummary;
pub use sinks::{CompanionSink, NullSink, RecordingSink};
pub use unlocks::{LevelUpReport, MAX_LEVEL};
