//! Day clock, timer queue, and tick cycle for the Chroma Companions
//! core.
//!
//! This crate owns the temporal machinery: the [`DayClock`] that tracks
//! ticks and day boundaries, the [`TimerQueue`] that holds deferred
//! tasks with cancel handles, and the [`Habitat`] whose tick cycle
//! drives timers, periodic bonus processes, and the daily rollover.
//!
//! # Modules
//!
//! - [`clock`] -- Day clock with tick counter, day-boundary detection,
//!   and time-of-day derivation.
//! - [`config`] -- Configuration loading from `chroma-config.yaml` into
//!   strongly-typed structs.
//! - [`tick`] -- The habitat, its roster, and the four-phase tick cycle.
//! - [`timer`] -- Tick-indexed timer queue with cancel handles.
//!
//! [`DayClock`]: clock::DayClock
//! [`TimerQueue`]: timer::TimerQueue
//! [`Habitat`]: tick::Habitat

pub mod clock;
pub mod config;
pub mod tick;
pub mod timer;

pub use clock::{ClockError, DayClock, TickAdvance};
pub use config::{ConfigError, RuntimeConfig};
pub use tick::{Habitat, Resident, TickError, TickSummary};
pub use timer::{TimerError, TimerHandle, TimerQueue};
