//! Day clock and time tracking for the companion habitat.
//!
//! The clock is the single source of truth for all temporal state. It
//! tracks the current tick, reports day-boundary crossings for the daily
//! rollover, and derives the time of day from the position within the
//! day -- never stored independently of the tick counter.
//!
//! All temporal derivations use checked arithmetic; the tick number is
//! the source of truth.

use chroma_types::TimeOfDay;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. zero ticks per day).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Result of advancing the clock by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickAdvance {
    /// The new tick number.
    pub tick: u64,
    /// Whether this tick crossed a day boundary (the rollover trigger).
    pub day_rolled: bool,
}

/// Clock tracking ticks and in-game days.
///
/// The clock advances once per tick. A day boundary is crossed whenever
/// the new tick is a multiple of `ticks_per_day`; the tick cycle applies
/// the daily rollover exactly once per crossing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayClock {
    /// Current tick number (0-indexed, incremented at the start of each
    /// tick).
    tick: u64,

    /// Number of ticks in one in-game day.
    ticks_per_day: u64,

    /// Fraction of the day that is night, as a percentage of
    /// `ticks_per_day` at the end of the day.
    night_fraction_pct: u64,
}

impl DayClock {
    /// Create a clock starting at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_day` is 0 or
    /// `night_fraction_pct` exceeds 100.
    pub fn new(ticks_per_day: u64, night_fraction_pct: u64) -> Result<Self, ClockError> {
        Self::from_parts(0, ticks_per_day, night_fraction_pct)
    }

    /// Create a clock from explicit parameters (testing and state
    /// restoration).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `ticks_per_day` is 0 or
    /// `night_fraction_pct` exceeds 100.
    pub fn from_parts(
        tick: u64,
        ticks_per_day: u64,
        night_fraction_pct: u64,
    ) -> Result<Self, ClockError> {
        if ticks_per_day == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "ticks_per_day must be at least 1".to_owned(),
            });
        }
        if night_fraction_pct > 100 {
            return Err(ClockError::InvalidConfig {
                reason: "night_fraction_pct must be at most 100".to_owned(),
            });
        }
        Ok(Self {
            tick,
            ticks_per_day,
            night_fraction_pct,
        })
    }

    /// Advance the clock by one tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would
    /// exceed `u64::MAX`.
    pub fn advance(&mut self) -> Result<TickAdvance, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let day_rolled = self.tick.checked_rem(self.ticks_per_day) == Some(0);
        Ok(TickAdvance {
            tick: self.tick,
            day_rolled,
        })
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Return the configured number of ticks per day.
    pub const fn ticks_per_day(&self) -> u64 {
        self.ticks_per_day
    }

    /// Return the current day index (`tick / ticks_per_day`).
    pub const fn day(&self) -> u64 {
        self.tick / self.ticks_per_day
    }

    /// Compute the current time of day from the tick counter.
    ///
    /// The trailing `night_fraction_pct` percent of each day is night.
    pub fn time_of_day(&self) -> TimeOfDay {
        let position = self.tick.checked_rem(self.ticks_per_day).unwrap_or(0);
        let day_len = self
            .ticks_per_day
            .saturating_mul(100_u64.saturating_sub(self.night_fraction_pct))
            / 100;
        if position >= day_len {
            TimeOfDay::Night
        } else {
            TimeOfDay::Day
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_ticks_per_day_is_invalid() {
        assert!(matches!(
            DayClock::new(0, 30),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn night_fraction_over_100_is_invalid() {
        assert!(matches!(
            DayClock::new(10, 101),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn advance_reports_day_boundaries() {
        let clock = DayClock::new(3, 0).ok();
        assert!(clock.is_some());
        if let Some(mut clock) = clock {
            let crossings: Vec<bool> = (0..6)
                .filter_map(|_| clock.advance().ok().map(|a| a.day_rolled))
                .collect();
            // Boundaries at ticks 3 and 6.
            assert_eq!(crossings, vec![false, false, true, false, false, true]);
            assert_eq!(clock.day(), 2);
        }
    }

    #[test]
    fn time_of_day_tracks_position_in_day() {
        // 10-tick day, trailing 30% night: ticks 0-6 day, 7-9 night.
        let clock = DayClock::from_parts(6, 10, 30).ok();
        assert_eq!(clock.map(|c| c.time_of_day()), Some(chroma_types::TimeOfDay::Day));
        let clock = DayClock::from_parts(7, 10, 30).ok();
        assert_eq!(clock.map(|c| c.time_of_day()), Some(chroma_types::TimeOfDay::Night));
    }

    #[test]
    fn restored_clock_resumes_at_stored_tick() {
        let clock = DayClock::from_parts(29, 10, 30).ok();
        assert!(clock.is_some());
        if let Some(mut clock) = clock {
            let adv = clock.advance().ok();
            assert_eq!(
                adv,
                Some(TickAdvance {
                    tick: 30,
                    day_rolled: true
                })
            );
        }
    }
}
