//! Error types for the habitat runtime binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the habitat loop.

/// Top-level error for the habitat runtime binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: chroma_core::config::ConfigError,
    },

    /// Day clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: chroma_core::clock::ClockError,
    },

    /// The habitat tick cycle failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: chroma_core::tick::TickError,
    },

    /// A companion operation failed.
    #[error("companion error: {source}")]
    Companion {
        /// The underlying companion error.
        #[from]
        source: chroma_companion::CompanionError,
    },
}
