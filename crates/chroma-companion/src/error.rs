//! Error types for the chroma-companion crate.
//!
//! Refusal of a gated ability is not an error -- it is a typed outcome
//! (see [`abilities::Activation`](crate::abilities::Activation)). The
//! errors here cover the ambient failure modes: arithmetic overflow in
//! experience accounting and keeper bookkeeping problems.

use chroma_types::PetId;

/// Errors that can occur during companion state operations.
#[derive(Debug, thiserror::Error)]
pub enum CompanionError {
    /// An arithmetic overflow occurred during an experience or reward
    /// computation.
    #[error("arithmetic overflow in companion computation: {context}")]
    ArithmeticOverflow {
        /// Description of what was being computed.
        context: String,
    },

    /// Companion name already exists in the keeper.
    #[error("duplicate companion name: {0}")]
    DuplicateName(String),

    /// Companion with the given ID was not found.
    #[error("companion not found: {0}")]
    PetNotFound(PetId),
}
