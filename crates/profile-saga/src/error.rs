//! Saga-level errors.

use profile_core::ConflictError;
use thiserror::Error;

use crate::retry::StepExhausted;

/// Why a saga ended in `Failed` instead of `Done`.
#[derive(Debug, Error)]
pub enum SagaError {
    /// The change event could not be decoded. Never retried: the input
    /// will not become valid by running it again.
    #[error("invalid profile change event: {0}")]
    InvalidEvent(String),

    /// The event contradicts the mode-transition rules the write path
    /// already enforces.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// A required step ran out of retry attempts; the workflow host is
    /// expected to re-run the whole saga.
    #[error(transparent)]
    Step(#[from] StepExhausted),

    /// A queue payload failed to encode.
    #[error("payload encoding failed: {0}")]
    Encode(String),
}
