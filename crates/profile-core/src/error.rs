//! Typed outcomes for business-rule violations.

use thiserror::Error;

use crate::model::NotificationMode;

/// A rule violation surfaced to the caller. Never retried: the same input
/// will conflict again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// A write targeted a version other than the current one.
    #[error("version conflict: requested {requested}, current is {current}")]
    Version { requested: u64, current: u64 },

    /// Settings must be resent explicitly once a profile has opted in.
    #[error("settings must be resent explicitly while in {current} mode")]
    SettingsRequired { current: NotificationMode },

    /// There is no path back to LEGACY once a profile has opted in.
    #[error("cannot return to LEGACY from {from}")]
    LegacyDowngrade { from: NotificationMode },
}
