//! Domain types and pure state machines for the profile lifecycle saga.
//!
//! This crate holds everything that must be deterministic and side-effect
//! free so the saga coordinator can replay its decisions from history:
//!
//! - [`Profile`] / [`ServicePreference`] - the versioned documents
//! - [`check_version`] - the optimistic-concurrency guard on profile writes
//! - [`transition`] - the LEGACY/AUTO/MANUAL mode state machine
//! - [`blocked_inbox_diff`] / [`mode_change_operation`] - the subscription
//!   diff engine feeding the external subscription feed
//! - [`convert`] - the legacy block-list to per-service preference converter
//!
//! Business-rule violations are returned as [`ConflictError`], never thrown;
//! I/O lives in the `profile-saga` crate behind ports.

mod diff;
mod error;
mod event;
mod migration;
mod model;
mod transition;
mod version;

pub use diff::{blocked_inbox_diff, mode_change_operation, BlockedDiff};
pub use error::ConflictError;
pub use event::{
    EventScope, Operation, ProfileChangeEvent, SubscriptionEvent, SubscriptionOperation,
};
pub use migration::convert;
pub use model::{
    BlockedChannels, Channel, NotificationMode, PreferencesSettings, Profile, ServicePreference,
    LEGACY_SETTINGS_VERSION,
};
pub use transition::{transition, ModeChange};
pub use version::check_version;
