//! Profile and preference document types.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel settings version carried while a profile is still in LEGACY mode.
pub const LEGACY_SETTINGS_VERSION: i64 = -1;

/// Notification-preferences regime of a profile.
///
/// LEGACY profiles carry a per-service block-list; AUTO and MANUAL profiles
/// carry explicit [`ServicePreference`] documents instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationMode {
    /// Implicit preferences via the blocked-channels map.
    Legacy,
    /// Subscribed to every service unless overridden per service.
    Auto,
    /// Unsubscribed from every service unless overridden per service.
    Manual,
}

impl NotificationMode {
    /// Wire/log spelling of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationMode::Legacy => "LEGACY",
            NotificationMode::Auto => "AUTO",
            NotificationMode::Manual => "MANUAL",
        }
    }
}

impl fmt::Display for NotificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification channel a LEGACY profile may have blocked per service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Inbox,
    Email,
    Webhook,
}

/// Per-service blocked channels. Only meaningful while mode = LEGACY.
pub type BlockedChannels = BTreeMap<String, BTreeSet<Channel>>;

/// Mode plus the settings-version counter.
///
/// The counter is independent of the profile's own document version and is
/// incremented only by mode transitions (see [`crate::transition`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesSettings {
    pub mode: NotificationMode,
    pub version: i64,
}

impl PreferencesSettings {
    /// The settings a brand-new profile starts from.
    pub fn legacy() -> Self {
        Self {
            mode: NotificationMode::Legacy,
            version: LEGACY_SETTINGS_VERSION,
        }
    }
}

impl Default for PreferencesSettings {
    fn default() -> Self {
        Self::legacy()
    }
}

/// A versioned profile document.
///
/// Exactly one document is current per user (the one with the highest
/// `version`); every write must target the current version or it is
/// rejected by [`crate::check_version`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Opaque identity key scoping the profile to one user.
    pub fiscal_key: String,
    /// Document version, monotonically increasing per user.
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_email_validated: bool,
    pub is_inbox_enabled: bool,
    pub is_webhook_enabled: bool,
    pub is_email_enabled: bool,
    #[serde(default)]
    pub preferences_settings: PreferencesSettings,
    /// Legacy per-service opt-outs; ignored once the profile leaves LEGACY.
    #[serde(default)]
    pub blocked_inbox_or_channels: BlockedChannels,
}

impl Profile {
    /// Whether the legacy block-list has at least one entry.
    pub fn has_blocked_services(&self) -> bool {
        !self.blocked_inbox_or_channels.is_empty()
    }
}

/// One immutable per-service preference document.
///
/// Keyed by (user, service, settings version); a new settings version
/// produces new documents, never mutates old ones. Creation is idempotent:
/// a duplicate-key conflict on create is a successful no-op for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePreference {
    pub fiscal_key: String,
    pub service_id: String,
    pub settings_version: i64,
    pub is_inbox_enabled: bool,
    pub is_email_enabled: bool,
    pub is_webhook_enabled: bool,
}
