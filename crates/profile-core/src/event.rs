//! The saga's input event and the subscription-feed events it emits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Profile;

/// The sole input of the saga coordinator: one profile write.
///
/// `old_profile` absent means the write created the profile; present means
/// it updated the current version. The event is ephemeral and never
/// persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChangeEvent {
    pub new_profile: Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_profile: Option<Profile>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileChangeEvent {
    /// Whether this event records a creation or an update.
    pub fn operation(&self) -> Operation {
        if self.old_profile.is_none() {
            Operation::Created
        } else {
            Operation::Updated
        }
    }
}

/// Kind of profile write that produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Created,
    Updated,
}

/// Direction of a subscription-feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionOperation {
    Subscribed,
    Unsubscribed,
}

/// Granularity of a subscription-feed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "serviceId", rename_all = "UPPERCASE")]
pub enum EventScope {
    /// The whole profile subscribed/unsubscribed.
    Profile,
    /// A single service subscribed/unsubscribed.
    Service(String),
}

/// A subscribe/unsubscribe signal handed to the external subscription feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionEvent {
    pub fiscal_key: String,
    pub operation: SubscriptionOperation,
    #[serde(flatten)]
    pub scope: EventScope,
    /// Profile document version the event was derived from.
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionEvent {
    /// A profile-level event.
    pub fn profile(
        fiscal_key: impl Into<String>,
        operation: SubscriptionOperation,
        version: u64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            fiscal_key: fiscal_key.into(),
            operation,
            scope: EventScope::Profile,
            version,
            updated_at,
        }
    }

    /// A per-service event.
    pub fn service(
        fiscal_key: impl Into<String>,
        service_id: impl Into<String>,
        operation: SubscriptionOperation,
        version: u64,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            fiscal_key: fiscal_key.into(),
            operation,
            scope: EventScope::Service(service_id.into()),
            version,
            updated_at,
        }
    }
}
