//! Collaborator ports consumed by the saga.
//!
//! Real drivers (document store, queue service, subscription feed, email
//! and push delivery) live outside this workspace; the `memory-adapters`
//! crate provides in-memory implementations for tests and examples.

use async_trait::async_trait;
use profile_core::{Profile, ServicePreference, SubscriptionEvent};
use thiserror::Error;

use crate::message::OutboundMessage;

/// Failure from the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The targeted version is stale or the document already exists.
    /// Never retried.
    #[error("store conflict: {0}")]
    Conflict(String),

    /// The store was unreachable or rejected the call transiently.
    #[error("transient store failure: {0}")]
    Transient(String),
}

/// Failure while enqueueing a payload.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("transient queue failure: {0}")]
    Transient(String),
}

/// Failure while publishing a subscription event.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("transient feed failure: {0}")]
    Transient(String),
}

/// Failure while delivering a message.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transient transport failure: {0}")]
    Transient(String),
}

/// Versioned-document store holding profiles and per-service preferences.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// The current (highest-version) profile of a user, if any.
    async fn find_profile(&self, fiscal_key: &str) -> Result<Option<Profile>, StoreError>;

    /// Append a new profile version.
    ///
    /// Conflicts when `expected_version` does not match the current one;
    /// the profile version chain is append-only.
    async fn write_profile(
        &self,
        profile: &Profile,
        expected_version: u64,
    ) -> Result<(), StoreError>;

    /// Create one immutable preference document.
    ///
    /// Conflicts when a document already exists for the same
    /// (user, service, settings version) key.
    async fn create_service_preference(
        &self,
        preference: &ServicePreference,
    ) -> Result<(), StoreError>;

    /// All preference documents of a user at one settings version.
    async fn service_preferences(
        &self,
        fiscal_key: &str,
        settings_version: i64,
    ) -> Result<Vec<ServicePreference>, StoreError>;
}

/// Named queues carrying migration batches and change notifications.
#[async_trait]
pub trait Queue: Send + Sync {
    async fn enqueue(&self, queue: &str, payload: serde_json::Value) -> Result<(), QueueError>;
}

/// Sink consuming subscription-feed events.
#[async_trait]
pub trait FeedSink: Send + Sync {
    async fn publish(&self, event: &SubscriptionEvent) -> Result<(), FeedError>;
}

/// Email/push delivery. Templating and transport protocol are the
/// implementation's concern.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}
