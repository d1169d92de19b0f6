//! Saga coordinator for profile lifecycle side effects.
//!
//! One [`SagaCoordinator`] instance is invoked per profile change event and
//! drives the full side-effect sequence: the email-validation sub-workflow,
//! welcome messaging, subscription-feed updates, legacy-preference
//! migration, and the profile-change notification. Every I/O step runs
//! through the same bounded-retry policy; step criticality
//! (required vs. best-effort) is table-driven via [`SagaStep`].
//!
//! The coordinator itself never touches a clock or RNG - randomness and
//! time live inside the token issuer, invoked as an opaque step - so its
//! decisions replay deterministically from the event plus recorded step
//! outcomes.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use memory_adapters::{MemoryFeed, MemoryQueue, MemoryStore, MemoryTransport};
//! use profile_saga::{SagaConfig, SagaCoordinator, TokenIssuer};
//!
//! # async fn example(event: serde_json::Value) -> Result<(), profile_saga::SagaError> {
//! let store = Arc::new(MemoryStore::new());
//! let coordinator = SagaCoordinator::new(
//!     store.clone(),
//!     Arc::new(MemoryQueue::new()),
//!     Arc::new(MemoryFeed::new()),
//!     Arc::new(MemoryTransport::new()),
//!     store,
//!     TokenIssuer::default(),
//!     SagaConfig::from_env(),
//! );
//!
//! let report = coordinator.run(event).await?;
//! println!("published {} feed events", report.feed_events.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod coordinator;
mod email;
mod error;
mod message;
mod migration;
mod ports;
mod report;
mod retry;
mod welcome;

pub use config::{SagaConfig, DEFAULT_MIGRATION_QUEUE};
pub use coordinator::{ProfileChangeNotification, SagaCoordinator, SagaStep};
pub use email::{validation_link, validation_message};
pub use error::SagaError;
pub use message::{MessageKind, OutboundMessage};
pub use migration::{apply_batch, MigrationBatch};
pub use ports::{
    DocumentStore, FeedError, FeedSink, MessageTransport, Queue, QueueError, StoreError,
    TransportError,
};
pub use report::{SagaReport, StepOutcome};
pub use retry::{retry, RetryPolicy, StepCriticality, StepExhausted};
pub use welcome::WelcomeKind;

// Re-export the token types the saga hands around, so callers do not need a
// direct token-issuer dependency.
pub use token_issuer::{
    hash_validator, validate, IssuedToken, TokenEntity, TokenIssuer, TokenStore, TokenStoreError,
};
