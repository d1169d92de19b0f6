//! Port for persisting token entities.

use async_trait::async_trait;
use thiserror::Error;

use crate::token::TokenEntity;

/// Failure while writing a token entity.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// The store was unreachable or rejected the write transiently.
    #[error("transient token store failure: {0}")]
    Transient(String),
}

/// Storage for issued tokens.
///
/// Entities are created once and never updated; they expire naturally. A
/// failed insert is fatal for the issuing step: the caller retries the
/// whole step, re-issuing a fresh token rather than re-reading.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a token entity.
    async fn insert(&self, entity: &TokenEntity) -> Result<(), TokenStoreError>;
}
