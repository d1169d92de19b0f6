//! Migration batch payload and idempotent application.

use profile_core::ServicePreference;
use serde::{Deserialize, Serialize};

use crate::ports::{DocumentStore, StoreError};

/// Queue payload describing one legacy-preference migration.
///
/// Consumers may receive a batch more than once; creation is idempotent
/// per (user, service, settings version), so re-applying is safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationBatch {
    pub fiscal_key: String,
    pub settings_version: i64,
    pub preferences: Vec<ServicePreference>,
}

/// Apply a batch against the store, one create per preference.
///
/// Returns one flag per preference: `true` created, `false` already there.
/// Any non-conflict failure aborts and propagates, causing the caller to
/// retry the whole batch; a partial migration is acceptable to retry from
/// scratch.
pub async fn apply_batch(
    store: &dyn DocumentStore,
    batch: &MigrationBatch,
) -> Result<Vec<bool>, StoreError> {
    let mut created = Vec::with_capacity(batch.preferences.len());
    for preference in &batch.preferences {
        match store.create_service_preference(preference).await {
            Ok(()) => created.push(true),
            Err(StoreError::Conflict(_)) => created.push(false),
            Err(err) => return Err(err),
        }
    }
    Ok(created)
}
