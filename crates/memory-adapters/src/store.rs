//! In-memory versioned document store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use profile_core::{check_version, Profile, ServicePreference};
use profile_saga::{DocumentStore, StoreError};
use token_issuer::{TokenEntity, TokenStore, TokenStoreError};
use tokio::sync::RwLock;

use crate::failure::FailureInjector;

type PreferenceKey = (String, String, i64);

/// In-memory document store: per-user append-only profile chains,
/// immutable service-preference documents, and the token table.
///
/// `fail_next(n)` injects transient failures into the next `n` document
/// operations; `fail_next_token_insert(n)` does the same for token writes
/// so sub-workflow failures can be exercised in isolation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, Vec<Profile>>>,
    preferences: RwLock<BTreeMap<PreferenceKey, ServicePreference>>,
    tokens: RwLock<Vec<TokenEntity>>,
    failures: FailureInjector,
    token_failures: FailureInjector,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` document operations fail transiently.
    pub fn fail_next(&self, n: u32) {
        self.failures.fail_next(n);
    }

    /// Make the next `n` token inserts fail transiently.
    pub fn fail_next_token_insert(&self, n: u32) {
        self.token_failures.fail_next(n);
    }

    /// Every token entity written so far, in insertion order.
    pub async fn tokens(&self) -> Vec<TokenEntity> {
        self.tokens.read().await.clone()
    }

    /// Total count of service-preference documents.
    pub async fn preference_count(&self) -> usize {
        self.preferences.read().await.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_profile(&self, fiscal_key: &str) -> Result<Option<Profile>, StoreError> {
        if self.failures.take() {
            return Err(StoreError::Transient("injected failure".to_string()));
        }
        Ok(self
            .profiles
            .read()
            .await
            .get(fiscal_key)
            .and_then(|chain| chain.last().cloned()))
    }

    async fn write_profile(
        &self,
        profile: &Profile,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        if self.failures.take() {
            return Err(StoreError::Transient("injected failure".to_string()));
        }
        let mut profiles = self.profiles.write().await;
        let chain = profiles.entry(profile.fiscal_key.clone()).or_default();
        match chain.last() {
            None => {
                if expected_version != 0 {
                    return Err(StoreError::Conflict(format!(
                        "no current profile, requested version {expected_version}"
                    )));
                }
            }
            Some(current) => {
                check_version(expected_version, current)
                    .map_err(|err| StoreError::Conflict(err.to_string()))?;
            }
        }
        chain.push(profile.clone());
        Ok(())
    }

    async fn create_service_preference(
        &self,
        preference: &ServicePreference,
    ) -> Result<(), StoreError> {
        if self.failures.take() {
            return Err(StoreError::Transient("injected failure".to_string()));
        }
        let key = (
            preference.fiscal_key.clone(),
            preference.service_id.clone(),
            preference.settings_version,
        );
        let mut preferences = self.preferences.write().await;
        if preferences.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "service preference exists: {}/{}/{}",
                key.0, key.1, key.2
            )));
        }
        preferences.insert(key, preference.clone());
        Ok(())
    }

    async fn service_preferences(
        &self,
        fiscal_key: &str,
        settings_version: i64,
    ) -> Result<Vec<ServicePreference>, StoreError> {
        if self.failures.take() {
            return Err(StoreError::Transient("injected failure".to_string()));
        }
        Ok(self
            .preferences
            .read()
            .await
            .values()
            .filter(|preference| {
                preference.fiscal_key == fiscal_key
                    && preference.settings_version == settings_version
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn insert(&self, entity: &TokenEntity) -> Result<(), TokenStoreError> {
        if self.token_failures.take() {
            return Err(TokenStoreError::Transient("injected failure".to_string()));
        }
        self.tokens.write().await.push(entity.clone());
        Ok(())
    }
}
