//! Saga configuration.

use std::env;

use crate::retry::RetryPolicy;

/// Default queue receiving legacy-migration batches.
pub const DEFAULT_MIGRATION_QUEUE: &str = "migrate-legacy-service-preferences";

/// Configuration for the saga coordinator.
#[derive(Debug, Clone)]
pub struct SagaConfig {
    /// Whether the CASHBACK welcome message is sent alongside WELCOME and
    /// HOWTO.
    pub cashback_enabled: bool,

    /// Queue that receives legacy-migration batches.
    pub migration_queue: String,

    /// Queue for profile-change notifications. `None` disables the Notify
    /// step entirely.
    pub notify_queue: Option<String>,

    /// Retry policy applied uniformly to every I/O step.
    pub retry: RetryPolicy,
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            cashback_enabled: false,
            migration_queue: DEFAULT_MIGRATION_QUEUE.to_string(),
            notify_queue: None,
            retry: RetryPolicy::default(),
        }
    }
}

impl SagaConfig {
    /// Read configuration from the environment.
    ///
    /// - `CASHBACK_ENABLED`: `true`/`1` to enable the cashback message
    /// - `MIGRATION_QUEUE_NAME`: overrides the migration queue
    /// - `NOTIFY_QUEUE_NAME`: enables the Notify step when non-empty
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cashback_enabled: env::var("CASHBACK_ENABLED")
                .map(|value| value == "true" || value == "1")
                .unwrap_or(defaults.cashback_enabled),
            migration_queue: env::var("MIGRATION_QUEUE_NAME")
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.migration_queue),
            notify_queue: env::var("NOTIFY_QUEUE_NAME")
                .ok()
                .filter(|value| !value.is_empty()),
            retry: defaults.retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = SagaConfig::default();
        assert!(!config.cashback_enabled);
        assert_eq!(config.migration_queue, DEFAULT_MIGRATION_QUEUE);
        assert!(config.notify_queue.is_none());
        assert_eq!(config.retry.initial_delay, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 10);
    }
}
