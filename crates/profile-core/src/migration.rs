//! Legacy block-list to per-service preference conversion.

use crate::model::{BlockedChannels, Channel, ServicePreference};

/// Whether a block-list key is a well-formed service id.
fn is_service_id(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Convert a legacy block-list into explicit per-service preferences.
///
/// One document per entry, each flag the negation of the corresponding
/// blocked channel. Entries whose key is not a service id are dropped
/// silently (validation, not an error). Pure: the caller owns creating the
/// documents, which must be idempotent so a partial migration can safely be
/// retried from scratch.
pub fn convert(
    fiscal_key: &str,
    blocked: &BlockedChannels,
    settings_version: i64,
) -> Vec<ServicePreference> {
    blocked
        .iter()
        .filter(|(key, _)| is_service_id(key))
        .map(|(service_id, channels)| ServicePreference {
            fiscal_key: fiscal_key.to_string(),
            service_id: service_id.clone(),
            settings_version,
            is_inbox_enabled: !channels.contains(&Channel::Inbox),
            is_email_enabled: !channels.contains(&Channel::Email),
            is_webhook_enabled: !channels.contains(&Channel::Webhook),
        })
        .collect()
}
