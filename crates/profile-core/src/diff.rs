//! Subscription diff engine.
//!
//! Computes the subscribe/unsubscribe events implied by a profile change:
//! per-service events while a profile stays in LEGACY (derived from the
//! INBOX block-list), a single profile-level event on mode transitions.

use std::collections::BTreeSet;

use crate::event::SubscriptionOperation;
use crate::model::{BlockedChannels, Channel, NotificationMode};

/// Per-service subscribe/unsubscribe sets implied by a block-list change.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockedDiff {
    /// Services whose INBOX block was removed.
    pub subscribed: Vec<String>,
    /// Services whose INBOX was newly blocked.
    pub unsubscribed: Vec<String>,
}

impl BlockedDiff {
    pub fn is_empty(&self) -> bool {
        self.subscribed.is_empty() && self.unsubscribed.is_empty()
    }
}

fn inbox_blocked(blocked: &BlockedChannels) -> BTreeSet<&str> {
    blocked
        .iter()
        .filter(|(_, channels)| channels.contains(&Channel::Inbox))
        .map(|(service_id, _)| service_id.as_str())
        .collect()
}

/// Diff two legacy block-lists over the INBOX channel only.
///
/// Membership in the inbox-blocked set is what counts, not entry order and
/// not the other channels. Newly blocked services unsubscribe, newly
/// unblocked services subscribe, unchanged services produce nothing.
pub fn blocked_inbox_diff(old: &BlockedChannels, new: &BlockedChannels) -> BlockedDiff {
    let old_blocked = inbox_blocked(old);
    let new_blocked = inbox_blocked(new);

    BlockedDiff {
        subscribed: old_blocked
            .difference(&new_blocked)
            .map(|id| (*id).to_string())
            .collect(),
        unsubscribed: new_blocked
            .difference(&old_blocked)
            .map(|id| (*id).to_string())
            .collect(),
    }
}

/// Profile-level operation implied by a mode transition, if any.
///
/// Entering MANUAL unsubscribes the profile; entering AUTO from MANUAL
/// subscribes it. Entering AUTO straight from LEGACY emits nothing: the
/// profile was already implicitly subscribed.
pub fn mode_change_operation(
    from: NotificationMode,
    to: NotificationMode,
) -> Option<SubscriptionOperation> {
    match (from, to) {
        (NotificationMode::Legacy, NotificationMode::Auto) => None,
        (_, NotificationMode::Auto) => Some(SubscriptionOperation::Subscribed),
        (_, NotificationMode::Manual) => Some(SubscriptionOperation::Unsubscribed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationMode::{Auto, Legacy, Manual};

    fn blocked(entries: &[(&str, &[Channel])]) -> BlockedChannels {
        entries
            .iter()
            .map(|(service_id, channels)| {
                (service_id.to_string(), channels.iter().copied().collect())
            })
            .collect()
    }

    #[test]
    fn test_diff_is_idempotent() {
        let maps = [
            BlockedChannels::new(),
            blocked(&[("svc1", &[Channel::Inbox])]),
            blocked(&[
                ("svc1", &[Channel::Inbox, Channel::Email]),
                ("svc2", &[Channel::Webhook]),
            ]),
        ];
        for map in &maps {
            assert!(blocked_inbox_diff(map, map).is_empty());
        }
    }

    #[test]
    fn test_unblocking_inbox_subscribes() {
        let old = blocked(&[("svc1", &[Channel::Inbox])]);
        let new = BlockedChannels::new();

        let diff = blocked_inbox_diff(&old, &new);
        assert_eq!(diff.subscribed, vec!["svc1".to_string()]);
        assert!(diff.unsubscribed.is_empty());
    }

    #[test]
    fn test_blocking_inbox_unsubscribes() {
        let old = BlockedChannels::new();
        let new = blocked(&[("svc1", &[Channel::Inbox])]);

        let diff = blocked_inbox_diff(&old, &new);
        assert!(diff.subscribed.is_empty());
        assert_eq!(diff.unsubscribed, vec!["svc1".to_string()]);
    }

    #[test]
    fn test_non_inbox_channels_never_appear() {
        let old = blocked(&[("svc1", &[Channel::Email])]);
        let new = blocked(&[
            ("svc1", &[Channel::Email, Channel::Webhook]),
            ("svc2", &[Channel::Webhook]),
        ]);

        assert!(blocked_inbox_diff(&old, &new).is_empty());
    }

    #[test]
    fn test_dropping_only_other_channels_keeps_subscription() {
        // INBOX stays blocked even though the entry itself changed.
        let old = blocked(&[("svc1", &[Channel::Inbox, Channel::Email])]);
        let new = blocked(&[("svc1", &[Channel::Inbox])]);

        assert!(blocked_inbox_diff(&old, &new).is_empty());
    }

    #[test]
    fn test_mixed_diff() {
        let old = blocked(&[
            ("svc1", &[Channel::Inbox]),
            ("svc2", &[Channel::Inbox]),
            ("svc3", &[Channel::Email]),
        ]);
        let new = blocked(&[("svc2", &[Channel::Inbox]), ("svc4", &[Channel::Inbox])]);

        let diff = blocked_inbox_diff(&old, &new);
        assert_eq!(diff.subscribed, vec!["svc1".to_string()]);
        assert_eq!(diff.unsubscribed, vec!["svc4".to_string()]);
    }

    #[test]
    fn test_mode_change_operations() {
        assert_eq!(mode_change_operation(Legacy, Auto), None);
        assert_eq!(
            mode_change_operation(Legacy, Manual),
            Some(SubscriptionOperation::Unsubscribed)
        );
        assert_eq!(
            mode_change_operation(Auto, Manual),
            Some(SubscriptionOperation::Unsubscribed)
        );
        assert_eq!(
            mode_change_operation(Manual, Auto),
            Some(SubscriptionOperation::Subscribed)
        );
    }
}
