//! The profile-change saga coordinator.
//!
//! One instance runs per [`ProfileChangeEvent`]; instances for different
//! users run fully in parallel with no shared mutable state. Each step is
//! an independently retried unit of work; once started, a saga runs to
//! `Done` or `Failed` and is never abandoned mid-way.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use profile_core::{
    blocked_inbox_diff, convert, mode_change_operation, transition, ModeChange, NotificationMode,
    Operation, ProfileChangeEvent, SubscriptionEvent, SubscriptionOperation,
};
use serde::{Deserialize, Serialize};
use token_issuer::{TokenIssuer, TokenStore, TokenStoreError};
use tracing::{debug, info, warn};

use crate::config::SagaConfig;
use crate::email;
use crate::error::SagaError;
use crate::migration::MigrationBatch;
use crate::ports::{DocumentStore, FeedSink, MessageTransport, Queue};
use crate::report::{SagaReport, StepOutcome};
use crate::retry::{retry, StepCriticality, StepExhausted};
use crate::welcome::{self, WelcomeKind};

/// The named steps of the saga, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaStep {
    EmailCheck,
    Welcome,
    FeedUpdate,
    Migration,
    Notify,
}

impl SagaStep {
    pub const fn name(self) -> &'static str {
        match self {
            SagaStep::EmailCheck => "emailCheck",
            SagaStep::Welcome => "welcome",
            SagaStep::FeedUpdate => "feedUpdate",
            SagaStep::Migration => "migration",
            SagaStep::Notify => "notify",
        }
    }

    /// The retry/propagation policy is driven by this table: exhausting a
    /// required step fails the saga, exhausting a best-effort step only
    /// logs.
    pub const fn criticality(self) -> StepCriticality {
        match self {
            SagaStep::EmailCheck | SagaStep::Welcome => StepCriticality::BestEffort,
            SagaStep::FeedUpdate | SagaStep::Migration | SagaStep::Notify => {
                StepCriticality::Required
            }
        }
    }
}

/// Queue payload for a profile-change notification.
///
/// Consumers dedupe by (fiscalKey, version): the host may re-run the saga
/// after a partial failure, re-enqueueing the same notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChangeNotification {
    pub fiscal_key: String,
    pub version: u64,
    pub operation: Operation,
    pub updated_at: DateTime<Utc>,
}

/// Coordinates the side effects of one profile change.
///
/// All decisions are pure functions of the event plus the outcomes of the
/// steps already run; the clock and RNG live inside the token issuer.
pub struct SagaCoordinator {
    store: Arc<dyn DocumentStore>,
    queue: Arc<dyn Queue>,
    feed: Arc<dyn FeedSink>,
    transport: Arc<dyn MessageTransport>,
    token_store: Arc<dyn TokenStore>,
    issuer: TokenIssuer,
    config: SagaConfig,
}

impl SagaCoordinator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        queue: Arc<dyn Queue>,
        feed: Arc<dyn FeedSink>,
        transport: Arc<dyn MessageTransport>,
        token_store: Arc<dyn TokenStore>,
        issuer: TokenIssuer,
        config: SagaConfig,
    ) -> Self {
        Self {
            store,
            queue,
            feed,
            transport,
            token_store,
            issuer,
            config,
        }
    }

    /// Decode a raw change event and run the saga over it.
    pub async fn run(&self, input: serde_json::Value) -> Result<SagaReport, SagaError> {
        let event: ProfileChangeEvent =
            serde_json::from_value(input).map_err(|err| SagaError::InvalidEvent(err.to_string()))?;
        self.run_event(&event).await
    }

    /// Run the saga over an already-decoded event.
    pub async fn run_event(&self, event: &ProfileChangeEvent) -> Result<SagaReport, SagaError> {
        let operation = event.operation();
        let mut report = SagaReport::new(operation);
        info!(
            fiscal_key = %event.new_profile.fiscal_key,
            operation = ?operation,
            version = event.new_profile.version,
            "profile change saga started"
        );

        self.email_check(event, &mut report).await?;
        self.welcome(event, &mut report).await?;
        self.feed_update(event, &mut report).await?;
        self.migration(event, &mut report).await?;
        self.notify(event, &mut report).await?;

        info!(
            fiscal_key = %event.new_profile.fiscal_key,
            feed_events = report.feed_events.len(),
            "profile change saga done"
        );
        Ok(report)
    }

    /// Route an exhausted step through the criticality table.
    fn absorb(&self, step: SagaStep, err: StepExhausted) -> Result<(), SagaError> {
        match step.criticality() {
            StepCriticality::BestEffort => {
                warn!(step = step.name(), error = %err, "best-effort step failed, saga continues");
                Ok(())
            }
            StepCriticality::Required => Err(SagaError::Step(err)),
        }
    }

    /// EmailCheck: on an update that changed the email, issue a validation
    /// token and send the validation email. Email issues never block the
    /// rest of the saga.
    async fn email_check(
        &self,
        event: &ProfileChangeEvent,
        report: &mut SagaReport,
    ) -> Result<(), SagaError> {
        let Some(old) = event.old_profile.as_ref() else {
            return Ok(());
        };
        let new_email = match event.new_profile.email.as_deref() {
            Some(address) if event.new_profile.email != old.email => address,
            _ => return Ok(()),
        };

        let fiscal_key = event.new_profile.fiscal_key.as_str();
        let issued = match retry(&self.config.retry, "issueValidationToken", || {
            // A retried attempt re-issues a fresh token; the earlier one is
            // never used and expires on its own.
            let token = self.issuer.issue(fiscal_key);
            async move {
                self.token_store.insert(&token.entity).await?;
                Ok::<_, TokenStoreError>(token)
            }
        })
        .await
        {
            Ok(token) => token,
            Err(err) => {
                report.email_validation = StepOutcome::Failed;
                return self.absorb(SagaStep::EmailCheck, err);
            }
        };
        debug!(token_id = %issued.token_id, "validation token issued");

        let message = email::validation_message(fiscal_key, new_email, &issued);
        match retry(&self.config.retry, "sendValidationEmail", || {
            self.transport.send(&message)
        })
        .await
        {
            Ok(()) => {
                report.email_validation = StepOutcome::Succeeded;
                Ok(())
            }
            Err(err) => {
                report.email_validation = StepOutcome::Failed;
                self.absorb(SagaStep::EmailCheck, err)
            }
        }
    }

    /// Welcome: on creation, or when the inbox turns on, send the welcome
    /// kinds. Best-effort per kind.
    async fn welcome(
        &self,
        event: &ProfileChangeEvent,
        report: &mut SagaReport,
    ) -> Result<(), SagaError> {
        let applies = match event.old_profile.as_ref() {
            None => true,
            Some(old) => !old.is_inbox_enabled && event.new_profile.is_inbox_enabled,
        };
        if !applies {
            return Ok(());
        }

        for kind in WelcomeKind::kinds(self.config.cashback_enabled) {
            let message = welcome::message(kind, &event.new_profile);
            match retry(&self.config.retry, kind.step_name(), || {
                self.transport.send(&message)
            })
            .await
            {
                Ok(()) => {
                    debug!(kind = ?kind, "welcome message sent");
                    report.welcome_sent.push(kind);
                }
                Err(err) => {
                    report.welcome_failed.push(kind);
                    self.absorb(SagaStep::Welcome, err)?;
                }
            }
        }
        Ok(())
    }

    /// FeedUpdate: derive the mode transition, compute the implied feed
    /// events and publish them. Required.
    async fn feed_update(
        &self,
        event: &ProfileChangeEvent,
        report: &mut SagaReport,
    ) -> Result<(), SagaError> {
        let new = &event.new_profile;
        let events = match event.old_profile.as_ref() {
            // Creation: one profile-level SUBSCRIBED, nothing else applies.
            None => vec![SubscriptionEvent::profile(
                new.fiscal_key.clone(),
                SubscriptionOperation::Subscribed,
                new.version,
                event.updated_at,
            )],
            Some(old) => {
                let change = transition(
                    Some(&old.preferences_settings),
                    Some(new.preferences_settings.mode),
                )?;
                report.mode_change = Some(change);
                self.update_events(event, old, change, report).await?
            }
        };

        for feed_event in events {
            if let Err(err) = retry(&self.config.retry, "publishSubscriptionEvent", || {
                self.feed.publish(&feed_event)
            })
            .await
            {
                self.absorb(SagaStep::FeedUpdate, err)?;
            }
            report.feed_events.push(feed_event);
        }
        Ok(())
    }

    async fn update_events(
        &self,
        event: &ProfileChangeEvent,
        old: &profile_core::Profile,
        change: ModeChange,
        report: &mut SagaReport,
    ) -> Result<Vec<SubscriptionEvent>, SagaError> {
        let new = &event.new_profile;
        match change {
            ModeChange::Unchanged {
                mode: NotificationMode::Legacy,
                ..
            } => {
                let diff = blocked_inbox_diff(
                    &old.blocked_inbox_or_channels,
                    &new.blocked_inbox_or_channels,
                );
                let mut events = Vec::with_capacity(diff.subscribed.len() + diff.unsubscribed.len());
                for service_id in diff.subscribed {
                    events.push(SubscriptionEvent::service(
                        new.fiscal_key.clone(),
                        service_id,
                        SubscriptionOperation::Subscribed,
                        new.version,
                        event.updated_at,
                    ));
                }
                for service_id in diff.unsubscribed {
                    events.push(SubscriptionEvent::service(
                        new.fiscal_key.clone(),
                        service_id,
                        SubscriptionOperation::Unsubscribed,
                        new.version,
                        event.updated_at,
                    ));
                }
                Ok(events)
            }
            ModeChange::Unchanged { .. } => Ok(Vec::new()),
            ModeChange::Changed { from, to, .. } => {
                if from != NotificationMode::Legacy && to != NotificationMode::Legacy {
                    // Switching between AUTO and MANUAL: fetch the
                    // per-service overrides at the prior settings version so
                    // they are known before the profile-level event goes out.
                    // The read does not gate the event.
                    let prior_version = old.preferences_settings.version;
                    match retry(&self.config.retry, "readServicePreferences", || {
                        self.store
                            .service_preferences(&new.fiscal_key, prior_version)
                    })
                    .await
                    {
                        Ok(preferences) => {
                            debug!(
                                count = preferences.len(),
                                prior_version, "service preferences reconciled"
                            );
                            report.reconciled_preferences = Some(preferences.len());
                        }
                        Err(err) => self.absorb(SagaStep::FeedUpdate, err)?,
                    }
                }

                Ok(mode_change_operation(from, to)
                    .map(|operation| {
                        SubscriptionEvent::profile(
                            new.fiscal_key.clone(),
                            operation,
                            new.version,
                            event.updated_at,
                        )
                    })
                    .into_iter()
                    .collect())
            }
        }
    }

    /// Migration: when the profile left LEGACY and had blocked services,
    /// enqueue the converted preference batch. Required.
    async fn migration(
        &self,
        event: &ProfileChangeEvent,
        report: &mut SagaReport,
    ) -> Result<(), SagaError> {
        let Some(change) = report.mode_change else {
            return Ok(());
        };
        if !change.left_legacy() {
            return Ok(());
        }
        let Some(old) = event.old_profile.as_ref() else {
            return Ok(());
        };
        if !old.has_blocked_services() {
            return Ok(());
        }

        let preferences = convert(
            &old.fiscal_key,
            &old.blocked_inbox_or_channels,
            change.version(),
        );
        if preferences.is_empty() {
            // Every key was dropped by validation.
            return Ok(());
        }

        let batch = MigrationBatch {
            fiscal_key: old.fiscal_key.clone(),
            settings_version: change.version(),
            preferences,
        };
        let payload =
            serde_json::to_value(&batch).map_err(|err| SagaError::Encode(err.to_string()))?;
        if let Err(err) = retry(&self.config.retry, "enqueueLegacyMigration", || {
            self.queue.enqueue(&self.config.migration_queue, payload.clone())
        })
        .await
        {
            self.absorb(SagaStep::Migration, err)?;
        }
        info!(
            count = batch.preferences.len(),
            queue = %self.config.migration_queue,
            "legacy migration batch enqueued"
        );
        report.migrated = Some(batch.preferences.len());
        Ok(())
    }

    /// Notify: enqueue a profile-change notification when a destination is
    /// configured. Unconditional on the outcome of prior steps. Required.
    async fn notify(
        &self,
        event: &ProfileChangeEvent,
        report: &mut SagaReport,
    ) -> Result<(), SagaError> {
        let Some(queue_name) = self.config.notify_queue.as_deref() else {
            return Ok(());
        };

        let notification = ProfileChangeNotification {
            fiscal_key: event.new_profile.fiscal_key.clone(),
            version: event.new_profile.version,
            operation: event.operation(),
            updated_at: event.updated_at,
        };
        let payload =
            serde_json::to_value(&notification).map_err(|err| SagaError::Encode(err.to_string()))?;
        if let Err(err) = retry(&self.config.retry, "notifyProfileChange", || {
            self.queue.enqueue(queue_name, payload.clone())
        })
        .await
        {
            self.absorb(SagaStep::Notify, err)?;
        }
        report.notified = true;
        Ok(())
    }
}
