//! Per-step outcome record returned by the coordinator.

use profile_core::{ModeChange, Operation, SubscriptionEvent};

use crate::welcome::WelcomeKind;

/// Outcome of one best-effort step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step ran and succeeded.
    Succeeded,
    /// The step did not apply to this event.
    Skipped,
    /// The step exhausted its retries; the saga continued anyway.
    Failed,
}

/// What one saga run did, step by step.
///
/// Tests and callers assert on this instead of on logs; it is also the
/// record a workflow host can persist per execution.
#[derive(Debug)]
pub struct SagaReport {
    pub operation: Operation,
    /// Outcome of the email-validation sub-workflow.
    pub email_validation: StepOutcome,
    pub welcome_sent: Vec<WelcomeKind>,
    pub welcome_failed: Vec<WelcomeKind>,
    /// The mode transition derived from the event, for updates.
    pub mode_change: Option<ModeChange>,
    /// Feed events actually published, in order.
    pub feed_events: Vec<SubscriptionEvent>,
    /// Per-service preferences read back during an AUTO/MANUAL switch.
    pub reconciled_preferences: Option<usize>,
    /// Size of the migration batch enqueued, when migration fired.
    pub migrated: Option<usize>,
    /// Whether a profile-change notification was enqueued.
    pub notified: bool,
}

impl SagaReport {
    pub(crate) fn new(operation: Operation) -> Self {
        Self {
            operation,
            email_validation: StepOutcome::Skipped,
            welcome_sent: Vec::new(),
            welcome_failed: Vec::new(),
            mode_change: None,
            feed_events: Vec::new(),
            reconciled_preferences: None,
            migrated: None,
            notified: false,
        }
    }
}
