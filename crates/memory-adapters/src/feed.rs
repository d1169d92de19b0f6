//! In-memory subscription-feed sink.

use async_trait::async_trait;
use profile_core::SubscriptionEvent;
use profile_saga::{FeedError, FeedSink};
use tokio::sync::RwLock;

use crate::failure::FailureInjector;

/// Records published subscription events.
#[derive(Debug, Default)]
pub struct MemoryFeed {
    events: RwLock<Vec<SubscriptionEvent>>,
    failures: FailureInjector,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` publishes fail transiently.
    pub fn fail_next(&self, n: u32) {
        self.failures.fail_next(n);
    }

    /// Every event published so far, in order.
    pub async fn events(&self) -> Vec<SubscriptionEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl FeedSink for MemoryFeed {
    async fn publish(&self, event: &SubscriptionEvent) -> Result<(), FeedError> {
        if self.failures.take() {
            return Err(FeedError::Transient("injected failure".to_string()));
        }
        self.events.write().await.push(event.clone());
        Ok(())
    }
}
