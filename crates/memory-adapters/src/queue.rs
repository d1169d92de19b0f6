//! In-memory named queues.

use std::collections::HashMap;

use async_trait::async_trait;
use profile_saga::{Queue, QueueError};
use tokio::sync::RwLock;

use crate::failure::FailureInjector;

/// Records enqueued payloads per queue name.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    messages: RwLock<HashMap<String, Vec<serde_json::Value>>>,
    failures: FailureInjector,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` enqueues fail transiently.
    pub fn fail_next(&self, n: u32) {
        self.failures.fail_next(n);
    }

    /// Payloads enqueued on `queue`, in order.
    pub async fn messages(&self, queue: &str) -> Vec<serde_json::Value> {
        self.messages
            .read()
            .await
            .get(queue)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Queue for MemoryQueue {
    async fn enqueue(&self, queue: &str, payload: serde_json::Value) -> Result<(), QueueError> {
        if self.failures.take() {
            return Err(QueueError::Transient("injected failure".to_string()));
        }
        self.messages
            .write()
            .await
            .entry(queue.to_string())
            .or_default()
            .push(payload);
        Ok(())
    }
}
