//! In-memory message transport.

use async_trait::async_trait;
use profile_saga::{MessageTransport, OutboundMessage, TransportError};
use tokio::sync::RwLock;

use crate::failure::FailureInjector;

/// Records outbound messages instead of delivering them.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    sent: RwLock<Vec<OutboundMessage>>,
    failures: FailureInjector,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` sends fail transiently.
    pub fn fail_next(&self, n: u32) {
        self.failures.fail_next(n);
    }

    /// Every message sent so far, in order.
    pub async fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl MessageTransport for MemoryTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        if self.failures.take() {
            return Err(TransportError::Transient("injected failure".to_string()));
        }
        self.sent.write().await.push(message.clone());
        Ok(())
    }
}
