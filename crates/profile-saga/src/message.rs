//! Outgoing messages handed to the transport.

use serde::{Deserialize, Serialize};

use crate::welcome::WelcomeKind;

/// What a message is about, for routing and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Welcome,
    Howto,
    Cashback,
    EmailValidation,
}

impl From<WelcomeKind> for MessageKind {
    fn from(kind: WelcomeKind) -> Self {
        match kind {
            WelcomeKind::Welcome => MessageKind::Welcome,
            WelcomeKind::Howto => MessageKind::Howto,
            WelcomeKind::Cashback => MessageKind::Cashback,
        }
    }
}

/// A message handed to the email/push transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub fiscal_key: String,
    /// Delivery address for email messages; push messages carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub kind: MessageKind,
    pub subject: String,
    pub body: String,
}
