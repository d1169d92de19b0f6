//! Welcome-message kinds and templates.

use profile_core::Profile;
use serde::{Deserialize, Serialize};

use crate::message::{MessageKind, OutboundMessage};

const WELCOME_SUBJECT: &str = "Welcome!";
const WELCOME_BODY: &str = "Your profile is ready. Messages from the services \
you use will arrive in your inbox from now on.";

const HOWTO_SUBJECT: &str = "Getting started";
const HOWTO_BODY: &str = "A quick tour of your inbox: open a message to read \
it, and manage which services can reach you from the preferences page.";

const CASHBACK_SUBJECT: &str = "Cashback is available";
const CASHBACK_BODY: &str = "You can now activate the cashback programme from \
your profile.";

/// The welcome-message kinds, in send order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WelcomeKind {
    Welcome,
    Howto,
    Cashback,
}

impl WelcomeKind {
    /// The kinds to send, in order. CASHBACK only when configured.
    pub fn kinds(cashback_enabled: bool) -> Vec<WelcomeKind> {
        let mut kinds = vec![WelcomeKind::Welcome, WelcomeKind::Howto];
        if cashback_enabled {
            kinds.push(WelcomeKind::Cashback);
        }
        kinds
    }

    /// Step name used by the retry engine and its logs.
    pub(crate) fn step_name(self) -> &'static str {
        match self {
            WelcomeKind::Welcome => "sendWelcomeMessage",
            WelcomeKind::Howto => "sendHowtoMessage",
            WelcomeKind::Cashback => "sendCashbackMessage",
        }
    }

    fn template(self) -> (&'static str, &'static str) {
        match self {
            WelcomeKind::Welcome => (WELCOME_SUBJECT, WELCOME_BODY),
            WelcomeKind::Howto => (HOWTO_SUBJECT, HOWTO_BODY),
            WelcomeKind::Cashback => (CASHBACK_SUBJECT, CASHBACK_BODY),
        }
    }
}

/// Build one welcome message for a profile.
pub(crate) fn message(kind: WelcomeKind, profile: &Profile) -> OutboundMessage {
    let (subject, body) = kind.template();
    OutboundMessage {
        fiscal_key: profile.fiscal_key.clone(),
        email: None,
        kind: MessageKind::from(kind),
        subject: subject.to_string(),
        body: body.to_string(),
    }
}
