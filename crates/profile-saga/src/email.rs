//! The email-validation sub-workflow's outgoing message.

use token_issuer::IssuedToken;

use crate::message::{MessageKind, OutboundMessage};

/// Link payload embedded in the validation email: `{tokenId}:{validator}`.
///
/// The confirmation endpoint splits on the colon, looks the entity up by
/// token id and checks that the validator hashes to the stored row key.
pub fn validation_link(token: &IssuedToken) -> String {
    format!("{}:{}", token.token_id, token.validator)
}

/// Build the validation email for a freshly issued token.
pub fn validation_message(fiscal_key: &str, email: &str, token: &IssuedToken) -> OutboundMessage {
    OutboundMessage {
        fiscal_key: fiscal_key.to_string(),
        email: Some(email.to_string()),
        kind: MessageKind::EmailValidation,
        subject: "Validate your email address".to_string(),
        body: format!(
            "Confirm your new email address by opening this link:\n\n{}",
            validation_link(token)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use token_issuer::TokenIssuer;

    #[test]
    fn test_link_carries_id_and_validator() {
        let token = TokenIssuer::default().issue("AAABBB80A01C123D");
        let link = validation_link(&token);

        let (id, validator) = link.split_once(':').unwrap();
        assert_eq!(id, token.token_id);
        assert_eq!(validator, token.validator);
    }

    #[test]
    fn test_message_addresses_the_new_email() {
        let token = TokenIssuer::default().issue("AAABBB80A01C123D");
        let message = validation_message("AAABBB80A01C123D", "new@example.com", &token);

        assert_eq!(message.kind, MessageKind::EmailValidation);
        assert_eq!(message.email.as_deref(), Some("new@example.com"));
        assert!(message.body.contains(&validation_link(&token)));
    }
}
