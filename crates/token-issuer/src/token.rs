//! Token generation and validation.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default token lifetime: 30 days.
const DEFAULT_TTL_DAYS: i64 = 30;

/// Random bytes in a validator. Well above the 12-byte entropy floor.
const VALIDATOR_BYTES: usize = 24;

/// Random suffix bytes appended to the millisecond prefix of a token id.
const TOKEN_ID_SUFFIX_BYTES: usize = 8;

fn to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Sha256 of a validator, hex-encoded: the only form that may be stored.
pub fn hash_validator(validator: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(validator.as_bytes());
    to_hex(&hasher.finalize())
}

/// The persisted shape of a token. Never carries the raw validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEntity {
    /// Lookup key: the time-sortable token id.
    pub partition_key: String,
    /// sha256 of the validator, hex-encoded.
    pub row_key: String,
    /// Identity key of the subject the token was issued for.
    pub fiscal_key: String,
    /// The token is valid strictly before this instant.
    pub invalid_after: DateTime<Utc>,
}

/// A freshly issued token. The `validator` exists only here; callers embed
/// it in the outgoing link and drop it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token_id: String,
    pub validator: String,
    pub entity: TokenEntity,
}

/// Issues one-time validation tokens with an expiry.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    ttl: Duration,
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self {
            ttl: Duration::days(DEFAULT_TTL_DAYS),
        }
    }
}

impl TokenIssuer {
    /// An issuer with a custom token lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Issue a token for `fiscal_key`.
    ///
    /// The id is time-sortable (millisecond prefix plus a random suffix),
    /// the validator is fresh entropy. Re-issuing on a retried step is safe:
    /// the earlier token is simply never used and expires on its own.
    pub fn issue(&self, fiscal_key: &str) -> IssuedToken {
        self.issue_at(fiscal_key, Utc::now())
    }

    fn issue_at(&self, fiscal_key: &str, now: DateTime<Utc>) -> IssuedToken {
        let mut rng = rand::thread_rng();

        let mut suffix = [0u8; TOKEN_ID_SUFFIX_BYTES];
        rng.fill_bytes(&mut suffix);
        let token_id = format!("{:016x}{}", now.timestamp_millis(), to_hex(&suffix));

        let mut secret = [0u8; VALIDATOR_BYTES];
        rng.fill_bytes(&mut secret);
        let validator = to_hex(&secret);

        let entity = TokenEntity {
            partition_key: token_id.clone(),
            row_key: hash_validator(&validator),
            fiscal_key: fiscal_key.to_string(),
            invalid_after: now + self.ttl,
        };

        IssuedToken {
            token_id,
            validator,
            entity,
        }
    }
}

/// Check a presented validator against a stored entity at instant `now`.
pub fn validate(entity: &TokenEntity, validator: &str, now: DateTime<Utc>) -> bool {
    entity.row_key == hash_validator(validator) && now < entity.invalid_after
}
