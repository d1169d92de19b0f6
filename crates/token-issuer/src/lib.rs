//! One-time validation token issuance.
//!
//! The email sub-workflow asks [`TokenIssuer`] for a token, persists the
//! resulting [`TokenEntity`] through a [`TokenStore`], and embeds the raw
//! validator in the link it mails out. Only the sha256 of the validator is
//! ever stored; a presented validator proves possession by hashing back to
//! the stored row key before the expiry.
//!
//! Randomness and the clock live entirely inside this crate so the saga
//! coordinator itself stays deterministic under workflow replay.

mod store;
mod token;

pub use store::{TokenStore, TokenStoreError};
pub use token::{hash_validator, validate, IssuedToken, TokenEntity, TokenIssuer};
