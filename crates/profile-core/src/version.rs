//! Optimistic-concurrency guard for profile writes.

use crate::error::ConflictError;
use crate::model::Profile;

/// Check that a write targets the current profile version.
///
/// No side effects; the caller owns the read-then-check-then-write
/// sequence and must run this before attempting any mutation.
pub fn check_version(requested: u64, current: &Profile) -> Result<(), ConflictError> {
    if requested == current.version {
        Ok(())
    } else {
        Err(ConflictError::Version {
            requested,
            current: current.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PreferencesSettings;

    fn profile_at_version(version: u64) -> Profile {
        Profile {
            fiscal_key: "AAABBB80A01C123D".to_string(),
            version,
            email: None,
            is_email_validated: false,
            is_inbox_enabled: true,
            is_webhook_enabled: false,
            is_email_enabled: false,
            preferences_settings: PreferencesSettings::legacy(),
            blocked_inbox_or_channels: Default::default(),
        }
    }

    #[test]
    fn test_matching_version_passes() {
        for version in [0, 1, 42] {
            assert!(check_version(version, &profile_at_version(version)).is_ok());
        }
    }

    #[test]
    fn test_mismatched_version_conflicts() {
        let current = profile_at_version(3);
        assert_eq!(
            check_version(2, &current),
            Err(ConflictError::Version {
                requested: 2,
                current: 3
            })
        );
        assert_eq!(
            check_version(4, &current),
            Err(ConflictError::Version {
                requested: 4,
                current: 3
            })
        );
    }
}
