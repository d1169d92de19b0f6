//! The notification-preferences mode state machine.
//!
//! Three states (LEGACY, AUTO, MANUAL) and one companion counter. Allowed
//! transitions: LEGACY→AUTO, LEGACY→MANUAL, AUTO→MANUAL, MANUAL→AUTO.
//! There is no path back to LEGACY, and once opted in a profile cannot
//! omit its settings from a write.

use crate::error::ConflictError;
use crate::model::{NotificationMode, PreferencesSettings, LEGACY_SETTINGS_VERSION};

/// Outcome of applying a requested mode against the current settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    /// No transition happened; settings stay exactly as they were.
    Unchanged {
        mode: NotificationMode,
        version: i64,
    },
    /// An allowed transition; `version` is the incremented settings version.
    Changed {
        from: NotificationMode,
        to: NotificationMode,
        version: i64,
    },
}

impl ModeChange {
    /// The mode after the change.
    pub fn mode(&self) -> NotificationMode {
        match self {
            ModeChange::Unchanged { mode, .. } => *mode,
            ModeChange::Changed { to, .. } => *to,
        }
    }

    /// The settings version after the change.
    pub fn version(&self) -> i64 {
        match self {
            ModeChange::Unchanged { version, .. } | ModeChange::Changed { version, .. } => *version,
        }
    }

    /// Whether this change left LEGACY for an opted-in mode.
    pub fn left_legacy(&self) -> bool {
        matches!(
            self,
            ModeChange::Changed {
                from: NotificationMode::Legacy,
                ..
            }
        )
    }
}

/// Apply `requested` against the current settings.
///
/// `old` absent means a brand-new profile, treated as (LEGACY, -1).
/// `requested` absent means "keep current", which is only valid while the
/// profile is still in LEGACY mode. Pure and deterministic: safe to re-run
/// during workflow replay.
pub fn transition(
    old: Option<&PreferencesSettings>,
    requested: Option<NotificationMode>,
) -> Result<ModeChange, ConflictError> {
    let (old_mode, old_version) = old
        .map(|settings| (settings.mode, settings.version))
        .unwrap_or((NotificationMode::Legacy, LEGACY_SETTINGS_VERSION));

    match requested {
        None => match old_mode {
            NotificationMode::Legacy => Ok(ModeChange::Unchanged {
                mode: old_mode,
                version: old_version,
            }),
            current => Err(ConflictError::SettingsRequired { current }),
        },
        Some(NotificationMode::Legacy) if old_mode != NotificationMode::Legacy => {
            Err(ConflictError::LegacyDowngrade { from: old_mode })
        }
        Some(mode) if mode == old_mode => Ok(ModeChange::Unchanged {
            mode,
            version: old_version,
        }),
        Some(mode) => Ok(ModeChange::Changed {
            from: old_mode,
            to: mode,
            version: old_version + 1,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NotificationMode::{Auto, Legacy, Manual};

    fn settings(mode: NotificationMode, version: i64) -> PreferencesSettings {
        PreferencesSettings { mode, version }
    }

    #[test]
    fn test_legacy_noop_keeps_sentinel() {
        let result = transition(Some(&settings(Legacy, -1)), Some(Legacy)).unwrap();
        assert_eq!(
            result,
            ModeChange::Unchanged {
                mode: Legacy,
                version: -1
            }
        );
        assert!(!result.left_legacy());
    }

    #[test]
    fn test_opting_in_starts_counter_at_zero() {
        let result = transition(Some(&settings(Legacy, -1)), Some(Auto)).unwrap();
        assert_eq!(
            result,
            ModeChange::Changed {
                from: Legacy,
                to: Auto,
                version: 0
            }
        );
        assert!(result.left_legacy());
    }

    #[test]
    fn test_auto_to_manual_increments() {
        let result = transition(Some(&settings(Auto, 0)), Some(Manual)).unwrap();
        assert_eq!(
            result,
            ModeChange::Changed {
                from: Auto,
                to: Manual,
                version: 1
            }
        );
        assert!(!result.left_legacy());
    }

    #[test]
    fn test_manual_to_auto_increments() {
        let result = transition(Some(&settings(Manual, 3)), Some(Auto)).unwrap();
        assert_eq!(
            result,
            ModeChange::Changed {
                from: Manual,
                to: Auto,
                version: 4
            }
        );
    }

    #[test]
    fn test_no_path_back_to_legacy() {
        assert_eq!(
            transition(Some(&settings(Auto, 2)), Some(Legacy)),
            Err(ConflictError::LegacyDowngrade { from: Auto })
        );
        assert_eq!(
            transition(Some(&settings(Manual, 1)), Some(Legacy)),
            Err(ConflictError::LegacyDowngrade { from: Manual })
        );
    }

    #[test]
    fn test_opted_in_must_resend_settings() {
        assert_eq!(
            transition(Some(&settings(Auto, 2)), None),
            Err(ConflictError::SettingsRequired { current: Auto })
        );
        assert_eq!(
            transition(Some(&settings(Manual, 0)), None),
            Err(ConflictError::SettingsRequired { current: Manual })
        );
    }

    #[test]
    fn test_legacy_absent_request_is_noop() {
        let result = transition(Some(&settings(Legacy, -1)), None).unwrap();
        assert_eq!(
            result,
            ModeChange::Unchanged {
                mode: Legacy,
                version: -1
            }
        );
    }

    #[test]
    fn test_missing_old_settings_treated_as_legacy() {
        let result = transition(None, Some(Manual)).unwrap();
        assert_eq!(
            result,
            ModeChange::Changed {
                from: Legacy,
                to: Manual,
                version: 0
            }
        );

        let noop = transition(None, None).unwrap();
        assert_eq!(
            noop,
            ModeChange::Unchanged {
                mode: Legacy,
                version: -1
            }
        );
    }

    #[test]
    fn test_opted_in_noop_keeps_version() {
        let result = transition(Some(&settings(Manual, 5)), Some(Manual)).unwrap();
        assert_eq!(
            result,
            ModeChange::Unchanged {
                mode: Manual,
                version: 5
            }
        );
    }
}
