//! Configuration validation

use crate::schema::RawConfig;
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("User '{user}': {message}")]
    UserError { user: String, message: String },

    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.users.is_empty() {
        errors.push(ValidationError::GlobalError(
            "at least one user must be configured".into(),
        ));
    }

    // Check for duplicate usernames
    let mut seen_names = HashSet::new();
    for user in &config.users {
        if !seen_names.insert(&user.name) {
            errors.push(ValidationError::DuplicateUsername(user.name.clone()));
        }
    }

    for user in &config.users {
        if user.name.is_empty() {
            errors.push(ValidationError::UserError {
                user: user.name.clone(),
                message: "name cannot be empty".into(),
            });
        }
        if user.password.is_empty() {
            errors.push(ValidationError::UserError {
                user: user.name.clone(),
                message: "password cannot be empty".into(),
            });
        }
    }

    if let Some(hours) = &config.service.snapshot_hours {
        for hour in hours {
            if *hour > 23 {
                errors.push(ValidationError::GlobalError(format!(
                    "snapshot hour {hour} out of range (0-23)"
                )));
            }
        }
    }

    if let Some(window) = config.service.snapshot_minute_window {
        if window == 0 || window > 59 {
            errors.push(ValidationError::GlobalError(format!(
                "snapshot_minute_window {window} out of range (1-59)"
            )));
        }
    }

    if let Some(secs) = config.service.tick_interval_secs {
        if secs == 0 {
            errors.push(ValidationError::GlobalError(
                "tick_interval_secs must be at least 1".into(),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawServiceConfig, RawUser};

    fn base_config() -> RawConfig {
        RawConfig {
            config_version: 1,
            service: RawServiceConfig::default(),
            users: vec![RawUser {
                name: "mikel".into(),
                password: "1234".into(),
            }],
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&base_config()).is_empty());
    }

    #[test]
    fn duplicate_usernames_rejected() {
        let mut config = base_config();
        config.users.push(RawUser {
            name: "mikel".into(),
            password: "other".into(),
        });

        let errors = validate_config(&config);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateUsername(_))));
    }

    #[test]
    fn out_of_range_snapshot_hour_rejected() {
        let mut config = base_config();
        config.service.snapshot_hours = Some(vec![6, 24]);

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn zero_minute_window_rejected() {
        let mut config = base_config();
        config.service.snapshot_minute_window = Some(0);

        let errors = validate_config(&config);
        assert!(!errors.is_empty());
    }

    #[test]
    fn zero_tick_interval_rejected() {
        let mut config = base_config();
        config.service.tick_interval_secs = Some(0);

        let errors = validate_config(&config);
        assert!(!errors.is_empty());
    }
}
