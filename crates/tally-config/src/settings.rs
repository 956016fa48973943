//! Validated settings structures

use crate::schema::{RawConfig, RawServiceConfig};
use std::path::PathBuf;
use std::time::Duration;
use tally_util::Username;

/// Validated settings ready for use by the daemon
#[derive(Debug, Clone)]
pub struct Settings {
    /// Service configuration
    pub service: ServiceConfig,

    /// Fixed credential table
    pub users: Vec<UserCredential>,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let users = raw
            .users
            .into_iter()
            .map(|u| UserCredential {
                name: Username::new(u.name),
                password: u.password,
            })
            .collect();

        Self {
            service: ServiceConfig::from_raw(raw.service),
            users,
        }
    }

    /// Check a username/password pair against the credential table
    pub fn lookup_user(&self, name: &str, password: &str) -> bool {
        self.users
            .iter()
            .any(|u| u.name.as_str() == name && u.password == password)
    }

    /// All configured usernames
    pub fn usernames(&self) -> Vec<Username> {
        self.users.iter().map(|u| u.name.clone()).collect()
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: String,
    pub data_dir: PathBuf,
    pub tick_interval: Duration,
    pub snapshot_hours: Vec<u32>,
    pub snapshot_minute_window: u32,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: raw.listen_addr.unwrap_or(defaults.listen_addr),
            data_dir: raw.data_dir.unwrap_or(defaults.data_dir),
            tick_interval: raw
                .tick_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.tick_interval),
            snapshot_hours: raw.snapshot_hours.unwrap_or(defaults.snapshot_hours),
            snapshot_minute_window: raw
                .snapshot_minute_window
                .unwrap_or(defaults.snapshot_minute_window),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            data_dir: PathBuf::from("/var/lib/tallyd"),
            tick_interval: Duration::from_secs(60),
            snapshot_hours: vec![3, 6, 9, 12, 15, 18, 21],
            snapshot_minute_window: 1,
        }
    }
}

/// One entry of the fixed credential table
#[derive(Debug, Clone)]
pub struct UserCredential {
    pub name: Username,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RawUser;

    fn make_raw() -> RawConfig {
        RawConfig {
            config_version: 1,
            service: RawServiceConfig::default(),
            users: vec![
                RawUser {
                    name: "mikel".into(),
                    password: "1234".into(),
                },
                RawUser {
                    name: "ana".into(),
                    password: "5678".into(),
                },
            ],
        }
    }

    #[test]
    fn lookup_user_checks_both_name_and_password() {
        let settings = Settings::from_raw(make_raw());

        assert!(settings.lookup_user("mikel", "1234"));
        assert!(!settings.lookup_user("mikel", "5678"));
        assert!(!settings.lookup_user("eneko", "1234"));
    }

    #[test]
    fn defaults_applied_when_service_table_empty() {
        let settings = Settings::from_raw(make_raw());

        assert_eq!(settings.service.listen_addr, "127.0.0.1:3000");
        assert_eq!(settings.service.tick_interval, Duration::from_secs(60));
        assert_eq!(settings.service.snapshot_minute_window, 1);
    }
}
