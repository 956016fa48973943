//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// Fixed user credential table
    #[serde(default)]
    pub users: Vec<RawUser>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// HTTP listen address (default: 127.0.0.1:3000)
    pub listen_addr: Option<String>,

    /// Data directory for the store
    pub data_dir: Option<PathBuf>,

    /// Scheduler tick interval in seconds (default: 60)
    pub tick_interval_secs: Option<u64>,

    /// Hours at which intra-day snapshots fire
    pub snapshot_hours: Option<Vec<u32>>,

    /// Width of the minute window at the start of a snapshot hour
    pub snapshot_minute_window: Option<u32>,
}

/// Raw user credential entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawUser {
    pub name: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
            config_version = 1

            [service]
            listen_addr = "0.0.0.0:8080"
            tick_interval_secs = 30
            snapshot_hours = [6, 12, 18]
            snapshot_minute_window = 2

            [[users]]
            name = "mikel"
            password = "1234"

            [[users]]
            name = "eneko"
            password = "valladares"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.users.len(), 2);
        assert_eq!(config.service.snapshot_hours, Some(vec![6, 12, 18]));
        assert_eq!(config.service.tick_interval_secs, Some(30));
    }

    #[test]
    fn service_table_is_optional() {
        let toml_str = r#"
            config_version = 1

            [[users]]
            name = "ana"
            password = "5678"
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert!(config.service.listen_addr.is_none());
    }
}
