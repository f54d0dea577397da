// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::KeeperConfig;

pub use keeper_crypto::MIN_KDF_ITERATIONS;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &KeeperConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let address = config.server.address.trim();
    if address.is_empty() {
        invalid("server.address must not be empty".to_string());
    } else if !(address.starts_with("https://") || address.starts_with("http://")) {
        invalid(format!(
            "server.address `{address}` must start with https:// or http://"
        ));
    }

    if config.server.request_timeout_secs == 0 {
        invalid("server.request_timeout_secs must be greater than 0".to_string());
    }

    if let Some(path) = &config.session.token_path
        && path.trim().is_empty()
    {
        invalid("session.token_path must not be empty when set".to_string());
    }

    if config.crypto.kdf_iterations < MIN_KDF_ITERATIONS {
        invalid(format!(
            "crypto.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
            config.crypto.kdf_iterations
        ));
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        invalid(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &KeeperConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&KeeperConfig::default()).is_ok());
    }

    #[test]
    fn low_iteration_count_fails() {
        let mut config = KeeperConfig::default();
        config.crypto.kdf_iterations = 999;
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("kdf_iterations"));
    }

    #[test]
    fn minimum_iteration_count_passes() {
        let mut config = KeeperConfig::default();
        config.crypto.kdf_iterations = MIN_KDF_ITERATIONS;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn address_without_scheme_fails() {
        let mut config = KeeperConfig::default();
        config.server.address = "localhost:8443".into();
        assert!(messages(&config)[0].contains("server.address"));
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut config = KeeperConfig::default();
        config.server.address = "  ".into();
        config.server.request_timeout_secs = 0;
        config.session.token_path = Some(String::new());
        config.logging.level = "loud".into();
        assert_eq!(messages(&config).len(), 4);
    }
}
