// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Keeper client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Keeper configuration.
///
/// Loaded once at startup and passed by reference to whatever needs it.
/// There is no global instance.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeeperConfig {
    /// Remote Secret API settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Local session (bearer token) settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Envelope encryption settings.
    #[serde(default)]
    pub crypto: CryptoConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote Secret API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Base URL of the server, e.g. `https://keeper.example.com:8443`.
    #[serde(default = "default_server_address")]
    pub address: String,

    /// Per-request deadline in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Accept self-signed or otherwise invalid server certificates.
    /// Only for local development servers.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_server_address(),
            request_timeout_secs: default_request_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

fn default_server_address() -> String {
    "https://localhost:8443".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Local session configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Token file location. `None` uses `<data_dir>/keeper/token`.
    #[serde(default)]
    pub token_path: Option<String>,
}

impl SessionConfig {
    /// Resolve the token file path, falling back to the XDG data directory.
    pub fn resolved_token_path(&self) -> PathBuf {
        match &self.token_path {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .map(|d| d.join("keeper"))
                .unwrap_or_else(|| PathBuf::from(".keeper"))
                .join("token"),
        }
    }
}

/// Envelope encryption configuration.
///
/// The iteration count is not stored inside envelopes, so every client that
/// reads a given account's secrets must use the same value.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CryptoConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (minimum 1000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    600_000 // OWASP 2023 guidance for PBKDF2-HMAC-SHA256
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
