// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Keeper password manager.
//!
//! Every message rendered by [`KeeperError`] is safe to print to a terminal:
//! no variant carries plaintext, key material, passwords, or bearer tokens.

use thiserror::Error;

/// The primary error type used across the Keeper crates.
#[derive(Debug, Error)]
pub enum KeeperError {
    /// The OS CSPRNG could not be read. No secure operation is possible.
    #[error("secure random number generator unavailable")]
    RandomnessUnavailable,

    /// The AEAD key could not be constructed (wrong length).
    #[error("cipher initialization failed: {0}")]
    CipherInit(String),

    /// An envelope or sealed buffer is shorter than its fixed header.
    #[error("encrypted data is corrupted: {len} bytes, expected at least {min}")]
    CiphertextTooShort { len: usize, min: usize },

    /// The AEAD tag did not verify: wrong master password or tampered data.
    #[error("incorrect master password or corrupted secret")]
    AuthenticationFailed,

    /// Network or HTTP-level failure talking to the Secret API.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No usable bearer token in the local token store.
    #[error("session unavailable: {0} (run `keeper login`)")]
    TokenUnavailable(String),

    /// The server rejected the bearer token (HTTP 401/403).
    #[error("server rejected the session (status {status}); log in again")]
    Unauthorized { status: u16 },

    /// The server has no secret (or user) under the requested identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server reported a conflict with existing data.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other non-success response from the server.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Encoding or decoding of a payload failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),

    /// A value typed or passed on the command line was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A remote call exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeeperError {
    /// Build a transport error from any source error.
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// True for failures raised by the envelope engine.
    pub fn is_crypto(&self) -> bool {
        matches!(
            self,
            Self::RandomnessUnavailable
                | Self::CipherInit(_)
                | Self::CiphertextTooShort { .. }
                | Self::AuthenticationFailed
        )
    }

    /// True when the user may reasonably retry the same command by hand.
    ///
    /// Decryption failures are never retryable: a different password has to
    /// come from the user.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::TokenUnavailable(_)
        )
    }
}

impl From<serde_json::Error> for KeeperError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failure_reads_as_wrong_password() {
        let msg = KeeperError::AuthenticationFailed.to_string();
        assert_eq!(msg, "incorrect master password or corrupted secret");
    }

    #[test]
    fn unauthorized_is_distinct_from_wrong_password() {
        let api = KeeperError::Unauthorized { status: 401 };
        assert!(!api.is_crypto());
        assert!(KeeperError::AuthenticationFailed.is_crypto());
        assert_ne!(api.to_string(), KeeperError::AuthenticationFailed.to_string());
    }

    #[test]
    fn crypto_errors_are_not_retryable() {
        assert!(!KeeperError::AuthenticationFailed.is_retryable());
        assert!(!KeeperError::CiphertextTooShort { len: 3, min: 32 }.is_retryable());
        assert!(KeeperError::TokenUnavailable("missing".into()).is_retryable());
        assert!(
            KeeperError::Timeout {
                duration: std::time::Duration::from_secs(30)
            }
            .is_retryable()
        );
    }

    #[test]
    fn invalid_input_does_not_read_as_config_error() {
        let msg = KeeperError::InvalidInput("passwords do not match".into()).to_string();
        assert_eq!(msg, "invalid input: passwords do not match");
        assert!(!KeeperError::InvalidInput(String::new()).is_retryable());
    }

    #[test]
    fn too_short_message_reports_lengths() {
        let msg = KeeperError::CiphertextTooShort { len: 5, min: 32 }.to_string();
        assert!(msg.contains('5') && msg.contains("32"), "got: {msg}");
    }
}
