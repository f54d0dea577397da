// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring the real services to the in-memory server.
//!
//! `TestHarness` owns a [`MockSecretApi`], a [`MemoryTokenStore`] and the
//! `SecretService` / `UserService` built on top of them, with a cheap KDF
//! iteration count so tests stay fast.

use std::sync::Arc;
use std::time::Duration;

use keeper_client::{SecretService, UserService};
use keeper_core::{KeeperError, SecretApi, TokenStore, UserApi};
use keeper_crypto::PasswordCodec;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use crate::memory_tokens::MemoryTokenStore;
use crate::mock_api::{MockSecretApi, TEST_TOKEN};

/// PBKDF2 iterations used by harness codecs (the accepted minimum).
pub const TEST_KDF_ITERATIONS: u32 = 1000;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    logged_in: bool,
    kdf_iterations: u32,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            logged_in: true,
            kdf_iterations: TEST_KDF_ITERATIONS,
            timeout: None,
            cancel: None,
        }
    }

    /// Start without a stored session token.
    pub fn logged_out(mut self) -> Self {
        self.logged_in = false;
        self
    }

    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self) -> Result<TestHarness, KeeperError> {
        let api = Arc::new(MockSecretApi::new());
        let tokens = Arc::new(if self.logged_in {
            MemoryTokenStore::with_token(TEST_TOKEN)
        } else {
            MemoryTokenStore::new()
        });
        let codec = PasswordCodec::with_iterations(self.kdf_iterations)?;

        let mut secrets = SecretService::new(
            api.clone() as Arc<dyn SecretApi>,
            tokens.clone() as Arc<dyn TokenStore>,
            codec,
        );
        let mut users = UserService::new(
            api.clone() as Arc<dyn UserApi>,
            tokens.clone() as Arc<dyn TokenStore>,
        );
        if let Some(timeout) = self.timeout {
            secrets = secrets.with_timeout(timeout);
            users = users.with_timeout(timeout);
        }
        if let Some(cancel) = self.cancel {
            secrets = secrets.with_cancellation(cancel.clone());
            users = users.with_cancellation(cancel);
        }

        Ok(TestHarness {
            api,
            tokens,
            secrets,
            users,
        })
    }
}

/// Services under test plus handles on their collaborators.
pub struct TestHarness {
    /// The in-memory server.
    pub api: Arc<MockSecretApi>,
    /// Session token storage.
    pub tokens: Arc<MemoryTokenStore>,
    pub secrets: SecretService,
    pub users: UserService,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Logged-in harness with default settings.
    pub fn new() -> Result<Self, KeeperError> {
        Self::builder().build()
    }
}

/// Wrap a literal as a master password.
pub fn master(password: &str) -> SecretString {
    SecretString::from(password.to_string())
}
