// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account registration and the local login session.

use std::sync::Arc;
use std::time::Duration;

use keeper_core::{AccountCredentials, KeeperError, TokenStore, UserApi};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{DEFAULT_CALL_TIMEOUT, bounded};

pub struct UserService {
    api: Arc<dyn UserApi>,
    tokens: Arc<dyn TokenStore>,
    timeout: Duration,
    cancel: Option<CancellationToken>,
}

impl UserService {
    pub fn new(api: Arc<dyn UserApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            timeout: DEFAULT_CALL_TIMEOUT,
            cancel: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Create a server account. Does not log in.
    pub async fn register(&self, account: &AccountCredentials) -> Result<(), KeeperError> {
        bounded(self.timeout, self.cancel.as_ref(), self.api.register(account)).await?;
        info!(login = %account.login, "account registered");
        Ok(())
    }

    /// Log in and keep the issued token for later commands.
    pub async fn login(&self, account: &AccountCredentials) -> Result<(), KeeperError> {
        let token = bounded(self.timeout, self.cancel.as_ref(), self.api.login(account)).await?;
        self.tokens.save(&token)?;
        info!(login = %account.login, "logged in");
        Ok(())
    }

    /// Forget the stored token. Succeeds when already logged out.
    pub fn logout(&self) -> Result<(), KeeperError> {
        self.tokens.remove()?;
        info!("logged out");
        Ok(())
    }
}
