// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote API traits.

use async_trait::async_trait;

use crate::error::KeeperError;
use crate::types::{AccountCredentials, AuthToken, SecretId, SecretRequest, SecretResponse};

/// Client for the remote secret store.
///
/// Implementations only ever see envelopes in `SecretRequest::data`; they
/// never receive the master password.
#[async_trait]
pub trait SecretApi: Send + Sync + 'static {
    /// Store a new secret and return the server's record (with its new id).
    async fn create(
        &self,
        request: &SecretRequest,
        token: &AuthToken,
    ) -> Result<SecretResponse, KeeperError>;

    /// Fetch one secret with its encrypted `data`.
    async fn get(&self, id: SecretId, token: &AuthToken) -> Result<SecretResponse, KeeperError>;

    /// Replace a secret wholesale.
    async fn update(
        &self,
        id: SecretId,
        request: &SecretRequest,
        token: &AuthToken,
    ) -> Result<SecretResponse, KeeperError>;

    /// Delete a secret. Returns the deleted record when the server echoes it.
    async fn delete(
        &self,
        id: SecretId,
        token: &AuthToken,
    ) -> Result<Option<SecretResponse>, KeeperError>;
}

/// Client for account registration and login.
#[async_trait]
pub trait UserApi: Send + Sync + 'static {
    async fn register(&self, account: &AccountCredentials) -> Result<(), KeeperError>;

    /// Exchange account credentials for a bearer token.
    async fn login(&self, account: &AccountCredentials) -> Result<AuthToken, KeeperError>;
}
