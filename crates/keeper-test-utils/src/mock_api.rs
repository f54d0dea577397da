// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory stand-in for the Keeper server.
//!
//! `MockSecretApi` implements both `SecretApi` and `UserApi`, keeps every
//! record exactly as it was sent, and checks bearer tokens the way the real
//! server does. Tests can inspect what the "server" stored to prove that it
//! only ever received envelopes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

use keeper_core::{
    AccountCredentials, AuthToken, KeeperError, SecretApi, SecretId, SecretRequest,
    SecretResponse, UserApi,
};

/// Token accepted by a fresh mock without a login round trip.
pub const TEST_TOKEN: &str = "test-token";

/// Failure to inject into the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Unauthorized,
    Transport,
    Server,
}

impl MockFailure {
    fn into_error(self) -> KeeperError {
        match self {
            Self::Unauthorized => KeeperError::Unauthorized { status: 401 },
            Self::Transport => KeeperError::Transport {
                message: "connection refused".to_string(),
                source: None,
            },
            Self::Server => KeeperError::Api {
                status: 500,
                message: "internal error".to_string(),
            },
        }
    }
}

#[derive(Default)]
struct State {
    secrets: HashMap<SecretId, SecretResponse>,
    accounts: HashMap<String, String>,
    tokens: HashSet<String>,
    requests: Vec<SecretRequest>,
    next_failure: Option<MockFailure>,
    latency: Option<Duration>,
    echo_deletes: bool,
}

/// In-memory Secret API and user API.
#[derive(Clone)]
pub struct MockSecretApi {
    state: Arc<Mutex<State>>,
}

impl MockSecretApi {
    /// A mock that accepts [`TEST_TOKEN`] and echoes deleted records.
    pub fn new() -> Self {
        let state = State {
            tokens: HashSet::from([TEST_TOKEN.to_string()]),
            echo_deletes: true,
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Delay every call by `latency` before answering.
    pub async fn set_latency(&self, latency: Duration) {
        self.state.lock().await.latency = Some(latency);
    }

    /// Fail the next call with `failure`, then behave normally again.
    pub async fn fail_next(&self, failure: MockFailure) {
        self.state.lock().await.next_failure = Some(failure);
    }

    /// Answer DELETE with an empty body instead of the deleted record.
    pub async fn set_echo_deletes(&self, echo: bool) {
        self.state.lock().await.echo_deletes = echo;
    }

    /// Record as stored server-side (envelope in `data`).
    pub async fn stored(&self, id: SecretId) -> Option<SecretResponse> {
        self.state.lock().await.secrets.get(&id).cloned()
    }

    /// Bodies of every create and update call, in order.
    pub async fn requests(&self) -> Vec<SecretRequest> {
        self.state.lock().await.requests.clone()
    }

    pub async fn secret_count(&self) -> usize {
        self.state.lock().await.secrets.len()
    }

    /// Overwrite the stored envelope of `id`, e.g. to simulate tampering.
    pub async fn replace_data(&self, id: SecretId, data: Vec<u8>) {
        if let Some(record) = self.state.lock().await.secrets.get_mut(&id) {
            record.data = data;
        }
    }

    async fn enter(&self, token: Option<&AuthToken>) -> Result<(), KeeperError> {
        let latency = self.state.lock().await.latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.lock().await;
        if let Some(failure) = state.next_failure.take() {
            return Err(failure.into_error());
        }
        if let Some(token) = token
            && !state.tokens.contains(token.expose())
        {
            return Err(KeeperError::Unauthorized { status: 401 });
        }
        Ok(())
    }
}

impl Default for MockSecretApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretApi for MockSecretApi {
    async fn create(
        &self,
        request: &SecretRequest,
        token: &AuthToken,
    ) -> Result<SecretResponse, KeeperError> {
        self.enter(Some(token)).await?;

        let now = Utc::now();
        let record = SecretResponse {
            id: SecretId::new_v4(),
            name: request.name.clone(),
            kind: request.kind,
            note: request.note.clone(),
            data: request.data.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };

        let mut state = self.state.lock().await;
        state.requests.push(request.clone());
        state.secrets.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: SecretId, token: &AuthToken) -> Result<SecretResponse, KeeperError> {
        self.enter(Some(token)).await?;
        self.state
            .lock()
            .await
            .secrets
            .get(&id)
            .cloned()
            .ok_or_else(|| KeeperError::NotFound(format!("secret {id}")))
    }

    async fn update(
        &self,
        id: SecretId,
        request: &SecretRequest,
        token: &AuthToken,
    ) -> Result<SecretResponse, KeeperError> {
        self.enter(Some(token)).await?;

        let mut state = self.state.lock().await;
        state.requests.push(request.clone());
        let record = state
            .secrets
            .get_mut(&id)
            .ok_or_else(|| KeeperError::NotFound(format!("secret {id}")))?;
        record.name = request.name.clone();
        record.kind = request.kind;
        record.note = request.note.clone();
        record.data = request.data.clone();
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }

    async fn delete(
        &self,
        id: SecretId,
        token: &AuthToken,
    ) -> Result<Option<SecretResponse>, KeeperError> {
        self.enter(Some(token)).await?;

        let mut state = self.state.lock().await;
        let removed = state
            .secrets
            .remove(&id)
            .ok_or_else(|| KeeperError::NotFound(format!("secret {id}")))?;
        Ok(state.echo_deletes.then_some(removed))
    }
}

#[async_trait]
impl UserApi for MockSecretApi {
    async fn register(&self, account: &AccountCredentials) -> Result<(), KeeperError> {
        self.enter(None).await?;

        let mut state = self.state.lock().await;
        if state.accounts.contains_key(&account.login) {
            return Err(KeeperError::Conflict(format!(
                "login {} already exists",
                account.login
            )));
        }
        state.accounts.insert(
            account.login.clone(),
            account.password.expose_secret().to_string(),
        );
        Ok(())
    }

    async fn login(&self, account: &AccountCredentials) -> Result<AuthToken, KeeperError> {
        self.enter(None).await?;

        let mut state = self.state.lock().await;
        match state.accounts.get(&account.login) {
            Some(password) if password == account.password.expose_secret() => {
                let token = format!("token-{}", uuid::Uuid::new_v4());
                state.tokens.insert(token.clone());
                Ok(AuthToken::new(token))
            }
            _ => Err(KeeperError::Unauthorized { status: 401 }),
        }
    }
}
