// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token store kept in memory.

use std::sync::Mutex;

use keeper_core::{AuthToken, KeeperError, TokenStore};

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(AuthToken::new(token))),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.lock().map(|t| t.is_some()).unwrap_or(false)
    }
}

fn poisoned<T>(_: T) -> KeeperError {
    KeeperError::TokenUnavailable("token store lock poisoned".to_string())
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<AuthToken, KeeperError> {
        self.token
            .lock()
            .map_err(poisoned)?
            .clone()
            .ok_or_else(|| KeeperError::TokenUnavailable("not logged in".to_string()))
    }

    fn save(&self, token: &AuthToken) -> Result<(), KeeperError> {
        *self.token.lock().map_err(poisoned)? = Some(token.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), KeeperError> {
        *self.token.lock().map_err(poisoned)? = None;
        Ok(())
    }
}
