// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local persistence of the bearer token.

use crate::error::KeeperError;
use crate::types::AuthToken;

/// Where the session token lives between CLI invocations.
///
/// All failures surface as [`KeeperError::TokenUnavailable`].
pub trait TokenStore: Send + Sync + 'static {
    fn load(&self) -> Result<AuthToken, KeeperError>;

    fn save(&self, token: &AuthToken) -> Result<(), KeeperError>;

    /// Forget the token. Removing an absent token is not an error.
    fn remove(&self) -> Result<(), KeeperError>;
}
