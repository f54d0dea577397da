// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from a master password.
//!
//! The iteration count is not recorded in the envelope. A [`KeyDeriver`]
//! configured with a different count than the one used at encryption time
//! derives a different key, and decryption fails with
//! [`KeeperError::AuthenticationFailed`].

use std::num::NonZeroU32;

use keeper_core::KeeperError;
use ring::pbkdf2;
use zeroize::Zeroizing;

use crate::salt::SALT_LEN;

/// Length of a derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Iteration count used when nothing is configured.
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// Lowest iteration count accepted. Counts may be raised, never lowered.
pub const MIN_KDF_ITERATIONS: u32 = 1000;

/// Stretches a password and salt into a 256-bit key.
#[derive(Debug, Clone, Copy)]
pub struct KeyDeriver {
    iterations: NonZeroU32,
}

impl KeyDeriver {
    /// Build a deriver. Counts below [`MIN_KDF_ITERATIONS`] are rejected.
    pub fn new(iterations: u32) -> Result<Self, KeeperError> {
        let iterations = NonZeroU32::new(iterations)
            .filter(|n| n.get() >= MIN_KDF_ITERATIONS)
            .ok_or_else(|| {
                KeeperError::Config(format!(
                    "kdf iteration count must be at least {MIN_KDF_ITERATIONS}, got {iterations}"
                ))
            })?;
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Derive the key for `password` under `salt`.
    ///
    /// Deterministic: the same inputs always give the same key. The result is
    /// wiped from memory when dropped.
    pub fn derive_key(&self, password: &[u8], salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            salt,
            password,
            key.as_mut(),
        );
        key
    }
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self {
            iterations: NonZeroU32::new(DEFAULT_ITERATIONS).unwrap_or(NonZeroU32::MIN),
        }
    }
}
