// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password envelopes: `salt(32) || nonce(12) || ciphertext || tag(16)`.
//!
//! A fresh salt is drawn for every envelope, so the same password never
//! derives the same key twice. Decrypting needs nothing but the envelope and
//! the password (plus the same KDF iteration count).

use keeper_core::KeeperError;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use zeroize::Zeroizing;

use crate::cipher::{self, NONCE_LEN, TAG_LEN};
use crate::kdf::KeyDeriver;
use crate::salt::{SALT_LEN, generate_salt};

/// Smallest well-formed envelope (empty plaintext).
pub const MIN_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Encrypts and decrypts byte payloads under a master password.
///
/// Stateless apart from the KDF settings: every call re-derives its key and
/// drops it before returning.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordCodec {
    deriver: KeyDeriver,
}

impl PasswordCodec {
    pub fn new(deriver: KeyDeriver) -> Self {
        Self { deriver }
    }

    /// Codec with the given PBKDF2 iteration count.
    pub fn with_iterations(iterations: u32) -> Result<Self, KeeperError> {
        Ok(Self::new(KeyDeriver::new(iterations)?))
    }

    pub fn deriver(&self) -> &KeyDeriver {
        &self.deriver
    }

    /// Seal `plaintext` into a new envelope.
    pub fn encrypt_with_password(
        &self,
        plaintext: &[u8],
        password: &SecretString,
    ) -> Result<Vec<u8>, KeeperError> {
        let salt = generate_salt()?;
        let key = self
            .deriver
            .derive_key(password.expose_secret().as_bytes(), &salt);

        let sealed = cipher::encrypt(plaintext, key.as_ref())?;

        let mut envelope = Vec::with_capacity(SALT_LEN + sealed.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&sealed);

        debug!(
            plaintext_len = plaintext.len(),
            envelope_len = envelope.len(),
            "sealed envelope"
        );
        Ok(envelope)
    }

    /// Open an envelope produced by [`encrypt_with_password`](Self::encrypt_with_password).
    ///
    /// A wrong password and a tampered envelope are indistinguishable and
    /// both fail with [`KeeperError::AuthenticationFailed`].
    pub fn decrypt_with_password(
        &self,
        envelope: &[u8],
        password: &SecretString,
    ) -> Result<Zeroizing<Vec<u8>>, KeeperError> {
        let Some((salt, sealed)) = envelope.split_first_chunk::<SALT_LEN>() else {
            return Err(KeeperError::CiphertextTooShort {
                len: envelope.len(),
                min: SALT_LEN,
            });
        };

        let key = self
            .deriver
            .derive_key(password.expose_secret().as_bytes(), salt);
        let plaintext = Zeroizing::new(cipher::decrypt(sealed, key.as_ref())?);

        debug!(envelope_len = envelope.len(), "opened envelope");
        Ok(plaintext)
    }
}
