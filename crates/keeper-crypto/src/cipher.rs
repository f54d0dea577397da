// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM under a raw key.
//!
//! Output layout is `nonce(12) || ciphertext || tag(16)`. Every call to
//! [`encrypt`] draws a fresh random nonce; reusing a nonce under one key
//! would break GCM.

use keeper_core::KeeperError;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN as RING_NONCE_LEN, Nonce, UnboundKey};

use crate::salt::fill_random;

/// GCM nonce length.
pub const NONCE_LEN: usize = RING_NONCE_LEN;

/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;

fn aead_key(key: &[u8]) -> Result<LessSafeKey, KeeperError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key).map_err(|_| {
        KeeperError::CipherInit(format!("AES-256-GCM needs a 32-byte key, got {}", key.len()))
    })?;
    Ok(LessSafeKey::new(unbound))
}

/// Seal `plaintext` under `key`, prefixing the random nonce.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, KeeperError> {
    let key = aead_key(key)?;
    let nonce_bytes = fill_random::<NONCE_LEN>()?;

    // Sealed in place: the buffer holds ciphertext once this returns.
    let mut sealed = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::empty(),
        &mut sealed,
    )
    .map_err(|_| KeeperError::Internal("AES-256-GCM seal failed".to_string()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Open `nonce || ciphertext || tag` under `key`.
///
/// Inputs shorter than a nonce fail with
/// [`KeeperError::CiphertextTooShort`]; a tag that does not verify fails with
/// [`KeeperError::AuthenticationFailed`].
pub fn decrypt(input: &[u8], key: &[u8]) -> Result<Vec<u8>, KeeperError> {
    if input.len() < NONCE_LEN {
        return Err(KeeperError::CiphertextTooShort {
            len: input.len(),
            min: NONCE_LEN,
        });
    }
    let key = aead_key(key)?;

    let (nonce_bytes, sealed) = input.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| KeeperError::Internal("malformed GCM nonce".to_string()))?;

    let mut in_out = sealed.to_vec();
    let plaintext_len = key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| KeeperError::AuthenticationFailed)?
        .len();
    in_out.truncate(plaintext_len);

    Ok(in_out)
}
