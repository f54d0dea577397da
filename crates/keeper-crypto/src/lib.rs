// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password-based envelope encryption for Keeper secrets.
//!
//! A random salt and the master password derive an AES-256-GCM key through
//! PBKDF2-HMAC-SHA256; the key seals the payload under a random nonce. The
//! resulting envelope is self-contained apart from the password.

pub mod cipher;
pub mod envelope;
pub mod kdf;
pub mod salt;

pub use envelope::{MIN_ENVELOPE_LEN, PasswordCodec};
pub use kdf::{KeyDeriver, MIN_KDF_ITERATIONS};
pub use salt::generate_salt;
