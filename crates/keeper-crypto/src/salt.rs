// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random salts for password-derived keys.

use keeper_core::KeeperError;
use ring::rand::{SecureRandom, SystemRandom};

/// Salt length in bytes. Every envelope starts with one.
pub const SALT_LEN: usize = 32;

/// Draw a fresh salt from the OS CSPRNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN], KeeperError> {
    fill_random::<SALT_LEN>()
}

pub(crate) fn fill_random<const N: usize>() -> Result<[u8; N], KeeperError> {
    let mut buf = [0u8; N];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| KeeperError::RandomnessUnavailable)?;
    Ok(buf)
}
