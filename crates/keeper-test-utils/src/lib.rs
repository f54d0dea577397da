// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Keeper integration tests.
//!
//! # Components
//!
//! - [`MockSecretApi`] - in-memory server implementing `SecretApi` and `UserApi`
//! - [`MemoryTokenStore`] - token store without a file
//! - [`TestHarness`] - the real services wired to both

pub mod harness;
pub mod memory_tokens;
pub mod mock_api;

pub use harness::{TestHarness, master};
pub use memory_tokens::MemoryTokenStore;
pub use mock_api::{MockFailure, MockSecretApi, TEST_TOKEN};
