// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the core calls but does not implement.
//!
//! Network-facing traits use `#[async_trait]` so they can be held as
//! `Arc<dyn ...>` by the services.

pub mod api;
pub mod token;

pub use api::{SecretApi, UserApi};
pub use token::TokenStore;
