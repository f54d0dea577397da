// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client side of Keeper: the HTTP adapter for the server, the session token
//! file, and the services the CLI calls.

pub mod http;
pub mod service;
pub mod token_store;

pub use http::HttpApiClient;
pub use service::secret::SecretService;
pub use service::user::UserService;
pub use token_store::FileTokenStore;
