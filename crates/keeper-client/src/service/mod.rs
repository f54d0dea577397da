// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Services driving the remote API on behalf of the CLI.

pub mod secret;
pub mod user;

use std::future::Future;
use std::time::Duration;

use keeper_core::KeeperError;
use tokio_util::sync::CancellationToken;

/// Default deadline for one remote call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `call` under a deadline and, if given, a cancellation token.
pub(crate) async fn bounded<T>(
    timeout: Duration,
    cancel: Option<&CancellationToken>,
    call: impl Future<Output = Result<T, KeeperError>>,
) -> Result<T, KeeperError> {
    let timed = async {
        tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| KeeperError::Timeout { duration: timeout })?
    };

    match cancel {
        None => timed.await,
        Some(token) => {
            if token.is_cancelled() {
                return Err(KeeperError::Cancelled);
            }
            tokio::select! {
                biased;
                _ = token.cancelled() => Err(KeeperError::Cancelled),
                result = timed => result,
            }
        }
    }
}
