// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret lifecycle: encrypt before send, decrypt after fetch.
//!
//! [`SecretService`] is the only place where typed secrets, the master
//! password and the remote API meet. Plaintext lives on the call stack of a
//! single operation and is never logged; key material never leaves
//! [`PasswordCodec`].

use std::sync::Arc;
use std::time::Duration;

use keeper_core::{
    BankCard, BinaryData, Credentials, KeeperError, SecretApi, SecretDraft, SecretId, SecretMeta,
    SecretPayload, SecretRequest, SecretResponse, TextData, TokenStore,
};
use keeper_crypto::PasswordCodec;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{DEFAULT_CALL_TIMEOUT, bounded};

/// Creates, reads, updates and deletes secrets against a [`SecretApi`].
pub struct SecretService {
    api: Arc<dyn SecretApi>,
    tokens: Arc<dyn TokenStore>,
    codec: PasswordCodec,
    timeout: Duration,
    cancel: Option<CancellationToken>,
}

impl SecretService {
    pub fn new(api: Arc<dyn SecretApi>, tokens: Arc<dyn TokenStore>, codec: PasswordCodec) -> Self {
        Self {
            api,
            tokens,
            codec,
            timeout: DEFAULT_CALL_TIMEOUT,
            cancel: None,
        }
    }

    /// Deadline applied to each remote call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Abort in-flight calls with [`KeeperError::Cancelled`] once `token` fires.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Encrypt `draft` under `master` and store it. Returns what the server
    /// assigned, never the content.
    pub async fn add(
        &self,
        draft: &SecretDraft,
        master: &SecretString,
    ) -> Result<SecretMeta, KeeperError> {
        let request = self.seal(draft, master)?;
        let token = self.tokens.load()?;

        let response = bounded(
            self.timeout,
            self.cancel.as_ref(),
            self.api.create(&request, &token),
        )
        .await?;

        let meta = response.meta();
        info!(secret_id = %meta.id, kind = %meta.kind, "secret created");
        Ok(meta)
    }

    pub async fn add_credentials(
        &self,
        name: &str,
        note: &str,
        credentials: Credentials,
        master: &SecretString,
    ) -> Result<SecretMeta, KeeperError> {
        let draft = SecretDraft::new(name, note, SecretPayload::Credentials(credentials));
        self.add(&draft, master).await
    }

    pub async fn add_text(
        &self,
        name: &str,
        note: &str,
        text: TextData,
        master: &SecretString,
    ) -> Result<SecretMeta, KeeperError> {
        let draft = SecretDraft::new(name, note, SecretPayload::Text(text));
        self.add(&draft, master).await
    }

    pub async fn add_binary(
        &self,
        name: &str,
        note: &str,
        binary: BinaryData,
        master: &SecretString,
    ) -> Result<SecretMeta, KeeperError> {
        let draft = SecretDraft::new(name, note, SecretPayload::Binary(binary));
        self.add(&draft, master).await
    }

    pub async fn add_card(
        &self,
        name: &str,
        note: &str,
        card: BankCard,
        master: &SecretString,
    ) -> Result<SecretMeta, KeeperError> {
        let draft = SecretDraft::new(name, note, SecretPayload::Card(card));
        self.add(&draft, master).await
    }

    /// Fetch a secret and decrypt its `data` in place.
    ///
    /// A wrong master password fails with
    /// [`KeeperError::AuthenticationFailed`]; a rejected session fails with
    /// [`KeeperError::Unauthorized`].
    pub async fn get_secret(
        &self,
        id: SecretId,
        master: &SecretString,
    ) -> Result<SecretResponse, KeeperError> {
        let token = self.tokens.load()?;
        let mut response =
            bounded(self.timeout, self.cancel.as_ref(), self.api.get(id, &token)).await?;

        let mut plaintext = self.codec.decrypt_with_password(&response.data, master)?;
        // SecretResponse wipes `data` on drop, so the plaintext stays covered.
        response.data = std::mem::take(&mut *plaintext);

        debug!(secret_id = %id, kind = %response.kind, "secret decrypted");
        Ok(response)
    }

    /// Replace a secret wholesale with a freshly encrypted `draft`.
    pub async fn update_secret(
        &self,
        id: SecretId,
        draft: &SecretDraft,
        master: &SecretString,
    ) -> Result<SecretMeta, KeeperError> {
        let request = self.seal(draft, master)?;
        let token = self.tokens.load()?;

        let response = bounded(
            self.timeout,
            self.cancel.as_ref(),
            self.api.update(id, &request, &token),
        )
        .await?;

        let meta = response.meta();
        info!(secret_id = %meta.id, kind = %meta.kind, "secret updated");
        Ok(meta)
    }

    /// Delete a secret. Needs no master password; the deleted record (if the
    /// server echoes one) is reported by its metadata only.
    pub async fn delete_secret(&self, id: SecretId) -> Result<Option<SecretMeta>, KeeperError> {
        let token = self.tokens.load()?;
        let deleted =
            bounded(self.timeout, self.cancel.as_ref(), self.api.delete(id, &token)).await?;

        info!(secret_id = %id, echoed = deleted.is_some(), "secret deleted");
        Ok(deleted.map(|r| r.meta()))
    }

    fn seal(&self, draft: &SecretDraft, master: &SecretString) -> Result<SecretRequest, KeeperError> {
        let plaintext = draft.payload.to_bytes()?;
        let data = self.codec.encrypt_with_password(&plaintext, master)?;
        Ok(SecretRequest {
            name: draft.name.clone(),
            kind: draft.payload.kind(),
            note: draft.note.clone(),
            data,
        })
    }
}

impl std::fmt::Debug for SecretService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretService")
            .field("codec", &self.codec)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
