// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret model and wire types shared by the client, the CLI, and the mocks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::KeeperError;

/// Server-assigned identifier of a stored secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretId(pub Uuid);

impl SecretId {
    /// Generate a fresh random identifier.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SecretId {
    type Err = KeeperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| KeeperError::Serialization(format!("invalid secret id `{s}`: {e}")))
    }
}

/// Kind of payload carried inside an envelope.
///
/// Travels on the wire as its integer code, which is what the server stores.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(into = "u8", try_from = "u8")]
pub enum SecretType {
    Credentials,
    Text,
    Binary,
    Card,
}

impl From<SecretType> for u8 {
    fn from(kind: SecretType) -> Self {
        match kind {
            SecretType::Credentials => 0,
            SecretType::Text => 1,
            SecretType::Binary => 2,
            SecretType::Card => 3,
        }
    }
}

impl TryFrom<u8> for SecretType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Credentials),
            1 => Ok(Self::Text),
            2 => Ok(Self::Binary),
            3 => Ok(Self::Card),
            other => Err(format!("unknown secret type code {other}")),
        }
    }
}

/// Login/password pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub login: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Free-form text.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct TextData {
    pub content: String,
}

impl fmt::Debug for TextData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextData")
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// An arbitrary file.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct BinaryData {
    #[serde(rename = "file_name")]
    pub filename: String,
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
}

impl fmt::Debug for BinaryData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryData")
            .field("filename", &self.filename)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Payment card record.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct BankCard {
    #[serde(rename = "cardNumber")]
    pub number: String,
    /// Two-digit expiration month.
    #[serde(rename = "expirationMonth")]
    pub exp_month: String,
    /// Four-digit expiration year.
    #[serde(rename = "expirationYear")]
    pub exp_year: String,
    #[serde(rename = "cardHolderName")]
    pub holder_name: String,
    pub cvv: String,
    pub billing_address: String,
    /// Visa, Mastercard, American Express...
    pub card_type: String,
    pub issuing_bank: String,
}

impl BankCard {
    /// Card number with everything but the last four digits hidden.
    pub fn masked_number(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(|c| !c.is_whitespace()).collect();
        if digits.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = digits[digits.len() - 4..].iter().collect();
        format!("**** {tail}")
    }
}

impl fmt::Debug for BankCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankCard")
            .field("number", &self.masked_number())
            .field("card_type", &self.card_type)
            .field("issuing_bank", &self.issuing_bank)
            .field("cvv", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// A typed secret payload: what the user actually wants protected.
///
/// Serialized to JSON as the bare inner record; the variant travels separately
/// as the request's [`SecretType`] tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    Credentials(Credentials),
    Text(TextData),
    Binary(BinaryData),
    Card(BankCard),
}

impl SecretPayload {
    pub fn kind(&self) -> SecretType {
        match self {
            Self::Credentials(_) => SecretType::Credentials,
            Self::Text(_) => SecretType::Text,
            Self::Binary(_) => SecretType::Binary,
            Self::Card(_) => SecretType::Card,
        }
    }

    /// Canonical plaintext bytes (JSON) that go into the envelope.
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>, KeeperError> {
        let bytes = match self {
            Self::Credentials(v) => serde_json::to_vec(v),
            Self::Text(v) => serde_json::to_vec(v),
            Self::Binary(v) => serde_json::to_vec(v),
            Self::Card(v) => serde_json::to_vec(v),
        }
        .map_err(|e| KeeperError::Serialization(format!("failed to encode {}: {e}", self.kind())))?;
        Ok(Zeroizing::new(bytes))
    }

    /// Decode plaintext bytes according to the type tag they were stored under.
    ///
    /// The serde error is reduced to its position so that no decrypted
    /// content ends up in the message.
    pub fn from_bytes(kind: SecretType, bytes: &[u8]) -> Result<Self, KeeperError> {
        let parsed = match kind {
            SecretType::Credentials => serde_json::from_slice(bytes).map(Self::Credentials),
            SecretType::Text => serde_json::from_slice(bytes).map(Self::Text),
            SecretType::Binary => serde_json::from_slice(bytes).map(Self::Binary),
            SecretType::Card => serde_json::from_slice(bytes).map(Self::Card),
        };
        parsed.map_err(|e| {
            KeeperError::Serialization(format!(
                "decrypted data is not a valid {kind} record (line {}, column {})",
                e.line(),
                e.column()
            ))
        })
    }
}

/// A secret on its way to the server: labels plus the payload to encrypt.
#[derive(Debug, Clone)]
pub struct SecretDraft {
    pub name: String,
    pub note: String,
    pub payload: SecretPayload,
}

impl SecretDraft {
    pub fn new(name: impl Into<String>, note: impl Into<String>, payload: SecretPayload) -> Self {
        Self {
            name: name.into(),
            note: note.into(),
            payload,
        }
    }
}

/// Identifying fields confirmed by the server. Never carries content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretMeta {
    pub id: SecretId,
    pub name: String,
    pub note: String,
    pub kind: SecretType,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Wire body for create and update calls. `data` is always an envelope.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SecretType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
}

impl fmt::Debug for SecretRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRequest")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("data_len", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// Wire body returned by the Secret API.
///
/// As received, `data` is the envelope. After
/// `SecretService::get_secret` it holds the decrypted JSON payload, which is
/// wiped when the response is dropped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretResponse {
    pub id: SecretId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SecretType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SecretResponse {
    /// Identifying fields only.
    pub fn meta(&self) -> SecretMeta {
        SecretMeta {
            id: self.id,
            name: self.name.clone(),
            note: self.note.clone(),
            kind: self.kind,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Decode `data` as the typed payload named by `kind`.
    ///
    /// Only meaningful once `data` has been decrypted.
    pub fn payload(&self) -> Result<SecretPayload, KeeperError> {
        SecretPayload::from_bytes(self.kind, &self.data)
    }
}

// `data` holds the decrypted payload after `get_secret`.
impl Drop for SecretResponse {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl ZeroizeOnDrop for SecretResponse {}

impl fmt::Debug for SecretResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretResponse")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("data_len", &self.data.len())
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// Opaque bearer token issued by the server at login.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// Account login and password used for register/login.
#[derive(Clone)]
pub struct AccountCredentials {
    pub login: String,
    pub password: SecretString,
}

impl AccountCredentials {
    pub fn new(login: impl Into<String>, password: SecretString) -> Self {
        Self {
            login: login.into(),
            password,
        }
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Serde adapter: `Vec<u8>` as standard base64, tolerating `null`.
pub mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(bytes: T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}
