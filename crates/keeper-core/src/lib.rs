// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Keeper password manager.
//!
//! Holds the error type, the typed secret model with its wire encoding, and
//! the traits for the collaborators the secret services depend on (remote
//! API, token store).

pub mod error;
pub mod traits;
pub mod types;

pub use error::KeeperError;
pub use traits::{SecretApi, TokenStore, UserApi};
pub use types::{
    AccountCredentials, AuthToken, BankCard, BinaryData, Credentials, SecretDraft, SecretId,
    SecretMeta, SecretPayload, SecretRequest, SecretResponse, SecretType, TextData,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_traits_are_object_safe() {
        fn _secret_api(_: &dyn SecretApi) {}
        fn _user_api(_: &dyn UserApi) {}
        fn _token_store(_: &dyn TokenStore) {}
    }

    #[test]
    fn every_secret_type_has_a_payload_variant() {
        let payloads = [
            SecretPayload::Credentials(Credentials {
                login: "a".into(),
                password: "b".into(),
            }),
            SecretPayload::Text(TextData {
                content: "c".into(),
            }),
            SecretPayload::Binary(BinaryData {
                filename: "f".into(),
                data: vec![1],
            }),
            SecretPayload::Card(BankCard::default()),
        ];
        let kinds: Vec<SecretType> = payloads.iter().map(SecretPayload::kind).collect();
        assert_eq!(
            kinds,
            vec![
                SecretType::Credentials,
                SecretType::Text,
                SecretType::Binary,
                SecretType::Card
            ]
        );
    }
}
