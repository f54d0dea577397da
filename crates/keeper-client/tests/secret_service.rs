// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret and user services against the in-memory server.

use std::time::Duration;

use keeper_core::{
    AccountCredentials, BankCard, BinaryData, Credentials, KeeperError, SecretDraft, SecretId,
    SecretPayload, SecretType, TextData, TokenStore,
};
use keeper_test_utils::{MockFailure, TestHarness, master};
use tokio_util::sync::CancellationToken;

fn github() -> Credentials {
    Credentials {
        login: "alice".into(),
        password: "p@ss".into(),
    }
}

#[tokio::test]
async fn credentials_round_trip_with_the_right_master_password() {
    let h = TestHarness::new().unwrap();

    let meta = h
        .secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap();
    assert_eq!(meta.name, "github");
    assert_eq!(meta.kind, SecretType::Credentials);

    let fetched = h.secrets.get_secret(meta.id, &master("m1")).await.unwrap();
    assert_eq!(fetched.payload().unwrap(), SecretPayload::Credentials(github()));
}

#[tokio::test]
async fn another_master_password_is_rejected() {
    let h = TestHarness::new().unwrap();
    let meta = h
        .secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap();

    let err = h
        .secrets
        .get_secret(meta.id, &master("m2"))
        .await
        .unwrap_err();
    assert!(matches!(err, KeeperError::AuthenticationFailed));
    assert_eq!(
        err.to_string(),
        "incorrect master password or corrupted secret"
    );
}

#[tokio::test]
async fn server_only_ever_sees_envelopes() {
    let h = TestHarness::new().unwrap();
    let meta = h
        .secrets
        .add_text(
            "diary",
            "personal",
            TextData {
                content: "plaintext-marker".into(),
            },
            &master("m1"),
        )
        .await
        .unwrap();

    let stored = h.api.stored(meta.id).await.unwrap();
    assert_eq!(stored.note, "personal");
    assert!(
        !stored
            .data
            .windows(b"plaintext-marker".len())
            .any(|w| w == b"plaintext-marker")
    );
    assert!(stored.data.len() >= keeper_crypto::MIN_ENVELOPE_LEN);
}

#[tokio::test]
async fn every_kind_round_trips() {
    let h = TestHarness::new().unwrap();
    let m = master("m1");

    // BankCard zeroizes on drop, so no struct update syntax.
    let mut card = BankCard::default();
    card.number = "4111111111111111".into();
    card.exp_month = "12".into();
    card.exp_year = "2030".into();
    card.holder_name = "ALICE EXAMPLE".into();
    card.cvv = "123".into();
    let file = BinaryData {
        filename: "id_ed25519".into(),
        data: vec![0, 159, 146, 150, 255],
    };

    let text_id = h
        .secrets
        .add_text("t", "", TextData { content: "hi".into() }, &m)
        .await
        .unwrap()
        .id;
    let bin_id = h.secrets.add_binary("b", "", file.clone(), &m).await.unwrap().id;
    let card_id = h.secrets.add_card("c", "", card.clone(), &m).await.unwrap().id;

    assert_eq!(
        h.secrets.get_secret(text_id, &m).await.unwrap().payload().unwrap(),
        SecretPayload::Text(TextData { content: "hi".into() })
    );
    assert_eq!(
        h.secrets.get_secret(bin_id, &m).await.unwrap().payload().unwrap(),
        SecretPayload::Binary(file)
    );
    assert_eq!(
        h.secrets.get_secret(card_id, &m).await.unwrap().payload().unwrap(),
        SecretPayload::Card(card)
    );
}

#[tokio::test]
async fn update_replaces_the_envelope_wholesale() {
    let h = TestHarness::new().unwrap();
    let m = master("m1");
    let id = h
        .secrets
        .add_credentials("github", "", github(), &m)
        .await
        .unwrap()
        .id;
    let before = h.api.stored(id).await.unwrap().data.clone();

    let draft = SecretDraft::new(
        "github-notes",
        "moved to text",
        SecretPayload::Text(TextData {
            content: "recovery codes".into(),
        }),
    );
    let meta = h.secrets.update_secret(id, &draft, &m).await.unwrap();
    assert_eq!(meta.id, id);
    assert_eq!(meta.kind, SecretType::Text);

    let after = h.api.stored(id).await.unwrap();
    assert_ne!(after.data, before);
    assert_eq!(
        h.secrets.get_secret(id, &m).await.unwrap().payload().unwrap(),
        draft.payload
    );
}

#[tokio::test]
async fn delete_needs_no_master_password() {
    let h = TestHarness::new().unwrap();
    let id = h
        .secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap()
        .id;

    let deleted = h.secrets.delete_secret(id).await.unwrap().unwrap();
    assert_eq!(deleted.id, id);
    assert_eq!(h.api.secret_count().await, 0);

    assert!(matches!(
        h.secrets.get_secret(id, &master("m1")).await,
        Err(KeeperError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_without_echo_returns_none() {
    let h = TestHarness::new().unwrap();
    h.api.set_echo_deletes(false).await;
    let id = h
        .secrets
        .add_text("t", "", TextData { content: "x".into() }, &master("m"))
        .await
        .unwrap()
        .id;
    assert!(h.secrets.delete_secret(id).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let h = TestHarness::new().unwrap();
    let result = h.secrets.delete_secret(SecretId::new_v4()).await;
    assert!(matches!(result, Err(KeeperError::NotFound(_))));
}

#[tokio::test]
async fn no_session_fails_before_any_request() {
    let h = TestHarness::builder().logged_out().build().unwrap();
    let err = h
        .secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap_err();
    assert!(matches!(err, KeeperError::TokenUnavailable(_)));
    assert!(h.api.requests().await.is_empty());
}

#[tokio::test]
async fn rejected_session_is_distinct_from_wrong_password() {
    let h = TestHarness::new().unwrap();
    let id = h
        .secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap()
        .id;

    h.api.fail_next(MockFailure::Unauthorized).await;
    let err = h.secrets.get_secret(id, &master("m1")).await.unwrap_err();
    assert!(matches!(err, KeeperError::Unauthorized { status: 401 }));
    assert!(!err.is_crypto());
}

#[tokio::test]
async fn tampered_envelope_fails_authentication() {
    let h = TestHarness::new().unwrap();
    let id = h
        .secrets
        .add_text("t", "", TextData { content: "x".into() }, &master("m"))
        .await
        .unwrap()
        .id;

    let mut data = h.api.stored(id).await.unwrap().data.clone();
    let last = data.len() - 1;
    data[last] ^= 0xff;
    h.api.replace_data(id, data).await;

    assert!(matches!(
        h.secrets.get_secret(id, &master("m")).await,
        Err(KeeperError::AuthenticationFailed)
    ));
}

#[tokio::test]
async fn truncated_envelope_is_reported_as_corrupted() {
    let h = TestHarness::new().unwrap();
    let id = h
        .secrets
        .add_text("t", "", TextData { content: "x".into() }, &master("m"))
        .await
        .unwrap()
        .id;
    h.api.replace_data(id, vec![1, 2, 3]).await;

    assert!(matches!(
        h.secrets.get_secret(id, &master("m")).await,
        Err(KeeperError::CiphertextTooShort { len: 3, .. })
    ));
}

#[tokio::test]
async fn transport_failures_are_retryable_and_not_retried() {
    let h = TestHarness::new().unwrap();
    h.api.fail_next(MockFailure::Transport).await;

    let err = h
        .secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(h.api.secret_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn slow_server_times_out() {
    let h = TestHarness::builder()
        .with_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    h.api.set_latency(Duration::from_secs(10)).await;

    let err = h
        .secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap_err();
    assert!(matches!(err, KeeperError::Timeout { .. }));
}

#[tokio::test]
async fn cancelled_operation_persists_nothing() {
    let cancel = CancellationToken::new();
    let h = TestHarness::builder()
        .with_cancellation(cancel.clone())
        .build()
        .unwrap();
    cancel.cancel();

    let err = h
        .secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap_err();
    assert!(matches!(err, KeeperError::Cancelled));
    assert_eq!(h.api.secret_count().await, 0);
}

#[tokio::test]
async fn register_login_logout_cycle() {
    let h = TestHarness::builder().logged_out().build().unwrap();
    let account = AccountCredentials::new("alice", master("account-pw"));

    h.users.register(&account).await.unwrap();
    h.users.login(&account).await.unwrap();
    assert!(h.tokens.is_logged_in());

    h.secrets
        .add_credentials("github", "", github(), &master("m1"))
        .await
        .unwrap();

    h.users.logout().unwrap();
    assert!(!h.tokens.is_logged_in());
    assert!(matches!(
        h.tokens.load(),
        Err(KeeperError::TokenUnavailable(_))
    ));
    h.users.logout().unwrap();
}

#[tokio::test]
async fn wrong_account_password_keeps_no_token() {
    let h = TestHarness::builder().logged_out().build().unwrap();
    h.users
        .register(&AccountCredentials::new("alice", master("right")))
        .await
        .unwrap();

    let err = h
        .users
        .login(&AccountCredentials::new("alice", master("wrong")))
        .await
        .unwrap_err();
    assert!(matches!(err, KeeperError::Unauthorized { .. }));
    assert!(!h.tokens.is_logged_in());
}
