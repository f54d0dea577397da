// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `HttpApiClient` against a wiremock server.

use keeper_client::HttpApiClient;
use keeper_config::model::ServerConfig;
use keeper_core::{
    AccountCredentials, AuthToken, KeeperError, SecretApi, SecretId, SecretRequest, SecretType,
    UserApi,
};
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ID: &str = "3f2b8c1e-6f7a-4d2b-9a51-0c8e2f4b7d10";

fn client(server: &MockServer) -> HttpApiClient {
    HttpApiClient::new(&ServerConfig {
        address: server.uri(),
        ..ServerConfig::default()
    })
    .unwrap()
}

fn token() -> AuthToken {
    AuthToken::new("jwt-token")
}

fn secret_id() -> SecretId {
    ID.parse().unwrap()
}

fn record_json() -> serde_json::Value {
    json!({
        "id": ID,
        "name": "github",
        "type": 0,
        "note": "work",
        "data": "AQID",
        "createdAt": "2025-03-01T10:00:00Z",
        "updatedAt": "2025-03-01T10:00:00Z"
    })
}

#[tokio::test]
async fn create_posts_envelope_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/secrets"))
        .and(header("authorization", "Bearer jwt-token"))
        .and(body_json(json!({"name": "github", "type": 0, "note": "work", "data": "AQID"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(record_json()))
        .expect(1)
        .mount(&server)
        .await;

    let request = SecretRequest {
        name: "github".into(),
        kind: SecretType::Credentials,
        note: "work".into(),
        data: vec![1, 2, 3],
    };
    let created = client(&server).create(&request, &token()).await.unwrap();

    assert_eq!(created.id, secret_id());
    assert_eq!(created.kind, SecretType::Credentials);
    assert_eq!(created.data, vec![1, 2, 3]);
    assert!(created.created_at.is_some());
}

#[tokio::test]
async fn get_decodes_base64_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/user/secrets/{ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_json()))
        .mount(&server)
        .await;

    let fetched = client(&server).get(secret_id(), &token()).await.unwrap();
    assert_eq!(fetched.name, "github");
    assert_eq!(fetched.data, vec![1, 2, 3]);
}

#[tokio::test]
async fn update_puts_to_the_secret_route() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/user/secrets/{ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_json()))
        .expect(1)
        .mount(&server)
        .await;

    let request = SecretRequest {
        name: "github".into(),
        kind: SecretType::Credentials,
        note: String::new(),
        data: vec![9],
    };
    let updated = client(&server)
        .update(secret_id(), &request, &token())
        .await
        .unwrap();
    assert_eq!(updated.id, secret_id());
}

#[tokio::test]
async fn delete_with_empty_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/user/secrets/{ID}")))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let deleted = client(&server).delete(secret_id(), &token()).await.unwrap();
    assert!(deleted.is_none());
}

#[tokio::test]
async fn delete_with_echoed_record_is_some() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/user/secrets/{ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_json()))
        .mount(&server)
        .await;

    let deleted = client(&server).delete(secret_id(), &token()).await.unwrap();
    assert_eq!(deleted.unwrap().id, secret_id());
}

#[tokio::test]
async fn status_codes_map_to_error_variants() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("data not found"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let c = client(&server);
    assert!(matches!(
        c.get(secret_id(), &token()).await,
        Err(KeeperError::Unauthorized { status: 401 })
    ));
    assert!(matches!(
        c.get(secret_id(), &token()).await,
        Err(KeeperError::NotFound(m)) if m == "data not found"
    ));
    assert!(matches!(
        c.get(secret_id(), &token()).await,
        Err(KeeperError::Api { status: 502, .. })
    ));
}

#[tokio::test]
async fn malformed_success_body_is_serialization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).get(secret_id(), &token()).await,
        Err(KeeperError::Serialization(_))
    ));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let c = client(&server);
    drop(server);

    let err = c.get(secret_id(), &token()).await.unwrap_err();
    assert!(matches!(err, KeeperError::Transport { .. }), "got {err:?}");
}

#[tokio::test]
async fn login_returns_token_and_register_sends_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/register"))
        .and(body_json(json!({"login": "alice", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "issued"})))
        .mount(&server)
        .await;

    let c = client(&server);
    let account = AccountCredentials::new("alice", SecretString::from("pw".to_string()));
    c.register(&account).await.unwrap();
    assert_eq!(c.login(&account).await.unwrap().expose(), "issued");
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("login already exists"))
        .mount(&server)
        .await;

    let account = AccountCredentials::new("alice", SecretString::from("pw".to_string()));
    assert!(matches!(
        client(&server).register(&account).await,
        Err(KeeperError::Conflict(_))
    ));
}
