// SPDX-FileCopyrightText: 2026 Keeper Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTPS client for the Keeper server.
//!
//! Implements [`SecretApi`] and [`UserApi`] over the JSON routes under
//! `/api/user`. Request bodies only ever contain envelopes; the master
//! password never reaches this module.

use std::time::Duration;

use async_trait::async_trait;
use keeper_config::model::ServerConfig;
use keeper_core::{
    AccountCredentials, AuthToken, KeeperError, SecretApi, SecretId, SecretRequest,
    SecretResponse, UserApi,
};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const REGISTER_PATH: &str = "/api/user/register";
const LOGIN_PATH: &str = "/api/user/login";
const SECRETS_PATH: &str = "/api/user/secrets";

/// Longest server error body echoed back in an error message.
const MAX_ERROR_BODY: usize = 256;

#[derive(Serialize)]
struct AccountBody<'a> {
    login: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
}

/// reqwest-backed client for the Secret API and the user API.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpApiClient {
    /// Build a client from the `[server]` config section.
    pub fn new(config: &ServerConfig) -> Result<Self, KeeperError> {
        let timeout = config.request_timeout();
        if config.accept_invalid_certs {
            warn!("server certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| KeeperError::transport("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.address.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&AuthToken>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        }
    }

    fn secret_path(id: SecretId) -> String {
        format!("{SECRETS_PATH}/{id}")
    }

    /// Send a request and map any non-2xx status to a [`KeeperError`].
    async fn send(&self, request: RequestBuilder, route: &str) -> Result<Response, KeeperError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                KeeperError::Timeout {
                    duration: self.timeout,
                }
            } else {
                KeeperError::transport(format!("{route} request failed"), e)
            }
        })?;

        let status = response.status();
        debug!(route, status = status.as_u16(), "response received");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, route, &body))
    }

    async fn read_json<T: DeserializeOwned>(response: Response, route: &str) -> Result<T, KeeperError> {
        let body = read_body(response, route).await?;
        serde_json::from_slice(&body).map_err(|e| {
            KeeperError::Serialization(format!("malformed {route} response: {e}"))
        })
    }
}

async fn read_body(response: Response, route: &str) -> Result<Vec<u8>, KeeperError> {
    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| KeeperError::transport(format!("failed to read {route} response"), e))
}

fn status_error(status: StatusCode, route: &str, body: &str) -> KeeperError {
    let mut message = body.trim().to_string();
    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| message.is_char_boundary(i))
            .unwrap_or(0);
        message.truncate(cut);
    }
    if message.is_empty() {
        message = status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string();
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            warn!(route, status = status.as_u16(), "server rejected the session");
            KeeperError::Unauthorized {
                status: status.as_u16(),
            }
        }
        StatusCode::NOT_FOUND => KeeperError::NotFound(message),
        StatusCode::CONFLICT => KeeperError::Conflict(message),
        _ => KeeperError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl SecretApi for HttpApiClient {
    async fn create(
        &self,
        request: &SecretRequest,
        token: &AuthToken,
    ) -> Result<SecretResponse, KeeperError> {
        let req = self.request(Method::POST, SECRETS_PATH, Some(token)).json(request);
        let response = self.send(req, "create secret").await?;
        Self::read_json(response, "create secret").await
    }

    async fn get(&self, id: SecretId, token: &AuthToken) -> Result<SecretResponse, KeeperError> {
        let req = self.request(Method::GET, &Self::secret_path(id), Some(token));
        let response = self.send(req, "get secret").await?;
        Self::read_json(response, "get secret").await
    }

    async fn update(
        &self,
        id: SecretId,
        request: &SecretRequest,
        token: &AuthToken,
    ) -> Result<SecretResponse, KeeperError> {
        let req = self
            .request(Method::PUT, &Self::secret_path(id), Some(token))
            .json(request);
        let response = self.send(req, "update secret").await?;
        Self::read_json(response, "update secret").await
    }

    async fn delete(
        &self,
        id: SecretId,
        token: &AuthToken,
    ) -> Result<Option<SecretResponse>, KeeperError> {
        let req = self.request(Method::DELETE, &Self::secret_path(id), Some(token));
        let response = self.send(req, "delete secret").await?;
        let body = read_body(response, "delete secret").await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| KeeperError::Serialization(format!("malformed delete secret response: {e}")))
    }
}

#[async_trait]
impl UserApi for HttpApiClient {
    async fn register(&self, account: &AccountCredentials) -> Result<(), KeeperError> {
        let body = AccountBody {
            login: &account.login,
            password: account.password.expose_secret(),
        };
        let req = self.request(Method::POST, REGISTER_PATH, None).json(&body);
        self.send(req, "register").await?;
        Ok(())
    }

    async fn login(&self, account: &AccountCredentials) -> Result<AuthToken, KeeperError> {
        let body = AccountBody {
            login: &account.login,
            password: account.password.expose_secret(),
        };
        let req = self.request(Method::POST, LOGIN_PATH, None).json(&body);
        let response = self.send(req, "login").await?;
        let LoginBody { token } = Self::read_json(response, "login").await?;
        if token.is_empty() {
            return Err(KeeperError::Api {
                status: 200,
                message: "login response carried no token".to_string(),
            });
        }
        Ok(AuthToken::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "get", ""),
            KeeperError::Unauthorized { status: 401 }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "get", "nope"),
            KeeperError::Unauthorized { status: 403 }
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "get", "data not found\n"),
            KeeperError::NotFound(m) if m == "data not found"
        ));
        assert!(matches!(
            status_error(StatusCode::CONFLICT, "register", "login taken"),
            KeeperError::Conflict(_)
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "get", ""),
            KeeperError::Api { status: 500, message } if message == "Internal Server Error"
        ));
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "é".repeat(400);
        match status_error(StatusCode::BAD_REQUEST, "create", &body) {
            KeeperError::Api { message, .. } => assert!(message.len() <= MAX_ERROR_BODY),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let config = ServerConfig {
            address: "https://vault.example:8443/".into(),
            ..ServerConfig::default()
        };
        let client = HttpApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://vault.example:8443");
    }
}
