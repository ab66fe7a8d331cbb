//! JSON-RPC client for the Zabbix API.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::config::{AuthMode, ConnectionConfig};
use crate::error::{ApiError, Error, Result};

/// JSON-RPC protocol version sent with every request.
const JSONRPC_VERSION: &str = "2.0";

#[derive(Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a P,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth: Option<&'a str>,
    id: u64,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: String,
}

impl<T> RpcResponse<T> {
    fn into_result(self) -> Result<T> {
        if let Some(error) = self.error {
            return Err(ApiError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }
            .into());
        }
        self.result.ok_or_else(|| {
            ApiError::InvalidResponse {
                message: "response has neither result nor error".to_string(),
            }
            .into()
        })
    }
}

/// Client for one Zabbix frontend.
///
/// Cloning is cheap and clones share the login session and request ids.
#[derive(Clone)]
pub struct ZabbixClient {
    url: String,
    auth: AuthMode,
    http_client: reqwest::Client,
    session: Arc<Mutex<Option<String>>>,
    next_id: Arc<AtomicU64>,
}

impl ZabbixClient {
    /// Creates a client for the given connection parameters.
    ///
    /// No request is made until the first API call.
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            url: config.url.clone(),
            auth: config.auth.clone(),
            http_client,
            session: Arc::new(Mutex::new(None)),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Returns the API URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the authentication mode.
    pub fn auth_mode(&self) -> &AuthMode {
        &self.auth
    }

    /// Logs in with the configured credentials and stores the session token.
    ///
    /// With a pre-issued API token this returns the token without a request.
    pub async fn login(&self) -> Result<String> {
        let mut session = self.session.lock().await;
        let token = self.obtain_token().await?;
        *session = Some(token.clone());
        Ok(token)
    }

    /// Performs an authenticated API call.
    ///
    /// A password session that the server reports as terminated is renewed
    /// once and the call retried.
    pub async fn request<T, P>(&self, method: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + Sync,
    {
        let token = self.session_token().await?;
        match self.call(method, params, Some(&token)).await {
            Err(Error::Api(ref e))
                if e.is_session_expired() && matches!(self.auth, AuthMode::Password { .. }) =>
            {
                warn!(method, "Zabbix session expired, logging in again");
                self.reset_session(&token).await;
                let token = self.session_token().await?;
                self.call(method, params, Some(&token)).await
            }
            other => other,
        }
    }

    /// Performs an API call without the `auth` member (e.g. `apiinfo.version`).
    pub async fn request_anonymous<T, P>(&self, method: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + Sync,
    {
        self.call(method, params, None).await
    }

    /// Returns the current session token, logging in first if there is none.
    async fn session_token(&self) -> Result<String> {
        let mut session = self.session.lock().await;
        if let Some(token) = session.as_ref() {
            return Ok(token.clone());
        }
        let token = self.obtain_token().await?;
        *session = Some(token.clone());
        Ok(token)
    }

    /// Forgets `stale` unless another task already replaced it.
    async fn reset_session(&self, stale: &str) {
        let mut session = self.session.lock().await;
        if session.as_deref() == Some(stale) {
            *session = None;
        }
    }

    async fn obtain_token(&self) -> Result<String> {
        match &self.auth {
            AuthMode::Token(token) => Ok(token.clone()),
            AuthMode::Password { user, password } => {
                debug!(user = %user, "logging in to Zabbix");
                let params = serde_json::json!({ "user": user, "password": password });
                self.call("user.login", &params, None).await
            }
        }
    }

    async fn call<T, P>(&self, method: &str, params: &P, auth: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize + Sync,
    {
        let body = RpcRequest {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
            auth,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        trace!(method, id = body.id, "sending Zabbix API request");
        let response = self.http_client.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(parse_error_response(response).await);
        }

        let bytes = response.bytes().await?;
        let envelope: RpcResponse<T> = serde_json::from_slice(&bytes)?;
        envelope.into_result()
    }
}

/// Maps a non-2xx HTTP response to an API error.
async fn parse_error_response(response: reqwest::Response) -> Error {
    let status = response.status();
    let message = response.text().await.unwrap_or_default();

    let api_error = match status.as_u16() {
        401 | 403 => ApiError::Auth {
            message: if message.is_empty() {
                "Authentication failed".to_string()
            } else {
                message
            },
        },
        code => ApiError::Http {
            status: code,
            message: if message.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                message
            },
        },
    };

    Error::Api(api_error)
}

impl fmt::Debug for ZabbixClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZabbixClient")
            .field("url", &self.url)
            .field("auth", &self.auth)
            .finish()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
