//! reqwest-backed gateway talking to the live back-office API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;
use uuid::Uuid;

use crate::gateway::errors::{GatewayError, GatewayResult};
use crate::gateway::{GatewayReader, GatewayWriter, QueryPairs};
use crate::models::config::ClientConfig;
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: Url,
    session: Session,
}

impl HttpGateway {
    /// Builds a gateway for the configured API origin.
    pub fn new(config: &ClientConfig, session: Session) -> GatewayResult<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            GatewayError::network(format!("invalid api base url {}: {e}", config.api_base_url))
        })?;

        let http = Client::builder()
            .user_agent(concat!("fleet-backoffice/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(GatewayError::from)?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> GatewayResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::network(format!("invalid request path {path}: {e}")))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &QueryPairs,
        body: Option<&Value>,
    ) -> GatewayResult<Value> {
        let url = self.url(path)?;
        let request_id = Uuid::new_v4();

        let mut request = self
            .http
            .request(method.clone(), url)
            .header("X-Request-Id", request_id.to_string());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        log::debug!("{method} {path} [{request_id}]");

        let response = request.send().await.map_err(|err| {
            log::error!("{method} {path} [{request_id}] failed: {err}");
            GatewayError::network(err.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(GatewayError::from)?;
            return Ok(decode_body(&bytes));
        }

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
        }

        let body = response.text().await.unwrap_or_default();
        let err = GatewayError::from_response(status.as_u16(), &body);
        log::error!("{method} {path} [{request_id}] returned {status}: {}", err.message);
        Err(err)
    }
}

/// Empty bodies become `null`; non-JSON bodies become a JSON string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).trim().to_string()))
}

#[async_trait]
impl GatewayReader for HttpGateway {
    async fn get(&self, path: &str, query: &QueryPairs) -> GatewayResult<Value> {
        self.send(Method::GET, path, query, None).await
    }
}

#[async_trait]
impl GatewayWriter for HttpGateway {
    async fn post(&self, path: &str, body: &Value) -> GatewayResult<Value> {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> GatewayResult<Value> {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str) -> GatewayResult<Value> {
        self.send(Method::DELETE, path, &[], None).await
    }
}
