//! HTTP implementation of the gateway over reqwest

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

use super::{Gateway, GatewayResponse, Method};

/// Gateway speaking JSON over HTTP to the resource server.
///
/// Attaches the session's bearer token to every request and imposes the
/// configured timeout. Does not retry: a timed-out mutation may still have
/// been applied server-side, and replaying it is a caller decision.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl HttpGateway {
    pub fn new(config: &ServerConfig, session: Arc<Session>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Underlying reqwest client, shared with the login call.
    pub fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<GatewayResponse> {
        let token = self.session.token().await?;
        let url = format!("{}{}", self.base_url, path);

        let mut request = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        }
        .bearer_auth(token);

        if let Some(body) = body {
            request = request.json(&body);
        }

        tracing::debug!(method = method.as_str(), %url, "gateway request");
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                method = method.as_str(),
                %url,
                status = status.as_u16(),
                "server rejected request"
            );
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(GatewayResponse {
            status: status.as_u16(),
            body,
        })
    }
}
