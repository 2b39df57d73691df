//! Session management
//!
//! Holds the bearer token and role obtained from `/auth/login`. The role is
//! an external fact surfaced to callers (to hide privileged actions); it is
//! never used to enforce authorization on this side; that is the server's
//! job.

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};

/// Role id the server assigns to administrators.
pub const ADMIN_ROLE_ID: i32 = 1;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    username: String,
    #[serde(rename = "roleId")]
    role_id: i32,
}

/// Credentials of the logged-in staff member.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub token: String,
    pub username: String,
    pub role_id: i32,
}

/// Shared session store. All gateway requests read the token from here.
#[derive(Debug, Default)]
pub struct Session {
    current: RwLock<Option<SessionData>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate against the resource server and store the session.
    pub async fn login(
        &self,
        http: &reqwest::Client,
        base_url: &str,
        username: &str,
        password: &str,
    ) -> ClientResult<()> {
        let response = http
            .post(format!("{}/auth/login", base_url))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: LoginResponse = serde_json::from_str(&response.text().await?)?;
        tracing::info!(username = %body.username, role_id = body.role_id, "logged in");

        *self.current.write().await = Some(SessionData {
            token: body.token,
            username: body.username,
            role_id: body.role_id,
        });
        Ok(())
    }

    /// Bearer token for the current session.
    pub async fn token(&self) -> ClientResult<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or(ClientError::NoSession)
    }

    pub async fn username(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.username.clone())
    }

    pub async fn is_admin(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.role_id == ADMIN_ROLE_ID)
            .unwrap_or(false)
    }

    /// Drop the current session data.
    pub async fn logout(&self) {
        *self.current.write().await = None;
    }
}
