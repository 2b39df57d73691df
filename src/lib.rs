//! Atheneum Library Management Client
//!
//! Typed async client for the Atheneum resource server: browsing and
//! mutating books, authors, genres, events, users and loans, searching an
//! external catalog, and importing from it. The reservation workflow keeps
//! a book's availability flag consistent with its loans across two
//! independently failable remote calls; see `services::reservations`.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{ClientError, ClientResult};

use gateway::HttpGateway;
use services::Services;
use session::Session;

/// Entry point wiring configuration, session, gateway and services.
#[derive(Clone)]
pub struct Client {
    pub config: Arc<AppConfig>,
    pub session: Arc<Session>,
    pub services: Arc<Services>,
    gateway: Arc<HttpGateway>,
}

impl Client {
    pub fn new(config: AppConfig) -> ClientResult<Self> {
        let session = Arc::new(Session::new());
        let gateway = Arc::new(HttpGateway::new(&config.server, session.clone())?);
        let services = Arc::new(Services::new(gateway.clone()));
        Ok(Self {
            config: Arc::new(config),
            session,
            services,
            gateway,
        })
    }

    /// Authenticate against the resource server; all subsequent gateway
    /// requests carry the obtained bearer token.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        self.session
            .login(
                self.gateway.http_client(),
                self.gateway.base_url(),
                username,
                password,
            )
            .await
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }
}
