//! Remote resource gateway
//!
//! Every remote interaction goes through the [`Gateway`] trait: an
//! HTTP-style verb, a resource path and an optional JSON body, resolving
//! exactly once with a 2xx response or a typed failure. The gateway never
//! retries on its own; several callers sequence dependent mutations and must
//! not have a half-applied step replayed underneath them.

pub mod http;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientResult;

pub use http::HttpGateway;

/// HTTP-style verb accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether a request with this verb changes server state.
    pub fn is_mutation(self) -> bool {
        !matches!(self, Method::Get)
    }
}

/// Resource collections exposed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Books,
    Authors,
    Genres,
    Loans,
    Users,
    Events,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Books => "/books",
            Resource::Authors => "/authors",
            Resource::Genres => "/genres",
            Resource::Loans => "/loans",
            Resource::Users => "/users",
            Resource::Events => "/events",
        }
    }

    pub fn item_path(self, id: i32) -> String {
        format!("{}/{}", self.path(), id)
    }
}

/// Successful (2xx) gateway response.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` for empty bodies (e.g. 204).
    pub body: Value,
}

/// Boundary to the resource server.
///
/// Implementations must resolve every call exactly once: `Ok` for a 2xx
/// response, `Err` for transport failures, timeouts, non-2xx statuses and
/// undecodable bodies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<GatewayResponse>;
}

/// GET a whole collection.
pub async fn fetch_all<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    resource: Resource,
) -> ClientResult<Vec<T>> {
    let response = gateway.request(Method::Get, resource.path(), None).await?;
    Ok(serde_json::from_value(response.body)?)
}

/// GET a single record by id.
pub async fn fetch_one<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    resource: Resource,
    id: i32,
) -> ClientResult<T> {
    let response = gateway
        .request(Method::Get, &resource.item_path(id), None)
        .await?;
    Ok(serde_json::from_value(response.body)?)
}

/// POST a new record; the server answers with the created record.
pub async fn create<T: DeserializeOwned, P: Serialize>(
    gateway: &dyn Gateway,
    resource: Resource,
    payload: &P,
) -> ClientResult<T> {
    let body = serde_json::to_value(payload)?;
    let response = gateway
        .request(Method::Post, resource.path(), Some(body))
        .await?;
    Ok(serde_json::from_value(response.body)?)
}

/// PUT a full-record replacement by id. The server replaces the whole
/// record, so the payload must carry every field.
pub async fn update<T: DeserializeOwned, P: Serialize>(
    gateway: &dyn Gateway,
    resource: Resource,
    id: i32,
    payload: &P,
) -> ClientResult<T> {
    let body = serde_json::to_value(payload)?;
    let response = gateway
        .request(Method::Put, &resource.item_path(id), Some(body))
        .await?;
    Ok(serde_json::from_value(response.body)?)
}

/// DELETE a record by id (200/204 on success).
pub async fn remove(gateway: &dyn Gateway, resource: Resource, id: i32) -> ClientResult<()> {
    gateway
        .request(Method::Delete, &resource.item_path(id), None)
        .await?;
    Ok(())
}
