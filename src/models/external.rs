//! Records from the external bibliographic source
//!
//! Untrusted input: any field but the title may be missing or malformed.
//! Never persisted directly; only used as input to the import coordinator.

use serde::{Deserialize, Serialize};

/// One search hit from the external catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalBookRecord {
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Envelope returned by the external search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalSearchResponse {
    #[serde(default)]
    pub results: Vec<ExternalBookRecord>,
}
