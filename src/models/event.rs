//! Library event model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Scheduled library event (reading club, talk, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Create/update payload for an event.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub content: Option<String>,
    pub address: Option<String>,
    #[validate(length(min = 1, message = "date is required"))]
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}
