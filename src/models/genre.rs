//! Genre model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Genre record as served by the resource server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Create/update payload for a genre.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct GenrePayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}
