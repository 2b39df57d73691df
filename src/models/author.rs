//! Author model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Author record as served by the resource server.
///
/// Uniqueness by name is not enforced server-side; the resolver performs a
/// normalized comparison before any create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default, rename = "birthDate")]
    pub birth_date: Option<String>,
}

/// Create/update payload for an author.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AuthorPayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(rename = "birthDate")]
    pub birth_date: String,
    pub nationality: String,
}

impl AuthorPayload {
    /// Payload for an author known only by name, e.g. from an external
    /// catalog record. Birth date and nationality are placeholders for
    /// later manual completion.
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            birth_date: "0000-01-01".to_string(),
            nationality: "Unknown".to_string(),
        }
    }
}
