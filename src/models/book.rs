//! Book model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ClientError, ClientResult};

use super::author::Author;
use super::genre::Genre;

/// ISBN format accepted by the server: `XXX-XX-XXXXXX-XX`, digits only.
pub static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{2}-\d{6}-\d{2}$").expect("valid ISBN regex"));

/// Book record as served by the resource server.
///
/// Author and genre arrive nested; the update endpoint however takes flat
/// `authorId`/`genreId` references, see [`BookPayload`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    /// May carry a time suffix (`2001-05-03T00:00:00`); the update endpoint
    /// only accepts the date part.
    pub published_date: String,
    pub available: bool,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub genre: Option<Genre>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Book {
    /// Date part of `published_date`, without any time suffix.
    pub fn published_date_only(&self) -> &str {
        self.published_date
            .split('T')
            .next()
            .unwrap_or(&self.published_date)
    }

    /// Full-replace payload echoing every field of this record with the
    /// availability flag set to `available`.
    ///
    /// The update endpoint replaces the whole record; any omitted field is
    /// lost. Author and genre are mandatory references, so a record missing
    /// either cannot be updated and the caller must abort before mutating
    /// anything else.
    pub fn replace_payload(&self, available: bool) -> ClientResult<BookPayload> {
        let author = self.author.as_ref().ok_or_else(|| {
            ClientError::Precondition(format!("book {} has no author assigned", self.id))
        })?;
        let genre = self.genre.as_ref().ok_or_else(|| {
            ClientError::Precondition(format!("book {} has no genre assigned", self.id))
        })?;

        Ok(BookPayload {
            title: self.title.clone(),
            author_id: author.id,
            isbn: self.isbn.clone(),
            published_date: self.published_date_only().to_string(),
            genre_id: genre.id,
            available,
        })
    }
}

/// Full-record write payload for POST and PUT on `/books`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub author_id: i32,
    #[validate(regex(path = *ISBN_RE, message = "ISBN must match XXX-XX-XXXXXX-XX"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "published date is required"))]
    pub published_date: String,
    pub genre_id: i32,
    pub available: bool,
}

/// Pre-filled book awaiting manual completion before creation.
///
/// Produced by the import coordinator from an external catalog record. The
/// external source rarely supplies a genre and often gives only a year, so
/// those stay open until a staff member fills them in.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub isbn: Option<String>,
    pub published_date: Option<String>,
    pub available: bool,
    pub author: Option<Author>,
    pub genre_id: Option<i32>,
}

impl BookDraft {
    /// Finalize the draft into a create payload. All references must have
    /// been completed by now.
    pub fn into_payload(self) -> ClientResult<BookPayload> {
        let author = self
            .author
            .ok_or_else(|| ClientError::Validation("draft has no author".into()))?;
        let genre_id = self
            .genre_id
            .ok_or_else(|| ClientError::Validation("draft has no genre".into()))?;

        Ok(BookPayload {
            title: self.title,
            author_id: author.id,
            isbn: self.isbn.unwrap_or_default(),
            published_date: self.published_date.unwrap_or_default(),
            genre_id,
            available: self.available,
        })
    }
}
