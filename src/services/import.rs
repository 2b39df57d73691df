//! External catalog import coordination
//!
//! Searches the external bibliographic source and turns a selected record
//! into a pre-filled draft: the free-text author name is resolved (or
//! created) through the resolver, availability defaults to true, and genre
//! plus exact published date stay open for manual completion. No loan or
//! availability synchronization happens at import time.

use std::sync::Arc;

use crate::error::ClientResult;
use crate::gateway::{Gateway, Method};
use crate::models::{Book, BookDraft, ExternalBookRecord, ExternalSearchResponse};

use super::catalog::CatalogService;
use super::resolver::AuthorResolver;

pub struct ImportService {
    gateway: Arc<dyn Gateway>,
    resolver: Arc<AuthorResolver>,
    catalog: CatalogService,
}

impl ImportService {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        resolver: Arc<AuthorResolver>,
        catalog: CatalogService,
    ) -> Self {
        Self {
            gateway,
            resolver,
            catalog,
        }
    }

    /// Free-text search against the external bibliographic source.
    pub async fn search_external(&self, query: &str) -> ClientResult<Vec<ExternalBookRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let path = format!("/external-books/search?q={}", urlencoding::encode(query));
        let response = self.gateway.request(Method::Get, &path, None).await?;
        let parsed: ExternalSearchResponse = serde_json::from_value(response.body)?;
        tracing::debug!(query, results = parsed.results.len(), "external search");
        Ok(parsed.results)
    }

    /// Turn an external record into a pre-filled draft.
    ///
    /// The author is resolved against the existing collection; a record
    /// without an author name yields a draft with the author left open.
    pub async fn import_external_book(
        &self,
        record: &ExternalBookRecord,
    ) -> ClientResult<BookDraft> {
        let author = match record.author.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                Some(self.resolver.resolve_author_by_name(name).await?)
            }
            _ => None,
        };

        Ok(BookDraft {
            title: record.title.clone(),
            isbn: record.isbn.clone(),
            // The source supplies a year at best; day and month default to
            // January 1st and may be corrected manually.
            published_date: record.year.map(|year| format!("{:04}-01-01", year)),
            available: true,
            author,
            genre_id: None,
        })
    }

    /// Create the book from a completed draft through the shared
    /// book-creation path.
    pub async fn create_from_draft(&self, draft: BookDraft) -> ClientResult<Book> {
        let payload = draft.into_payload()?;
        self.catalog.create_book(&payload).await
    }
}
