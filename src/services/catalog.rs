//! Catalog access service
//!
//! Thin typed passthroughs for the server's resource collections plus the
//! combined free-text search. Mutations that must stay consistent with the
//! loan state live in the reservations service, not here.

use std::sync::Arc;

use validator::Validate;

use crate::error::{ClientError, ClientResult};
use crate::gateway::{self, Gateway, Method, Resource};
use crate::models::{
    Author, AuthorPayload, Book, BookPayload, Event, EventPayload, Genre, GenrePayload,
    SearchResult, User, UserPayload,
};

#[derive(Clone)]
pub struct CatalogService {
    gateway: Arc<dyn Gateway>,
}

impl CatalogService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self { gateway }
    }

    fn validated<T: Validate>(payload: &T) -> ClientResult<()> {
        payload
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))
    }

    // Books

    pub async fn list_books(&self) -> ClientResult<Vec<Book>> {
        gateway::fetch_all(self.gateway.as_ref(), Resource::Books).await
    }

    pub async fn get_book(&self, id: i32) -> ClientResult<Book> {
        gateway::fetch_one(self.gateway.as_ref(), Resource::Books, id).await
    }

    /// Shared creation path for manually entered and imported books.
    pub async fn create_book(&self, payload: &BookPayload) -> ClientResult<Book> {
        Self::validated(payload)?;
        let book: Book = gateway::create(self.gateway.as_ref(), Resource::Books, payload).await?;
        tracing::info!(book_id = book.id, title = %book.title, "book created");
        Ok(book)
    }

    /// Full-record replace; `payload` must carry every field.
    pub async fn update_book(&self, id: i32, payload: &BookPayload) -> ClientResult<Book> {
        Self::validated(payload)?;
        gateway::update(self.gateway.as_ref(), Resource::Books, id, payload).await
    }

    pub async fn delete_book(&self, id: i32) -> ClientResult<()> {
        gateway::remove(self.gateway.as_ref(), Resource::Books, id).await
    }

    // Authors

    pub async fn list_authors(&self) -> ClientResult<Vec<Author>> {
        gateway::fetch_all(self.gateway.as_ref(), Resource::Authors).await
    }

    pub async fn create_author(&self, payload: &AuthorPayload) -> ClientResult<Author> {
        Self::validated(payload)?;
        gateway::create(self.gateway.as_ref(), Resource::Authors, payload).await
    }

    pub async fn update_author(&self, id: i32, payload: &AuthorPayload) -> ClientResult<Author> {
        Self::validated(payload)?;
        gateway::update(self.gateway.as_ref(), Resource::Authors, id, payload).await
    }

    pub async fn delete_author(&self, id: i32) -> ClientResult<()> {
        gateway::remove(self.gateway.as_ref(), Resource::Authors, id).await
    }

    // Genres

    pub async fn list_genres(&self) -> ClientResult<Vec<Genre>> {
        gateway::fetch_all(self.gateway.as_ref(), Resource::Genres).await
    }

    pub async fn create_genre(&self, payload: &GenrePayload) -> ClientResult<Genre> {
        Self::validated(payload)?;
        gateway::create(self.gateway.as_ref(), Resource::Genres, payload).await
    }

    pub async fn update_genre(&self, id: i32, payload: &GenrePayload) -> ClientResult<Genre> {
        Self::validated(payload)?;
        gateway::update(self.gateway.as_ref(), Resource::Genres, id, payload).await
    }

    pub async fn delete_genre(&self, id: i32) -> ClientResult<()> {
        gateway::remove(self.gateway.as_ref(), Resource::Genres, id).await
    }

    // Events

    pub async fn list_events(&self) -> ClientResult<Vec<Event>> {
        gateway::fetch_all(self.gateway.as_ref(), Resource::Events).await
    }

    pub async fn create_event(&self, payload: &EventPayload) -> ClientResult<Event> {
        Self::validated(payload)?;
        gateway::create(self.gateway.as_ref(), Resource::Events, payload).await
    }

    pub async fn update_event(&self, id: i32, payload: &EventPayload) -> ClientResult<Event> {
        Self::validated(payload)?;
        gateway::update(self.gateway.as_ref(), Resource::Events, id, payload).await
    }

    pub async fn delete_event(&self, id: i32) -> ClientResult<()> {
        gateway::remove(self.gateway.as_ref(), Resource::Events, id).await
    }

    // Users

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        gateway::fetch_all(self.gateway.as_ref(), Resource::Users).await
    }

    pub async fn get_user(&self, id: i32) -> ClientResult<User> {
        gateway::fetch_one(self.gateway.as_ref(), Resource::Users, id).await
    }

    pub async fn create_user(&self, payload: &UserPayload) -> ClientResult<User> {
        Self::validated(payload)?;
        let user: User = gateway::create(self.gateway.as_ref(), Resource::Users, payload).await?;
        tracing::info!(user_id = user.id, username = %user.username, "user created");
        Ok(user)
    }

    pub async fn update_user(&self, id: i32, payload: &UserPayload) -> ClientResult<User> {
        Self::validated(payload)?;
        gateway::update(self.gateway.as_ref(), Resource::Users, id, payload).await
    }

    pub async fn delete_user(&self, id: i32) -> ClientResult<()> {
        gateway::remove(self.gateway.as_ref(), Resource::Users, id).await
    }

    // Search

    /// Combined free-text search over books and authors.
    pub async fn search(&self, query: &str) -> ClientResult<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchResult::default());
        }
        let path = format!("/search/?query={}", urlencoding::encode(query));
        let response = self.gateway.request(Method::Get, &path, None).await?;
        Ok(serde_json::from_value(response.body)?)
    }
}
