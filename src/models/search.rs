//! Combined free-text search result

use serde::{Deserialize, Serialize};

use super::author::Author;
use super::book::Book;

/// Result of the combined search endpoint, keeping the matched books and
/// authors in separate lists. Consumers replace a displayed result set with
/// this; it is never used to mutate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResult {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.authors.is_empty()
    }
}
