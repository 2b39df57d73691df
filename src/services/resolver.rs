//! Author entity resolution
//!
//! The server enforces no uniqueness on author names, so deduplication is a
//! client responsibility: a free-text name is matched against the existing
//! collection under a normalized form before any create.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{ClientError, ClientResult};
use crate::gateway::{self, Gateway, Resource};
use crate::models::{Author, AuthorPayload};

/// Normalized comparison key for an author name: Unicode-decomposed,
/// combining marks stripped, lower-cased, trimmed.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Resolves free-text author names to stable author ids, creating the
/// author when no match exists.
///
/// Creation is single-flighted per normalized name: concurrent resolutions
/// of the same name serialize on a per-key lock, so the second caller finds
/// the record the first one created instead of duplicating it.
pub struct AuthorResolver {
    gateway: Arc<dyn Gateway>,
    name_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AuthorResolver {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            name_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.name_locks.lock().await;
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Evict the lock entry once no task holds or awaits it, so the map
    /// does not grow with every name ever resolved.
    async fn release_lock(&self, key: &str) {
        let mut locks = self.name_locks.lock().await;
        if let Some(entry) = locks.get(key) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(key);
            }
        }
    }

    /// Find the author matching `name` under normalized comparison, or
    /// create one with placeholder fields and return its handle.
    pub async fn resolve_author_by_name(&self, name: &str) -> ClientResult<Author> {
        let raw = name.trim();
        if raw.is_empty() {
            return Err(ClientError::Resolution("empty author name".into()));
        }
        let key = normalize_name(raw);

        let lock = self.lock_for(&key).await;
        let result = {
            let _guard = lock.lock().await;
            self.resolve_locked(raw, &key).await
        };
        drop(lock);
        self.release_lock(&key).await;
        result
    }

    async fn resolve_locked(&self, raw: &str, key: &str) -> ClientResult<Author> {
        // Fresh read under the lock: a concurrent resolution of the same
        // name has already finished by the time we get here.
        let authors: Vec<Author> = gateway::fetch_all(self.gateway.as_ref(), Resource::Authors).await?;

        let mut matches = authors
            .into_iter()
            .filter(|author| normalize_name(&author.name) == key);

        if let Some(author) = matches.next() {
            if let Some(other) = matches.next() {
                return Err(ClientError::Resolution(format!(
                    "authors {} and {} both match \"{}\"; merge them before importing",
                    author.id, other.id, raw
                )));
            }
            tracing::debug!(author_id = author.id, name = raw, "author matched");
            return Ok(author);
        }

        let created: Author = gateway::create(
            self.gateway.as_ref(),
            Resource::Authors,
            &AuthorPayload::placeholder(raw),
        )
        .await?;
        tracing::info!(author_id = created.id, name = raw, "author created");
        Ok(created)
    }
}
