//! Per-identity favorites
//!
//! The set belongs to exactly one identity at a time and is stored under
//! `favorites_{identity}` as a JSON array of ids. Every change writes the whole
//! set; there is no merging with what was stored before.

use crate::storage::favorites_key;
use pawfetch_catalog::DogId;
use pawfetch_core::environment::{KeyValueStore, StorageError};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from favorites operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FavoritesError {
    /// No identity is active, so there is nowhere to store the change
    #[error("No signed-in user to own favorites")]
    NoIdentity,

    /// The persisted set could not be read
    #[error("Favorites storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Favorites of the active identity
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FavoritesStore {
    identity: Option<String>,
    favorites: BTreeSet<DogId>,
}

impl FavoritesStore {
    /// Switch to `identity` and load its persisted set
    ///
    /// The previous identity's set is dropped from memory, never carried
    /// over. Missing data is the empty set. Corrupt data is logged and
    /// treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Storage`] if storage cannot be read; the
    /// store is then active for `identity` with an empty set.
    pub fn initialize(
        &mut self,
        identity: &str,
        storage: &dyn KeyValueStore,
    ) -> Result<&BTreeSet<DogId>, FavoritesError> {
        self.identity = Some(identity.to_string());
        self.favorites.clear();

        let key = favorites_key(identity);
        if let Some(raw) = storage.get(&key)? {
            match serde_json::from_str::<Vec<DogId>>(&raw) {
                Ok(ids) => self.favorites.extend(ids),
                Err(error) => {
                    tracing::warn!(key = %key, %error, "Ignoring corrupt favorites");
                },
            }
        }

        tracing::debug!(count = self.favorites.len(), "Favorites loaded");
        Ok(&self.favorites)
    }

    /// Add `id`; returns whether the set changed
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::NoIdentity`] if no identity is active.
    pub fn add(&mut self, id: DogId, storage: &dyn KeyValueStore) -> Result<bool, FavoritesError> {
        let identity = self.identity.as_deref().ok_or(FavoritesError::NoIdentity)?;
        if self.favorites.contains(&id) {
            return Ok(false);
        }

        self.favorites.insert(id);
        persist(identity, &self.favorites, storage);
        Ok(true)
    }

    /// Remove `id`; returns whether the set changed
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::NoIdentity`] if no identity is active.
    pub fn remove(&mut self, id: &DogId, storage: &dyn KeyValueStore) -> Result<bool, FavoritesError> {
        let identity = self.identity.as_deref().ok_or(FavoritesError::NoIdentity)?;
        if !self.favorites.remove(id) {
            return Ok(false);
        }

        persist(identity, &self.favorites, storage);
        Ok(true)
    }

    /// Forget the active identity; persisted data is untouched
    pub fn detach(&mut self) {
        self.identity = None;
        self.favorites.clear();
    }

    /// The current set
    #[must_use]
    pub const fn current_set(&self) -> &BTreeSet<DogId> {
        &self.favorites
    }

    /// Whether `id` is a favorite
    #[must_use]
    pub fn contains(&self, id: &DogId) -> bool {
        self.favorites.contains(id)
    }

    /// The active identity
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

// Best-effort: the in-memory change stands even if the write fails.
fn persist(identity: &str, favorites: &BTreeSet<DogId>, storage: &dyn KeyValueStore) {
    let key = favorites_key(identity);
    let result = serde_json::to_string(favorites)
        .map_err(|e| StorageError::Io(e.to_string()))
        .and_then(|json| storage.set(&key, &json));

    if let Err(error) = result {
        tracing::warn!(key = %key, %error, "Failed to persist favorites");
        metrics::counter!("pawfetch.favorites.persist_failed").increment(1);
    }
}
