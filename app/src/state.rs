//! Application state owned by the store

use crate::coordinator::ResultCoordinator;
use crate::favorites::FavoritesStore;
use crate::query::SearchQuery;
use pawfetch_catalog::Dog;
use serde::{Deserialize, Serialize};

/// The signed-in user, persisted under the `user` key
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Display name
    pub name: String,
    /// Email; also the identity that owns favorites
    pub email: String,
}

impl User {
    /// Create a user
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Session lifecycle
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Not yet restored
    #[default]
    Unknown,
    /// No valid session
    SignedOut,
    /// Signed in as the given user
    SignedIn(User),
}

impl SessionStatus {
    /// The signed-in user, if any
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            _ => None,
        }
    }

    /// Whether a user is signed in
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }
}

/// Match workflow
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum MatchStatus {
    /// No match shown or requested
    #[default]
    Idle,
    /// Waiting for the match and its details
    Requesting {
        /// Token the result must carry to be shown
        request: u64,
    },
    /// The matched dog
    Found(Dog),
}

impl MatchStatus {
    /// Token of the request being waited on, if any
    #[must_use]
    pub const fn pending_request(&self) -> Option<u64> {
        match self {
            Self::Requesting { request } => Some(*request),
            _ => None,
        }
    }
}

/// Everything the UI renders from
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Session lifecycle
    pub session: SessionStatus,
    /// Bumped on every sign-in and sign-out; stamped on session-bound effects
    pub session_epoch: u64,
    /// Filter, sort, and page
    pub query: SearchQuery,
    /// Authoritative results
    pub results: ResultCoordinator,
    /// Favorites of the signed-in user
    pub favorites: FavoritesStore,
    /// Breed names for the filter
    pub breeds: Vec<String>,
    /// Match workflow
    pub matching: MatchStatus,
    /// Last issued match token; never reused
    pub match_requests: u64,
    /// Dismissable user-visible message
    pub notification: Option<String>,
}

impl AppState {
    /// Initial state with a custom page size
    #[must_use]
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            query: SearchQuery::new(page_size),
            ..Self::default()
        }
    }

    /// Start a match request and return its token
    pub fn begin_match(&mut self) -> u64 {
        self.match_requests += 1;
        self.matching = MatchStatus::Requesting {
            request: self.match_requests,
        };
        self.match_requests
    }

    /// Drop the displayed match and abandon any pending request
    pub fn clear_match(&mut self) {
        self.match_requests += 1;
        self.matching = MatchStatus::Idle;
    }

    /// The displayed match, if any
    #[must_use]
    pub const fn matched_dog(&self) -> Option<&Dog> {
        match &self.matching {
            MatchStatus::Found(dog) => Some(dog),
            _ => None,
        }
    }
}
