//! Actions handled by the application reducers

use crate::state::User;
use pawfetch_catalog::{CatalogError, Dog, DogId, DogPage, Sort, SortField};
use std::collections::BTreeSet;

/// Every input to the application: user intent and effect results
#[derive(Clone, Debug, PartialEq)]
pub enum AppAction {
    // Session
    /// Resume from the stored user, if any
    RestoreSession,
    /// The stored user's session is still valid
    SessionRestored {
        /// Session epoch when the check started
        epoch: u64,
        /// The stored user
        user: User,
    },
    /// The stored session was rejected or could not be checked
    SessionRejected {
        /// Session epoch when the check started
        epoch: u64,
    },
    /// Sign in
    Login {
        /// Display name
        name: String,
        /// Email
        email: String,
    },
    /// The server accepted the login
    LoginSucceeded {
        /// The new user
        user: User,
    },
    /// The server rejected the login
    LoginFailed {
        /// Why
        error: CatalogError,
    },
    /// Sign out
    Logout,
    /// The server ended the session
    LoggedOut {
        /// Session epoch when the logout started
        epoch: u64,
    },
    /// The server did not end the session
    LogoutFailed {
        /// Session epoch when the logout started
        epoch: u64,
        /// Why
        error: CatalogError,
    },

    // Breeds
    /// Fetch the breed list
    LoadBreeds,
    /// Breed list result
    BreedsLoaded {
        /// Session epoch when the fetch started
        epoch: u64,
        /// Sorted breeds or the failure
        result: Result<Vec<String>, CatalogError>,
    },

    // Query
    /// Replace the breed filter
    SetBreeds {
        /// New filter
        breeds: BTreeSet<String>,
    },
    /// Add or remove one breed from the filter
    ToggleBreed {
        /// Breed name
        breed: String,
    },
    /// Set the sort
    SetSort {
        /// New sort
        sort: Sort,
    },
    /// Sort by a column, flipping direction if it already is
    ToggleSortField {
        /// Column
        field: SortField,
    },
    /// Jump to a page
    SetPage {
        /// Page; 0 is treated as 1
        page: u32,
    },
    /// Next page
    NextPage,
    /// Previous page
    PreviousPage,
    /// Replace the zip code filter
    SetZipCodes {
        /// New filter
        zip_codes: BTreeSet<String>,
    },
    /// Replace the age range
    SetAgeRange {
        /// Minimum age
        min: Option<u32>,
        /// Maximum age
        max: Option<u32>,
    },
    /// Fetch the current query again
    Refresh,

    // Results
    /// A page fetch finished
    PageLoaded {
        /// Session epoch when the fetch began
        epoch: u64,
        /// Sequence number stamped when the fetch began
        sequence: u64,
        /// The page or the failure
        result: Result<DogPage, CatalogError>,
    },

    // Favorites
    /// Mark a favorite
    AddFavorite {
        /// Dog
        id: DogId,
    },
    /// Unmark a favorite
    RemoveFavorite {
        /// Dog
        id: DogId,
    },
    /// Flip a favorite
    ToggleFavorite {
        /// Dog
        id: DogId,
    },

    // Match
    /// Ask for a match among the favorites
    RequestMatch,
    /// The match and its details arrived
    MatchFound {
        /// Token of the request this answers
        request: u64,
        /// The matched dog
        dog: Dog,
    },
    /// Matching failed at either step
    MatchFailed {
        /// Session epoch when the request started
        epoch: u64,
        /// Token of the request this answers
        request: u64,
        /// Why
        error: CatalogError,
    },
    /// Hide the match
    DismissMatch,
    /// Hide the notification
    DismissNotification,
}

impl AppAction {
    /// The catalog error carried by this action, if any
    #[must_use]
    pub const fn catalog_error(&self) -> Option<&CatalogError> {
        match self {
            Self::LoginFailed { error }
            | Self::LogoutFailed { error, .. }
            | Self::MatchFailed { error, .. }
            | Self::BreedsLoaded { result: Err(error), .. }
            | Self::PageLoaded { result: Err(error), .. } => Some(error),
            _ => None,
        }
    }

    /// Session epoch stamped on a session-bound effect result
    ///
    /// `None` for user intents and for results that are not tied to a
    /// session (login).
    #[must_use]
    pub const fn epoch(&self) -> Option<u64> {
        match self {
            Self::SessionRestored { epoch, .. }
            | Self::SessionRejected { epoch }
            | Self::LoggedOut { epoch }
            | Self::LogoutFailed { epoch, .. }
            | Self::BreedsLoaded { epoch, .. }
            | Self::PageLoaded { epoch, .. }
            | Self::MatchFailed { epoch, .. } => Some(*epoch),
            _ => None,
        }
    }

    /// Whether this action reports that the session has ended
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self.catalog_error(), Some(CatalogError::Unauthenticated))
    }
}
