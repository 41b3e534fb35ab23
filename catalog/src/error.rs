//! Error types for the dog catalog client

use thiserror::Error;

/// Errors that can occur when talking to the catalog API
///
/// `Clone` and `PartialEq` so results can travel inside actions and be
/// compared in tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The call was rejected locally before any network traffic
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// `GET /dogs/search` returned a non-success status
    #[error("Failed to fetch dog IDs (status {status})")]
    SearchFailed {
        /// HTTP status code
        status: u16,
    },

    /// `POST /dogs` returned a non-success status
    #[error("Failed to fetch dog details (status {status})")]
    DetailsFailed {
        /// HTTP status code
        status: u16,
    },

    /// `POST /dogs/match` returned a non-success status
    #[error("Failed to find a match (status {status})")]
    MatchFailed {
        /// HTTP status code
        status: u16,
    },

    /// The session is no longer valid; the stored user has been removed
    #[error("Unauthenticated - session is no longer valid")]
    Unauthenticated,

    /// `GET /dogs/breeds` returned a non-success status
    #[error("Failed to fetch breeds (status {status})")]
    BreedsFailed {
        /// HTTP status code
        status: u16,
    },

    /// `POST /auth/login` returned a non-success status
    #[error("Login failed (status {status})")]
    LoginFailed {
        /// HTTP status code
        status: u16,
    },

    /// `POST /auth/logout` returned a non-success status
    #[error("Logout failed (status {status})")]
    LogoutFailed {
        /// HTTP status code
        status: u16,
    },

    /// The details response did not include a requested dog
    #[error("No details returned for dog {id}")]
    MissingDetails {
        /// The id that came back empty
        id: String,
    },

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// The response body could not be decoded
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The call did not finish within the configured timeout
    #[error("Request timed out")]
    Timeout,
}

impl CatalogError {
    /// Whether the failure means the session has ended
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }
}
