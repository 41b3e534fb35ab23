//! Result coordinator
//!
//! Decides which fetch is authoritative. Every fetch is stamped with a
//! sequence number from [`ResultCoordinator::begin`]; a resolution is applied
//! only if its number is still the latest. Network completion order never
//! matters.

use pawfetch_catalog::{CatalogError, Dog, DogPage};

/// What the results area shows
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Nothing requested (signed out, or invalidated)
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The latest fetch succeeded; an empty page is a valid result
    Loaded(DogPage),
    /// The latest fetch failed
    Error(CatalogError),
}

/// Outcome of [`ResultCoordinator::resolve`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The result was the latest and is now shown
    Applied,
    /// A newer fetch was issued; the result was dropped
    Stale,
    /// The session ended; the coordinator went idle
    Unauthenticated,
}

/// Owner of the authoritative sequence number
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ResultCoordinator {
    latest: u64,
    status: FetchStatus,
}

impl ResultCoordinator {
    /// Start a fetch: move to `Loading` and return its sequence number
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.status = FetchStatus::Loading;
        self.latest
    }

    /// Apply the result of fetch `sequence` if it is still the latest
    ///
    /// A stale result is dropped whatever it carries, a 401 included. A
    /// current `Unauthenticated` moves the coordinator to `Idle` and is never
    /// shown as a catalog error.
    pub fn resolve(&mut self, sequence: u64, result: Result<DogPage, CatalogError>) -> Resolution {
        if sequence != self.latest {
            tracing::debug!(sequence, latest = self.latest, "Discarding stale result");
            metrics::counter!("pawfetch.results.stale").increment(1);
            return Resolution::Stale;
        }

        let status = match result {
            Ok(page) => FetchStatus::Loaded(page),
            Err(CatalogError::Unauthenticated) => {
                self.invalidate();
                return Resolution::Unauthenticated;
            },
            Err(error) => FetchStatus::Error(error),
        };
        self.status = status;
        Resolution::Applied
    }

    /// Drop whatever is in flight and go `Idle` without starting a fetch
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.status = FetchStatus::Idle;
    }

    /// Current status
    #[must_use]
    pub const fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Latest issued sequence number
    #[must_use]
    pub const fn latest(&self) -> u64 {
        self.latest
    }

    /// Dogs on the loaded page, empty otherwise
    #[must_use]
    pub fn dogs(&self) -> &[Dog] {
        match &self.status {
            FetchStatus::Loaded(page) => &page.dogs,
            _ => &[],
        }
    }

    /// Total matches reported by the loaded page
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        match &self.status {
            FetchStatus::Loaded(page) => Some(page.total),
            _ => None,
        }
    }

    /// The failure of the latest fetch, if it failed
    #[must_use]
    pub const fn error(&self) -> Option<&CatalogError> {
        match &self.status {
            FetchStatus::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Whether a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, FetchStatus::Loading)
    }
}
