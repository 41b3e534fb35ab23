//! Search query state
//!
//! Owns the filter, sort, and page the user has chosen. Each mutation returns
//! a [`QueryChange`] with a fresh revision and the resulting descriptor, so
//! the caller can start a fetch for exactly that state.

use pawfetch_catalog::{QueryDescriptor, Sort, SortDirection, SortField};
use std::collections::BTreeSet;

/// Notification produced by every query mutation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryChange {
    /// Strictly increasing per mutation
    pub revision: u64,
    /// The query after the mutation
    pub descriptor: QueryDescriptor,
}

/// Current filter, sort, and page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    descriptor: QueryDescriptor,
    revision: u64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new(QueryDescriptor::default().page_size)
    }
}

impl SearchQuery {
    /// A query on page 1, sorted by breed ascending, with no filters
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            descriptor: QueryDescriptor {
                page_size: page_size.max(1),
                ..QueryDescriptor::default()
            },
            revision: 0,
        }
    }

    /// Replace the breed filter
    pub fn set_breeds(&mut self, breeds: BTreeSet<String>) -> QueryChange {
        self.descriptor.breeds = breeds;
        self.reset_page()
    }

    /// Add `breed` to the filter, or remove it if already present
    pub fn toggle_breed(&mut self, breed: &str) -> QueryChange {
        if !self.descriptor.breeds.remove(breed) {
            self.descriptor.breeds.insert(breed.to_string());
        }
        self.reset_page()
    }

    /// Replace the zip code filter
    pub fn set_zip_codes(&mut self, zip_codes: BTreeSet<String>) -> QueryChange {
        self.descriptor.zip_codes = zip_codes;
        self.reset_page()
    }

    /// Replace the age range; `None` leaves that side open
    pub fn set_age_range(&mut self, min: Option<u32>, max: Option<u32>) -> QueryChange {
        self.descriptor.age_min = min;
        self.descriptor.age_max = max;
        self.reset_page()
    }

    /// Set field and direction
    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) -> QueryChange {
        self.descriptor.sort = Sort::new(field, direction);
        self.reset_page()
    }

    /// Flip the direction if `field` is already the sort field; otherwise
    /// sort by `field` ascending
    pub fn toggle_sort_field(&mut self, field: SortField) -> QueryChange {
        let sort = self.descriptor.sort;
        self.descriptor.sort = if sort.field == field {
            Sort::new(field, sort.direction.flipped())
        } else {
            Sort::new(field, SortDirection::Ascending)
        };
        self.reset_page()
    }

    /// Jump to `page`; values below 1 are clamped to 1
    pub fn set_page(&mut self, page: u32) -> QueryChange {
        self.descriptor.page = page.max(1);
        self.changed()
    }

    /// Advance one page; the server decides whether it has results
    pub fn next_page(&mut self) -> QueryChange {
        self.descriptor.page = self.descriptor.page.saturating_add(1);
        self.changed()
    }

    /// Go back one page; `None` (and no change) on page 1
    pub fn previous_page(&mut self) -> Option<QueryChange> {
        if self.descriptor.page <= 1 {
            return None;
        }
        self.descriptor.page -= 1;
        Some(self.changed())
    }

    /// Immutable copy of the current query
    #[must_use]
    pub fn snapshot(&self) -> QueryDescriptor {
        self.descriptor.clone()
    }

    /// Current page number
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.descriptor.page
    }

    /// Current sort
    #[must_use]
    pub const fn sort(&self) -> Sort {
        self.descriptor.sort
    }

    /// Current breed filter
    #[must_use]
    pub const fn breeds(&self) -> &BTreeSet<String> {
        &self.descriptor.breeds
    }

    /// Revision of the most recent change
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    fn reset_page(&mut self) -> QueryChange {
        self.descriptor.page = 1;
        self.changed()
    }

    fn changed(&mut self) -> QueryChange {
        self.revision += 1;
        QueryChange {
            revision: self.revision,
            descriptor: self.descriptor.clone(),
        }
    }
}
