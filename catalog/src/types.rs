//! Core types for the dog catalog API

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Default number of dogs per result page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Opaque, server-assigned dog identifier
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct DogId(String);

impl DogId {
    /// Wrap a raw identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DogId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A dog record as returned by `POST /dogs`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dog {
    /// Unique identifier
    pub id: DogId,
    /// Dog's name
    pub name: String,
    /// Breed name
    pub breed: String,
    /// Age in years
    pub age: u32,
    /// Location zip code
    pub zip_code: String,
    /// Image URL
    pub img: String,
}

/// Field the search results are ordered by
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Dog name
    Name,
    /// Breed name
    #[default]
    Breed,
    /// Age
    Age,
}

impl SortField {
    /// Wire name of the field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Breed => "breed",
            Self::Age => "age",
        }
    }
}

/// Ordering direction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// Wire name of the direction
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// The opposite direction
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort specification, rendered on the wire as `field:direction`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Sort {
    /// Field to order by
    pub field: SortField,
    /// Direction to order in
    pub direction: SortDirection,
}

impl Sort {
    /// Create a sort specification
    #[must_use]
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field.as_str(), self.direction.as_str())
    }
}

/// Canonical description of one result page
///
/// Built by the query state; the catalog client turns it into a search
/// request without interpreting it further.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Breed filter; empty means every breed
    pub breeds: BTreeSet<String>,
    /// Result ordering
    pub sort: Sort,
    /// 1-based page number
    pub page: u32,
    /// Results per page
    pub page_size: u32,
    /// Zip code filter; empty means anywhere
    pub zip_codes: BTreeSet<String>,
    /// Minimum age, inclusive
    pub age_min: Option<u32>,
    /// Maximum age, inclusive
    pub age_max: Option<u32>,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self {
            breeds: BTreeSet::new(),
            sort: Sort::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            zip_codes: BTreeSet::new(),
            age_min: None,
            age_max: None,
        }
    }
}

impl QueryDescriptor {
    /// Index of the first result on this page
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.page_size as u64
    }

    /// Query-string pairs for `GET /dogs/search`
    ///
    /// Multi-valued filters repeat their key once per value. `page`, `size`
    /// and `from` are always present.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .breeds
            .iter()
            .map(|breed| ("breeds".to_string(), breed.clone()))
            .collect();

        pairs.push(("sort".to_string(), self.sort.to_string()));
        pairs.extend(
            self.zip_codes
                .iter()
                .map(|zip| ("zipCodes".to_string(), zip.clone())),
        );
        if let Some(min) = self.age_min {
            pairs.push(("ageMin".to_string(), min.to_string()));
        }
        if let Some(max) = self.age_max {
            pairs.push(("ageMax".to_string(), max.to_string()));
        }
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("size".to_string(), self.page_size.to_string()));
        pairs.push(("from".to_string(), self.offset().to_string()));
        pairs
    }
}

/// Server-defined pagination token, passed back verbatim
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Cursor(pub String);

/// Result of the id search phase
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPage {
    /// Matching ids, in server order
    pub ids: Vec<DogId>,
    /// Total matches across all pages
    pub total: u64,
    /// Forward cursor
    pub next: Option<Cursor>,
    /// Backward cursor
    pub prev: Option<Cursor>,
}

/// A page of full dog records
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct DogPage {
    /// Dogs, in search order
    pub dogs: Vec<Dog>,
    /// Total matches across all pages
    pub total: u64,
    /// Forward cursor
    pub next: Option<Cursor>,
    /// Backward cursor
    pub prev: Option<Cursor>,
}

/// Wire shape of `GET /dogs/search`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub result_ids: Vec<DogId>,
    pub total: u64,
    #[serde(default)]
    pub next: Option<Cursor>,
    #[serde(default)]
    pub prev: Option<Cursor>,
}

impl From<SearchResponse> for SearchPage {
    fn from(response: SearchResponse) -> Self {
        Self {
            ids: response.result_ids,
            total: response.total,
            next: response.next,
            prev: response.prev,
        }
    }
}

/// Wire shape of `POST /dogs/match`
#[derive(Debug, Deserialize)]
pub(crate) struct MatchResponse {
    #[serde(rename = "match")]
    pub matched: DogId,
}

/// Wire shape of `POST /auth/login`
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
}
