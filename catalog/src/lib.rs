//! # Pawfetch Catalog
//!
//! Client for the adoptable-dog catalog API.
//!
//! A result page is fetched in two phases: `GET /dogs/search` returns the ids
//! on the page, then `POST /dogs` returns their records. The client also
//! exposes the match, breed list, and session calls. Every request goes
//! through an [`AuthenticatedGateway`] that reports 401 as
//! [`CatalogError::Unauthenticated`].
//!
//! ## Example
//!
//! ```no_run
//! use pawfetch_catalog::{DogCatalogClient, QueryDescriptor, ReqwestTransport, DEFAULT_BASE_URL};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = ReqwestTransport::new(DEFAULT_BASE_URL, Duration::from_secs(10))?;
//!     let client = DogCatalogClient::new(transport);
//!
//!     client.login("Ada", "ada@example.com").await?;
//!     let page = client.fetch_page(&QueryDescriptor::default()).await?;
//!
//!     println!("{} dogs in total", page.total);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod gateway;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::DogCatalogClient;
pub use error::CatalogError;
pub use gateway::{AuthenticatedGateway, DEFAULT_TIMEOUT};
pub use transport::{
    ApiRequest, ApiResponse, Method, ReqwestTransport, Transport, TransportError, DEFAULT_BASE_URL,
};
pub use types::{
    Cursor, Dog, DogId, DogPage, QueryDescriptor, SearchPage, Sort, SortDirection, SortField,
    DEFAULT_PAGE_SIZE,
};
