//! # Pawfetch Testing
//!
//! Testing utilities for the pawfetch crates.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`InMemoryKeyValueStore`]: storage double
//! - [`MockTransport`]: scripted catalog API with deferred responses
//! - [`fixtures`]: canned dogs and wire bodies
//!
//! ## Example
//!
//! ```ignore
//! use pawfetch_testing::{fixtures, MockTransport};
//! use pawfetch_catalog::Method;
//!
//! #[tokio::test]
//! async fn test_first_page() {
//!     let transport = MockTransport::new();
//!     transport.respond(Method::Get, "/dogs/search", 200, fixtures::search_body(&["a"], 1));
//!     transport.respond(Method::Post, "/dogs", 200, fixtures::dogs_body(&[fixtures::dog("a", "Rex")]));
//!
//!     let store = test_store(transport);
//!     store.send(AppAction::Refresh).await?.wait().await;
//!     assert_eq!(store.state(|s| s.results.dogs().len()).await, 1);
//! }
//! ```

pub mod fixtures;
pub mod mocks;
pub mod reducer_test;

pub use mocks::{InMemoryKeyValueStore, MockTransport, ResponseGate};
pub use reducer_test::{assertions, resolve_effects, ReducerTest};

/// Install a test-friendly tracing subscriber
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
