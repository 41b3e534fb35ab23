//! # Pawfetch Runtime
//!
//! Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, runs the reducer, executes effects
//! - **`EffectHandle`**: Lets a caller await the effects started by one action
//! - **Feedback loop**: Actions produced by effects are reduced again
//!
//! ## Example
//!
//! ```ignore
//! use pawfetch_runtime::Store;
//!
//! let store = Store::new(AppState::default(), app_reducer(), environment);
//!
//! // Pick a breed; the reducer starts a catalog fetch
//! let mut handle = store.send(AppAction::ToggleBreed { breed: "Beagle".into() }).await?;
//! handle.wait().await;
//!
//! // Read state
//! let total = store.state(|s| s.results.total()).await;
//! ```

/// Error types for the Store runtime
pub mod error;

/// Store configuration
pub mod config;

/// Effect completion tracking
pub mod handle;

/// The Store runtime
pub mod store;

pub use config::StoreConfig;
pub use error::StoreError;
pub use handle::{EffectHandle, TrackingMode};
pub use store::Store;
