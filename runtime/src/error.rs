use thiserror::Error;

/// Errors that can occur during Store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store is shutting down and rejects new actions
    #[error("Store is shutting down")]
    ShutdownInProgress,

    /// Shutdown timed out with effects still running
    #[error("Shutdown timed out with {0} effects still running")]
    ShutdownTimeout(usize),
}
