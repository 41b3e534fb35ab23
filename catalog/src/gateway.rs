//! Authenticated request gateway
//!
//! Every catalog call goes through [`AuthenticatedGateway::send`]. A 401 from
//! the server surfaces as [`CatalogError::Unauthenticated`], distinct from
//! every other failure. The gateway cannot tell which session a response
//! belongs to, so it leaves the stored user alone; the caller decides
//! whether the 401 still applies.

use crate::error::CatalogError;
use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};
use std::time::Duration;

/// Default bound on a single API call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const UNAUTHORIZED: u16 = 401;

/// Wraps a [`Transport`] with 401 detection and a timeout
pub struct AuthenticatedGateway<T> {
    transport: T,
    timeout: Duration,
}

impl<T: Transport> AuthenticatedGateway<T> {
    /// Create a gateway with the default timeout
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the per-call timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The per-call timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a request
    ///
    /// Any status other than 401 is handed back to the caller, which maps
    /// non-success to its own error variant.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Unauthenticated`]: the server answered 401
    /// - [`CatalogError::Timeout`]: no response within the timeout
    /// - [`CatalogError::Transport`]: no response at all
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, CatalogError> {
        let path = request.path.clone();
        metrics::counter!("pawfetch.catalog.requests.total").increment(1);

        let response = tokio::time::timeout(self.timeout, self.transport.execute(request))
            .await
            .map_err(|_| {
                tracing::warn!(path = %path, "Request timed out");
                metrics::counter!("pawfetch.catalog.requests.timeout").increment(1);
                CatalogError::Timeout
            })?
            .map_err(|error| match error {
                TransportError::TimedOut => CatalogError::Timeout,
                other => CatalogError::Transport(other.to_string()),
            })?;

        tracing::debug!(path = %path, status = response.status, "Response received");

        if response.status == UNAUTHORIZED {
            tracing::warn!(path = %path, "Session rejected by server");
            metrics::counter!("pawfetch.catalog.requests.unauthenticated").increment(1);
            return Err(CatalogError::Unauthenticated);
        }

        Ok(response)
    }
}
