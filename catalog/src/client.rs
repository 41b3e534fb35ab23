//! Dog catalog API client

use crate::error::CatalogError;
use crate::gateway::AuthenticatedGateway;
use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::types::{
    Dog, DogId, DogPage, LoginRequest, MatchResponse, QueryDescriptor, SearchPage, SearchResponse,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// Client for the adoptable-dog catalog
///
/// Performs the two-phase page fetch (ids, then details) plus the match,
/// breed, and session calls. All calls share one [`AuthenticatedGateway`].
pub struct DogCatalogClient<T> {
    gateway: AuthenticatedGateway<T>,
}

impl<T: Transport> DogCatalogClient<T> {
    /// Create a client over `transport`
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            gateway: AuthenticatedGateway::new(transport),
        }
    }

    /// Set the per-call timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.gateway = self.gateway.with_timeout(timeout);
        self
    }

    /// Search for the ids on one page
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SearchFailed`] on a non-success status, plus the
    /// gateway errors.
    #[tracing::instrument(skip(self, query), fields(page = query.page))]
    pub async fn search(&self, query: &QueryDescriptor) -> Result<SearchPage, CatalogError> {
        let request = ApiRequest::get("/dogs/search").with_query(query.to_query_pairs());
        let response = self.gateway.send(request).await?;

        if !response.is_success() {
            return Err(CatalogError::SearchFailed {
                status: response.status,
            });
        }

        let page: SearchResponse = decode(&response)?;
        Ok(page.into())
    }

    /// Fetch full records for `ids`
    ///
    /// The server's ordering is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidArgument`]: `ids` is empty (no request is made)
    /// - [`CatalogError::DetailsFailed`]: non-success status
    pub async fn fetch_details(&self, ids: &[DogId]) -> Result<Vec<Dog>, CatalogError> {
        if ids.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "dog details need at least one id".to_string(),
            ));
        }

        let request = ApiRequest::post("/dogs").with_body(id_list(ids));
        let response = self.gateway.send(request).await?;

        if !response.is_success() {
            return Err(CatalogError::DetailsFailed {
                status: response.status,
            });
        }

        decode(&response)
    }

    /// Fetch one page of dogs: search, then details for the returned ids
    ///
    /// Dogs come back in the order the search returned their ids. An empty
    /// search yields an empty page without a details request.
    ///
    /// # Errors
    ///
    /// Any error from [`search`](Self::search) or
    /// [`fetch_details`](Self::fetch_details).
    #[tracing::instrument(skip(self, query), fields(page = query.page))]
    pub async fn fetch_page(&self, query: &QueryDescriptor) -> Result<DogPage, CatalogError> {
        let SearchPage {
            ids,
            total,
            next,
            prev,
        } = self.search(query).await?;

        if ids.is_empty() {
            tracing::debug!(total, "Search returned no ids");
            return Ok(DogPage {
                dogs: Vec::new(),
                total,
                next,
                prev,
            });
        }

        let mut dogs = self.fetch_details(&ids).await?;

        let position: HashMap<&DogId, usize> =
            ids.iter().enumerate().map(|(index, id)| (id, index)).collect();
        dogs.sort_by_key(|dog| position.get(&dog.id).copied().unwrap_or(usize::MAX));

        tracing::debug!(count = dogs.len(), total, "Page fetched");
        Ok(DogPage {
            dogs,
            total,
            next,
            prev,
        })
    }

    /// Ask the service to pick one dog from `ids`
    ///
    /// # Errors
    ///
    /// - [`CatalogError::InvalidArgument`]: `ids` is empty (no request is made)
    /// - [`CatalogError::MatchFailed`]: non-success status
    #[tracing::instrument(skip(self, ids), fields(candidates = ids.len()))]
    pub async fn request_match(&self, ids: &[DogId]) -> Result<DogId, CatalogError> {
        if ids.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "a match needs at least one favorite".to_string(),
            ));
        }

        let request = ApiRequest::post("/dogs/match").with_body(id_list(ids));
        let response = self.gateway.send(request).await?;

        if !response.is_success() {
            return Err(CatalogError::MatchFailed {
                status: response.status,
            });
        }

        let matched: MatchResponse = decode(&response)?;
        Ok(matched.matched)
    }

    /// All breed names, sorted alphabetically
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::BreedsFailed`] on a non-success status.
    pub async fn list_breeds(&self) -> Result<Vec<String>, CatalogError> {
        let response = self.gateway.send(ApiRequest::get("/dogs/breeds")).await?;

        if !response.is_success() {
            return Err(CatalogError::BreedsFailed {
                status: response.status,
            });
        }

        let mut breeds: Vec<String> = decode(&response)?;
        breeds.sort_by_key(|breed| breed.to_lowercase());
        Ok(breeds)
    }

    /// Start a session; the server sets the session cookie
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LoginFailed`] on a non-success status.
    #[tracing::instrument(skip(self, name))]
    pub async fn login(&self, name: &str, email: &str) -> Result<(), CatalogError> {
        let body = serde_json::to_value(LoginRequest { name, email })
            .map_err(|e| CatalogError::Decode(e.to_string()))?;
        let response = self
            .gateway
            .send(ApiRequest::post("/auth/login").with_body(body))
            .await?;

        if response.is_success() {
            Ok(())
        } else {
            Err(CatalogError::LoginFailed {
                status: response.status,
            })
        }
    }

    /// End the session
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LogoutFailed`] on a non-success status.
    pub async fn logout(&self) -> Result<(), CatalogError> {
        let response = self.gateway.send(ApiRequest::post("/auth/logout")).await?;

        if response.is_success() {
            Ok(())
        } else {
            Err(CatalogError::LogoutFailed {
                status: response.status,
            })
        }
    }

    /// Whether the session cookie is still accepted
    ///
    /// Checks `GET /dogs/breeds`. A 401 is an answer here, not an error.
    ///
    /// # Errors
    ///
    /// Returns transport and timeout errors from the gateway.
    pub async fn check_session(&self) -> Result<bool, CatalogError> {
        match self.gateway.send(ApiRequest::get("/dogs/breeds")).await {
            Ok(response) => Ok(response.is_success()),
            Err(CatalogError::Unauthenticated) => Ok(false),
            Err(error) => Err(error),
        }
    }
}

fn id_list(ids: &[DogId]) -> serde_json::Value {
    serde_json::Value::Array(
        ids.iter()
            .map(|id| serde_json::Value::String(id.as_str().to_string()))
            .collect(),
    )
}

fn decode<D: DeserializeOwned>(response: &ApiResponse) -> Result<D, CatalogError> {
    serde_json::from_str(&response.body).map_err(|e| CatalogError::Decode(e.to_string()))
}
