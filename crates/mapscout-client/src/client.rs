//! Mapscout HTTP client implementation.

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{ApiErrorResponse, QuotaDenial, SearchRequest, SearchResults, UsageReport};

/// Options for building a [`MapscoutClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}

/// Mapscout API client.
///
/// Provides methods for running quota-gated searches and fetching usage
/// reports on behalf of an end user's credential.
#[derive(Debug, Clone)]
pub struct MapscoutClient {
    client: Client,
    base_url: String,
}

impl MapscoutClient {
    /// Create a new mapscout client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the service (e.g. `"http://mapscout:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new mapscout client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Run a quota-gated place search.
    ///
    /// # Errors
    ///
    /// - [`ClientError::QuotaExceeded`] when the account's window allowance
    ///   is used up; carries the denial details including the reset instant.
    /// - [`ClientError::NoResults`] when the search matched nothing (free).
    /// - [`ClientError::Unauthorized`] when the credential is rejected.
    /// - [`ClientError::Http`] / [`ClientError::Api`] for other faults.
    pub async fn search(
        &self,
        credential: &str,
        request: &SearchRequest,
    ) -> Result<SearchResults, ClientError> {
        let url = format!("{}/v1/search", self.base_url);

        tracing::debug!(query = %request.query, location = %request.location, "Sending search");

        let response = self
            .client
            .post(&url)
            .bearer_auth(credential)
            .json(request)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ClientError::NoResults),
            StatusCode::TOO_MANY_REQUESTS => {
                let denial: QuotaDenial = response.json().await?;
                Err(ClientError::from(denial))
            }
            status => Err(api_error(status, response).await),
        }
    }

    /// Fetch the usage report for a credential.
    ///
    /// Side-effect free; safe to call after every search for a display
    /// refresh.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Unauthorized`] when the credential is rejected.
    /// - [`ClientError::Http`] / [`ClientError::Api`] for other faults.
    pub async fn usage(&self, credential: &str) -> Result<UsageReport, ClientError> {
        let url = format!("{}/v1/usage", self.base_url);

        tracing::debug!("Fetching usage report");

        let response = self.client.get(&url).bearer_auth(credential).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            status => Err(api_error(status, response).await),
        }
    }
}

/// Map a non-quota error response onto [`ClientError::Api`].
async fn api_error(status: StatusCode, response: Response) -> ClientError {
    let message = match response.json::<ApiErrorResponse>().await {
        Ok(body) => body.error.message,
        Err(_) => status.to_string(),
    };
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
