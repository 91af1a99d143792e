//! Place data-source collaborator.
//!
//! Where places data comes from is outside this service's concern; the
//! admission gate only needs the protected operation's outcome. The trait
//! seam keeps the HTTP implementation swappable for a stub in tests, the
//! same way the store hides behind its own trait.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One place in a search result.
///
/// Field set matches what the upstream source returns and the exporter
/// consumes; all free-form strings, no interpretation here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Business name.
    pub name: String,
    /// Category label ("Restaurant", "Pharmacy", ...).
    pub category: String,
    /// Rating as the source formats it ("4.2").
    pub rating: String,
    /// Street address.
    pub address: String,
    /// Phone number.
    pub phone: String,
    /// Website, or "N/A".
    pub website: String,
    /// Opening hours text.
    pub hours: String,
}

/// Errors from the place source.
///
/// These are operation failures in the admission gate's terms: none of them
/// consume quota.
#[derive(Debug, thiserror::Error)]
pub enum PlaceSourceError {
    /// The search matched nothing.
    #[error("no places found")]
    NoResults,

    /// The source did not answer within the configured timeout.
    #[error("place source timed out")]
    Timeout,

    /// Transport or server fault.
    #[error("place source error: {0}")]
    Upstream(String),
}

/// A searchable place data source.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Search for places matching a category query near a location.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceSourceError::NoResults`] when the query matches
    /// nothing, [`PlaceSourceError::Timeout`] when the source is too slow,
    /// and [`PlaceSourceError::Upstream`] for other faults.
    async fn search(
        &self,
        query: &str,
        location: &str,
        max_results: usize,
    ) -> Result<Vec<Place>, PlaceSourceError>;
}

/// HTTP place source.
#[derive(Debug, Clone)]
pub struct HttpPlaceSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPlaceSource {
    /// Create a place source against an upstream base URL.
    ///
    /// The timeout bounds the protected operation independently of the
    /// admission gate; an elapsed timeout surfaces as an operation failure.
    #[must_use]
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PlaceSource for HttpPlaceSource {
    async fn search(
        &self,
        query: &str,
        location: &str,
        max_results: usize,
    ) -> Result<Vec<Place>, PlaceSourceError> {
        let url = format!("{}/v1/places", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query),
                ("location", location),
                ("limit", &max_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PlaceSourceError::Timeout
                } else {
                    PlaceSourceError::Upstream(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(PlaceSourceError::Upstream(format!(
                "place source returned {}",
                response.status()
            )));
        }

        let mut places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| PlaceSourceError::Upstream(e.to_string()))?;
        places.truncate(max_results);

        if places.is_empty() {
            return Err(PlaceSourceError::NoResults);
        }

        Ok(places)
    }
}
