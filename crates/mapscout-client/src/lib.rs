//! MapScout Client SDK.
//!
//! This crate provides a client library for frontends and services to
//! interact with the mapscout metering API.
//!
//! # Example
//!
//! ```no_run
//! use mapscout_client::{ClientError, MapscoutClient, SearchRequest};
//!
//! # async fn example() -> Result<(), mapscout_client::ClientError> {
//! let client = MapscoutClient::new("http://mapscout.svc:8080");
//!
//! match client
//!     .search("user-credential", &SearchRequest::new("restaurant").with_location("Lyon"))
//!     .await
//! {
//!     Ok(results) => println!("{} places found", results.places.len()),
//!     Err(ClientError::QuotaExceeded { reset_date, .. }) => {
//!         println!("Out of searches until {reset_date}");
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, MapscoutClient};
pub use error::ClientError;
pub use types::*;
