//! HTTP API service for mapscout quota metering.
//!
//! The service sits between the frontend and two external collaborators
//! (the identity service and the place data source) and owns one decision:
//! whether a given search request may proceed under the account's plan
//! quota. Search admission and usage reporting both read from a single
//! quota evaluator, so what the gate enforces and what the dashboard shows
//! can never drift apart.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod places;
pub mod quota;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use quota::{AdmissionError, AdmissionGate, Admitted, QuotaEvaluator, StoreFailurePolicy};
pub use routes::create_router;
pub use state::AppState;
