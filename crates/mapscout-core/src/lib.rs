//! Core types and utilities for the mapscout metering service.
//!
//! This crate provides the foundational types used throughout the platform:
//!
//! - **Identifiers**: `AccountId`, `EventId`
//! - **Plans**: `TierId`, `WindowKind`, `PlanTier`, `PlanCatalog`
//! - **Accounts**: `Account`
//! - **Usage**: `EventKind`, `ConsumptionEvent`, `UsageSnapshot`
//! - **Windows**: quota window arithmetic (`window_start`, `reset_at`)
//!
//! # Metering model
//!
//! One successful search = one consumption event. Events are counted over a
//! tier-specific window (weekly for the free tier, monthly for paid tiers),
//! and the count is always recomputed from the event log at query time —
//! nothing here caches usage across requests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod error;
pub mod ids;
pub mod plan;
pub mod usage;
pub mod window;

pub use account::Account;
pub use error::{CoreError, Result};
pub use ids::{AccountId, EventId, IdError};
pub use plan::{PlanCatalog, PlanFeatures, PlanTier, TierId, WindowKind, DEFAULT_TIER};
pub use usage::{ConsumptionEvent, EventKind, UsageSnapshot};
pub use window::{reset_at, window_start};
