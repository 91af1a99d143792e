//! Error types for the metering core.

use crate::ids::IdError;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An account references a tier absent from the catalog.
    ///
    /// Recoverable: request-path callers fall back to the default tier via
    /// `PlanCatalog::resolve` and never surface this to the end user.
    #[error("unknown tier: {tier_id}")]
    UnknownTier {
        /// The unregistered tier id.
        tier_id: String,
    },

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
