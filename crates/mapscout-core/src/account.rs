//! Account types.
//!
//! Accounts are owned by the external identity system; the meter only ever
//! reads the tier reference that arrives with a resolved credential. There
//! is no create/update path here.

use serde::{Deserialize, Serialize};

use crate::ids::AccountId;
use crate::plan::TierId;

/// An account as seen by the metering core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The externally issued account id.
    pub account_id: AccountId,

    /// The subscribed tier, if the account has one. `None` (and any id the
    /// catalog does not recognize) resolves to the default tier.
    pub tier_id: Option<TierId>,
}

impl Account {
    /// An account with an explicit tier.
    #[must_use]
    pub fn new(account_id: AccountId, tier_id: TierId) -> Self {
        Self {
            account_id,
            tier_id: Some(tier_id),
        }
    }

    /// An account with no plan reference (default tier applies).
    #[must_use]
    pub const fn untiered(account_id: AccountId) -> Self {
        Self {
            account_id,
            tier_id: None,
        }
    }
}
