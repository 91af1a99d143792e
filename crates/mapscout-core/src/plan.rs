//! Subscription plan catalog.
//!
//! Tiers are static data: each tier carries its quota limit and the window
//! cadence it resets on. Coupling the cadence to the tier as data (rather
//! than branching on "is this the free plan") means adding a tier with a
//! different cadence requires no logic changes anywhere else.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The tier every account falls back to when its plan reference is missing
/// or unknown.
pub const DEFAULT_TIER: &str = "starter";

/// A subscription tier identifier (`starter`, `pro`, `agency`, ...).
///
/// Stored lowercase; arbitrary identifiers are accepted so new tiers can be
/// introduced without touching this type.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TierId(String);

impl TierId {
    /// Create a tier id, normalizing to lowercase.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_ascii_lowercase())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TierId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for TierId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<TierId> for String {
    fn from(id: TierId) -> Self {
        id.0
    }
}

impl fmt::Debug for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TierId({})", self.0)
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The reset cadence governing a tier's quota window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Resets at the start of each week (configured week-start day).
    Weekly,
    /// Resets on the first day of each calendar month.
    Monthly,
}

impl WindowKind {
    /// Wire-format label (`"weekly"` / `"monthly"`), as the frontend
    /// displays it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive plan information surfaced by the usage report.
///
/// Purely presentational: none of these fields participate in quota
/// computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFeatures {
    /// Display name ("Starter", "Pro", ...).
    pub name: String,
    /// Price label ("free", "€29/mo", ...).
    pub price: String,
    /// Human-readable allowance ("100 searches/week").
    pub searches: String,
    /// Marketing feature list.
    pub features: Vec<String>,
}

/// One immutable catalog entry: quota parameters plus display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTier {
    /// The tier identifier.
    pub id: TierId,
    /// Which reset cadence governs this tier.
    pub window: WindowKind,
    /// Maximum consumption events allowed per window.
    pub limit: u64,
    /// Monthly price in cents (0 for the free tier).
    pub price_cents: u32,
    /// Descriptive plan information for display.
    pub features: PlanFeatures,
}

impl PlanTier {
    /// Whether this tier is free of charge.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.price_cents == 0
    }
}

/// Static registry of subscription tiers.
///
/// Immutable after construction and therefore safe to share across request
/// handlers without locking.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    tiers: BTreeMap<TierId, PlanTier>,
    default: TierId,
}

impl PlanCatalog {
    /// Build the built-in three-tier catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let tiers = [
            PlanTier {
                id: TierId::new(DEFAULT_TIER),
                window: WindowKind::Weekly,
                limit: 100,
                price_cents: 0,
                features: PlanFeatures {
                    name: "Starter".into(),
                    price: "free".into(),
                    searches: "100 searches/week".into(),
                    features: vec![
                        "100 searches per week".into(),
                        "CSV & JSON export".into(),
                        "Community support".into(),
                        "Basic data".into(),
                    ],
                },
            },
            PlanTier {
                id: TierId::new("pro"),
                window: WindowKind::Monthly,
                limit: 1000,
                price_cents: 2900,
                features: PlanFeatures {
                    name: "Pro".into(),
                    price: "€29/mo".into(),
                    searches: "1,000 searches/month".into(),
                    features: vec![
                        "1,000 searches per month".into(),
                        "CSV & JSON export".into(),
                        "Priority support".into(),
                        "Enriched data".into(),
                        "API access".into(),
                    ],
                },
            },
            PlanTier {
                id: TierId::new("agency"),
                window: WindowKind::Monthly,
                limit: 5000,
                price_cents: 9900,
                features: PlanFeatures {
                    name: "Agency".into(),
                    price: "€99/mo".into(),
                    searches: "5,000 searches/month".into(),
                    features: vec![
                        "5,000 searches per month".into(),
                        "CSV & JSON export".into(),
                        "Dedicated support".into(),
                        "Full data".into(),
                        "Unlimited API".into(),
                        "White-label".into(),
                    ],
                },
            },
        ];

        let mut map = BTreeMap::new();
        for tier in tiers {
            map.insert(tier.id.clone(), tier);
        }

        Self {
            tiers: map,
            default: TierId::new(DEFAULT_TIER),
        }
    }

    /// Look up a tier by id.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownTier` if the id is not registered. Callers
    /// on the request path should prefer [`PlanCatalog::resolve`], which
    /// falls back to the default tier instead of propagating the error.
    pub fn tier_of(&self, id: &TierId) -> Result<&PlanTier, CoreError> {
        self.tiers.get(id).ok_or_else(|| CoreError::UnknownTier {
            tier_id: id.to_string(),
        })
    }

    /// Resolve an account's tier reference to a catalog entry.
    ///
    /// `None` and unknown ids both resolve to the default tier; an unknown
    /// id is logged nowhere here — it is an expected state for accounts
    /// whose plan was retired.
    #[must_use]
    pub fn resolve(&self, id: Option<&TierId>) -> &PlanTier {
        id.and_then(|id| self.tiers.get(id))
            .unwrap_or_else(|| self.default_tier())
    }

    /// The default (lowest) tier.
    ///
    /// # Panics
    ///
    /// Panics if the catalog was built without its default tier, which
    /// `builtin()` makes impossible.
    #[must_use]
    pub fn default_tier(&self) -> &PlanTier {
        self.tiers
            .get(&self.default)
            .expect("catalog always contains its default tier")
    }

    /// Iterate all registered tiers in id order.
    pub fn tiers(&self) -> impl Iterator<Item = &PlanTier> {
        self.tiers.values()
    }

    /// Descriptive plan information for every tier, keyed by tier id.
    #[must_use]
    pub fn features_by_tier(&self) -> BTreeMap<TierId, PlanFeatures> {
        self.tiers
            .iter()
            .map(|(id, tier)| (id.clone(), tier.features.clone()))
            .collect()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
