//! Quota evaluation and search admission.
//!
//! Both request paths meet here: the admission gate (check, run, record)
//! and the usage report both call the same evaluator, so the count the
//! gate enforces is the count the dashboard displays.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc, Weekday};

use mapscout_core::{
    reset_at, window_start, Account, ConsumptionEvent, EventId, EventKind, PlanCatalog,
    UsageSnapshot,
};
use mapscout_store::{Store, StoreError};

/// What the admission gate does when the event count cannot be read.
///
/// This is a deployment policy, not a code path the service picks silently:
/// `FailOpen` admits the request and logs at ERROR (a paying user is never
/// blocked by an accounting outage, monitoring fires on every occurrence);
/// `FailClosed` denies until the store recovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreFailurePolicy {
    /// Admit when usage cannot be counted; log loudly.
    #[default]
    FailOpen,
    /// Deny when usage cannot be counted.
    FailClosed,
}

/// Error from parsing a [`StoreFailurePolicy`] label.
#[derive(Debug, thiserror::Error)]
#[error("invalid store failure policy: {0}")]
pub struct ParsePolicyError(String);

impl FromStr for StoreFailurePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail_open" | "fail-open" | "open" => Ok(Self::FailOpen),
            "fail_closed" | "fail-closed" | "closed" => Ok(Self::FailClosed),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

/// Computes point-in-time usage snapshots for accounts.
///
/// Stateless aggregation over the event log: each evaluation resolves the
/// account's tier, derives the active window, and counts events inside it.
/// Nothing is cached between calls, so a snapshot can never go stale past a
/// window boundary.
#[derive(Clone)]
pub struct QuotaEvaluator {
    store: Arc<dyn Store>,
    catalog: Arc<PlanCatalog>,
    week_start: Weekday,
}

impl QuotaEvaluator {
    /// Create an evaluator over a store and plan catalog.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, catalog: Arc<PlanCatalog>, week_start: Weekday) -> Self {
        Self {
            store,
            catalog,
            week_start,
        }
    }

    /// Evaluate an account's usage against the current wall clock.
    ///
    /// # Errors
    ///
    /// Returns the store error if the event count cannot be read.
    pub fn evaluate(&self, account: &Account) -> Result<UsageSnapshot, StoreError> {
        self.evaluate_at(account, Utc::now())
    }

    /// Evaluate an account's usage as of an explicit instant.
    ///
    /// Separating the clock from the computation lets tests replay event
    /// sequences around window boundaries without waiting for real time.
    ///
    /// # Errors
    ///
    /// Returns the store error if the event count cannot be read.
    pub fn evaluate_at(
        &self,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<UsageSnapshot, StoreError> {
        // Unknown tiers resolve to the default tier; the error never
        // reaches a caller.
        let tier = self.catalog.resolve(account.tier_id.as_ref());
        let start = window_start(tier.window, now, self.week_start);
        let current = self
            .store
            .count_since(&account.account_id, EventKind::Search, start)?;
        Ok(UsageSnapshot::from_count(
            tier,
            current,
            reset_at(tier.window, start),
        ))
    }
}

/// A successfully admitted operation result.
#[derive(Debug)]
pub struct Admitted<T> {
    /// The protected operation's output.
    pub value: T,
    /// The recorded consumption event, if recording succeeded.
    pub event_id: Option<EventId>,
}

/// Reasons an admission did not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError<E> {
    /// The account has no allowance left in the active window.
    #[error("quota exceeded: {}/{} ({})", .0.current, .0.limit, .0.window)]
    QuotaExceeded(Box<UsageSnapshot>),

    /// The event count could not be read and the policy is fail-closed.
    #[error("usage store unavailable: {0}")]
    Store(#[from] StoreError),

    /// The protected operation itself failed; no quota was consumed.
    #[error("operation failed: {0}")]
    Operation(E),
}

/// Wraps a protected operation in the check-then-record sequence.
///
/// The evaluate/record pair is deliberately not atomic: two concurrent
/// admissions at one remaining slot can both pass the check, overshooting
/// the limit by at most the number of in-flight requests. Availability is
/// preferred over strict enforcement; there is no per-account lock.
pub struct AdmissionGate {
    evaluator: QuotaEvaluator,
    store: Arc<dyn Store>,
    policy: StoreFailurePolicy,
}

impl AdmissionGate {
    /// Create a gate over an evaluator and the store it records into.
    #[must_use]
    pub fn new(
        evaluator: QuotaEvaluator,
        store: Arc<dyn Store>,
        policy: StoreFailurePolicy,
    ) -> Self {
        Self {
            evaluator,
            store,
            policy,
        }
    }

    /// Run `operation` if the account has allowance left, then record one
    /// consumption event.
    ///
    /// A denied admission never polls the operation. A failed operation is
    /// free: no event is recorded. A recording failure after a successful
    /// operation is logged and swallowed — the result has already been
    /// produced and the user is not penalized for an accounting fault.
    ///
    /// # Errors
    ///
    /// - [`AdmissionError::QuotaExceeded`] when the window allowance is
    ///   used up; carries the snapshot for the denial response.
    /// - [`AdmissionError::Store`] when the count is unreadable under the
    ///   fail-closed policy.
    /// - [`AdmissionError::Operation`] when the operation itself fails.
    pub async fn admit<T, E, F>(
        &self,
        account: &Account,
        operation: F,
    ) -> Result<Admitted<T>, AdmissionError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        match self.evaluator.evaluate(account) {
            Ok(snapshot) if !snapshot.has_remaining() => {
                return Err(AdmissionError::QuotaExceeded(Box::new(snapshot)));
            }
            Ok(_) => {}
            Err(e) => match self.policy {
                StoreFailurePolicy::FailClosed => {
                    tracing::error!(
                        account_id = %account.account_id,
                        error = %e,
                        "Usage count unavailable; denying admission (fail-closed)"
                    );
                    return Err(AdmissionError::Store(e));
                }
                StoreFailurePolicy::FailOpen => {
                    tracing::error!(
                        account_id = %account.account_id,
                        error = %e,
                        "Usage count unavailable; admitting anyway (fail-open)"
                    );
                }
            },
        }

        let value = match operation.await {
            Ok(value) => value,
            Err(e) => return Err(AdmissionError::Operation(e)),
        };

        let event = ConsumptionEvent::search(account.account_id);
        let event_id = match self.store.record_event(&event) {
            Ok(()) => Some(event.event_id),
            Err(e) => {
                tracing::warn!(
                    account_id = %account.account_id,
                    error = %e,
                    "Failed to record consumption event; search already served"
                );
                None
            }
        };

        Ok(Admitted { value, event_id })
    }
}
