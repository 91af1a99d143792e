//! Application state.

use std::sync::Arc;
use std::time::Duration;

use mapscout_core::PlanCatalog;
use mapscout_store::{RocksStore, Store};

use crate::config::ServiceConfig;
use crate::identity::IdentityClient;
use crate::places::{HttpPlaceSource, PlaceSource};
use crate::quota::{AdmissionGate, QuotaEvaluator};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The event-log storage backend.
    pub store: Arc<RocksStore>,

    /// The static plan catalog.
    pub catalog: Arc<PlanCatalog>,

    /// Usage evaluator shared by admission and reporting.
    pub evaluator: QuotaEvaluator,

    /// The admission gate for protected searches.
    pub gate: Arc<AdmissionGate>,

    /// Identity collaborator for credential resolution.
    pub identity: Arc<IdentityClient>,

    /// Place data source for searches.
    pub places: Arc<dyn PlaceSource>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create application state with the HTTP place source from config.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let places = Arc::new(HttpPlaceSource::new(
            &config.places_base_url,
            Duration::from_secs(config.search_timeout_seconds),
        ));
        Self::with_place_source(store, places, config)
    }

    /// Create application state with an explicit place source.
    ///
    /// Integration tests inject a stub here so search outcomes are
    /// controlled without a live upstream.
    #[must_use]
    pub fn with_place_source(
        store: Arc<RocksStore>,
        places: Arc<dyn PlaceSource>,
        config: ServiceConfig,
    ) -> Self {
        let catalog = Arc::new(PlanCatalog::builtin());
        let store_dyn: Arc<dyn Store> = store.clone();

        let evaluator = QuotaEvaluator::new(store_dyn.clone(), catalog.clone(), config.week_start);
        let gate = Arc::new(AdmissionGate::new(
            evaluator.clone(),
            store_dyn,
            config.store_failure_policy,
        ));

        let identity = Arc::new(IdentityClient::new(
            &config.identity_base_url,
            Duration::from_secs(config.request_timeout_seconds),
        ));

        if config.admin_api_key.is_none() {
            tracing::warn!("Admin key not configured - administrative purge disabled");
        }

        Self {
            store,
            catalog,
            evaluator,
            gate,
            identity,
            places,
            config,
        }
    }
}
