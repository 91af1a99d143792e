//! Common test utilities for mapscout integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mapscout_core::{AccountId, ConsumptionEvent, EventKind};
use mapscout_service::places::{Place, PlaceSource, PlaceSourceError};
use mapscout_service::{create_router, AppState, ServiceConfig};
use mapscout_store::{RocksStore, Store};

/// Place source stub with a scripted outcome.
#[derive(Clone)]
pub enum StubPlaces {
    /// Return these places (truncated to the requested count).
    Results(Vec<Place>),
    /// The search matches nothing.
    NoResults,
    /// The upstream source is down.
    Broken,
}

impl StubPlaces {
    /// A stub that returns the sample result set.
    pub fn ok() -> Self {
        Self::Results(sample_places())
    }
}

#[async_trait]
impl PlaceSource for StubPlaces {
    async fn search(
        &self,
        _query: &str,
        _location: &str,
        max_results: usize,
    ) -> Result<Vec<Place>, PlaceSourceError> {
        match self {
            Self::Results(places) => Ok(places.iter().take(max_results).cloned().collect()),
            Self::NoResults => Err(PlaceSourceError::NoResults),
            Self::Broken => Err(PlaceSourceError::Upstream("stub upstream failure".into())),
        }
    }
}

/// A small fixed result set.
pub fn sample_places() -> Vec<Place> {
    vec![
        Place {
            name: "Le Bistrot du Centre".into(),
            category: "Restaurant".into(),
            rating: "4.5".into(),
            address: "15 Rue de la Paix, Lyon".into(),
            phone: "01 42 33 44 55".into(),
            website: "N/A".into(),
            hours: "Tue-Sat: 12:00-14:30, 19:00-22:30".into(),
        },
        Place {
            name: "Pizza Roma".into(),
            category: "Restaurant".into(),
            rating: "4.3".into(),
            address: "28 Avenue Victor Hugo, Lyon".into(),
            phone: "01 43 54 65 76".into(),
            website: "www.pizzaroma.example".into(),
            hours: "Daily: 11:30-23:00".into(),
        },
        Place {
            name: "Sushi Sakura".into(),
            category: "Restaurant".into(),
            rating: "4.6".into(),
            address: "67 Boulevard Haussmann, Lyon".into(),
            phone: "01 45 67 89 01".into(),
            website: "www.sushisakura.example".into(),
            hours: "Daily: 12:00-15:00, 18:30-23:00".into(),
        },
    ]
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Mock identity service (kept alive for the test duration).
    pub identity: MockServer,
    /// Direct handle on the event log for seeding and assertions.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// The account the default credential resolves to.
    pub account_id: AccountId,
    /// Bearer credential the mock identity service accepts.
    pub token: String,
    /// The admin API key for privileged requests.
    pub admin_key: String,
}

impl TestHarness {
    /// Harness with a plan-less account (default tier) and working places.
    pub async fn new() -> Self {
        Self::with_options(None, StubPlaces::ok()).await
    }

    /// Harness whose account subscribes to the given plan.
    pub async fn with_plan(plan: &str) -> Self {
        Self::with_options(Some(plan), StubPlaces::ok()).await
    }

    /// Harness with a scripted place-source outcome.
    pub async fn with_places(places: StubPlaces) -> Self {
        Self::with_options(None, places).await
    }

    /// Build a harness with a fresh database and mock identity service.
    pub async fn with_options(plan: Option<&str>, places: StubPlaces) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let identity = MockServer::start().await;
        let account_id = AccountId::generate();
        let token = format!("tok-{account_id}");

        let mut user = serde_json::json!({ "id": account_id.to_string() });
        if let Some(plan) = plan {
            user["plan"] = plan.into();
        }

        // The known credential resolves to the test account; anything else
        // is rejected. Wiremock picks the first mounted match.
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(user))
            .mount(&identity)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&identity)
            .await;

        let admin_key = "test-admin-key".to_string();

        let config = ServiceConfig {
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            identity_base_url: identity.uri(),
            admin_api_key: Some(admin_key.clone()),
            ..ServiceConfig::default()
        };

        let state = AppState::with_place_source(store.clone(), Arc::new(places), config);
        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            identity,
            store,
            _temp_dir: temp_dir,
            account_id,
            token,
            admin_key,
        }
    }

    /// Get the authorization header for the test account.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Record `n` consumption events for the test account at `at`.
    pub fn seed_searches(&self, n: u64, at: DateTime<Utc>) {
        for _ in 0..n {
            self.store
                .record_event(&ConsumptionEvent::new(
                    self.account_id,
                    EventKind::Search,
                    at,
                ))
                .expect("Failed to seed event");
        }
    }

    /// Total recorded events for the test account (any window).
    pub fn total_events(&self) -> u64 {
        self.store
            .count_since(
                &self.account_id,
                EventKind::Search,
                Utc::now() - Duration::days(60),
            )
            .expect("Failed to count events")
    }
}
