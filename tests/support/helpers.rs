// tests/support/helpers.rs
use super::mocks::{FaultyCacheStore, InMemoryAccounts, ManualClock};
use axum::body::{self, Body};
use axum::http::{Response, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thesis_sessions::application::{
    ports::{cache::CacheStore, security::TokenCodec, time::Clock},
    services::ApplicationServices,
    sessions::SessionService,
};
use thesis_sessions::domain::session::SubjectId;
use thesis_sessions::infrastructure::{cache::InMemoryCacheStore, security::token::JwtTokenCodec};
use thesis_sessions::presentation::http::{routes::build_router, state::HttpState};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";
pub const TOKEN_TTL_SECS: i64 = 3600;

pub const ALICE_EMAIL: &str = "alice@example.com";
pub const ADMIN_EMAIL: &str = "root@example.com";
pub const PASSWORD: &str = "correct horse battery staple";

/// Fully wired services over in-memory adapters and a manual clock.
pub struct TestEnv {
    pub clock: Arc<ManualClock>,
    pub memory: Arc<InMemoryCacheStore>,
    pub store: Arc<FaultyCacheStore>,
    pub accounts: Arc<InMemoryAccounts>,
    pub codec: Arc<dyn TokenCodec>,
    pub services: Arc<ApplicationServices>,
    pub alice: SubjectId,
    pub admin: SubjectId,
}

impl TestEnv {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new());
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let memory = Arc::new(InMemoryCacheStore::new(Arc::clone(&dyn_clock)));
        let store = Arc::new(FaultyCacheStore::new(Arc::clone(&memory)));
        let cache: Arc<dyn CacheStore> = store.clone();

        let accounts = Arc::new(InMemoryAccounts::default());
        let alice = accounts.add(42, ALICE_EMAIL, PASSWORD, false);
        let admin = accounts.add(1, ADMIN_EMAIL, PASSWORD, true);

        let codec: Arc<dyn TokenCodec> = Arc::new(
            JwtTokenCodec::new(
                TEST_SECRET,
                Duration::from_secs(TOKEN_TTL_SECS.unsigned_abs()),
                Arc::clone(&dyn_clock),
            )
            .expect("codec"),
        );

        let services = Arc::new(ApplicationServices::new(
            accounts.clone(),
            accounts.clone(),
            Arc::clone(&codec),
            cache,
            dyn_clock,
        ));

        Self {
            clock,
            memory,
            store,
            accounts,
            codec,
            services,
            alice,
            admin,
        }
    }

    pub fn sessions(&self) -> Arc<SessionService> {
        self.services.sessions()
    }

    /// Router over these services. The database pool never connects.
    pub fn router(&self) -> axum::Router {
        use sqlx::postgres::PgPoolOptions;
        let db_pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://localhost/thesis_test")
            .expect("connect_lazy");

        let state = HttpState {
            services: Arc::clone(&self.services),
            db_pool,
        };
        build_router(state, &["http://localhost:3000".to_string()])
    }

    /// Issue a token for `subject` and return the raw string.
    pub async fn issue(&self, subject: &SubjectId) -> String {
        self.sessions()
            .issue_session(subject)
            .await
            .expect("issue_session")
            .token
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn json_body(resp: Response<Body>) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
