// src/application/services/mod.rs
use std::sync::Arc;

use crate::application::{
    ApplicationResult,
    commands::accounts::AccountCommandService,
    ports::{
        accounts::{CredentialStore, UserDirectory},
        cache::CacheStore,
        security::TokenCodec,
        time::Clock,
    },
    sessions::SessionService,
};

pub struct ApplicationServices {
    pub accounts: Arc<AccountCommandService>,
    sessions: Arc<SessionService>,
    cache: Arc<dyn CacheStore>,
}

impl ApplicationServices {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        directory: Arc<dyn UserDirectory>,
        codec: Arc<dyn TokenCodec>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let sessions = Arc::new(SessionService::new(
            Arc::clone(&codec),
            Arc::clone(&cache),
            Arc::clone(&clock),
        ));

        let accounts = Arc::new(AccountCommandService::new(
            Arc::clone(&credentials),
            Arc::clone(&directory),
            Arc::clone(&sessions),
        ));

        Self {
            accounts,
            sessions,
            cache,
        }
    }

    pub fn sessions(&self) -> Arc<SessionService> {
        Arc::clone(&self.sessions)
    }

    /// Round-trip to the cache store, used by readiness checks.
    pub async fn ping_cache(&self) -> ApplicationResult<()> {
        self.cache.ping().await
    }
}
