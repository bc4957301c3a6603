// src/application/commands/accounts/service.rs
use crate::application::{
    ports::accounts::{CredentialStore, UserDirectory},
    sessions::SessionService,
};
use std::sync::Arc;

pub struct AccountCommandService {
    pub(super) credentials: Arc<dyn CredentialStore>,
    pub(super) directory: Arc<dyn UserDirectory>,
    pub(super) sessions: Arc<SessionService>,
}

impl AccountCommandService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        directory: Arc<dyn UserDirectory>,
        sessions: Arc<SessionService>,
    ) -> Self {
        Self {
            credentials,
            directory,
            sessions,
        }
    }
}
