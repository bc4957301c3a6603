// tests/support/mocks/accounts.rs
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use thesis_sessions::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::accounts::{CredentialStore, UserDirectory},
};
use thesis_sessions::domain::{account::RoleFlags, session::SubjectId};

#[derive(Debug, Clone)]
struct Account {
    subject: SubjectId,
    email: String,
    password: String,
    flags: RoleFlags,
}

/// Plain-text credential store keyed by subject.
#[derive(Default)]
pub struct InMemoryAccounts {
    accounts: Mutex<HashMap<SubjectId, Account>>,
}

impl InMemoryAccounts {
    pub fn add(&self, id: i64, email: &str, password: &str, is_admin: bool) -> SubjectId {
        let subject = SubjectId::from(id);
        self.accounts.lock().unwrap().insert(
            subject.clone(),
            Account {
                subject: subject.clone(),
                email: email.to_owned(),
                password: password.to_owned(),
                flags: RoleFlags {
                    is_admin,
                    is_active: true,
                },
            },
        );
        subject
    }

    pub fn is_active_now(&self, subject: &SubjectId) -> bool {
        self.accounts
            .lock()
            .unwrap()
            .get(subject)
            .is_some_and(|account| account.flags.is_active)
    }
}

#[async_trait]
impl CredentialStore for InMemoryAccounts {
    async fn verify(&self, identifier: &str, secret: &str) -> ApplicationResult<Option<SubjectId>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(identifier) && account.password == secret)
            .map(|account| account.subject.clone()))
    }

    async fn is_active(&self, subject: &SubjectId) -> ApplicationResult<bool> {
        Ok(self.is_active_now(subject))
    }
}

#[async_trait]
impl UserDirectory for InMemoryAccounts {
    async fn get_role_flags(&self, subject: &SubjectId) -> ApplicationResult<Option<RoleFlags>> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(subject)
            .map(|account| account.flags))
    }

    async fn set_active(&self, subject: &SubjectId, is_active: bool) -> ApplicationResult<bool> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(subject)
            .ok_or_else(|| ApplicationError::not_found("user not found"))?;
        let changed = account.flags.is_active != is_active;
        account.flags.is_active = is_active;
        Ok(changed)
    }
}
