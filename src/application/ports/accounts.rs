// src/application/ports/accounts.rs
use crate::application::ApplicationResult;
use crate::domain::{account::RoleFlags, session::SubjectId};
use async_trait::async_trait;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve a login identifier and secret to a subject. `None` means the
    /// credentials did not match; lookups that fail for other reasons are errors.
    async fn verify(&self, identifier: &str, secret: &str) -> ApplicationResult<Option<SubjectId>>;

    async fn is_active(&self, subject: &SubjectId) -> ApplicationResult<bool>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_role_flags(&self, subject: &SubjectId) -> ApplicationResult<Option<RoleFlags>>;

    /// Change the account's active flag. Returns `true` when the stored value changed.
    async fn set_active(&self, subject: &SubjectId, is_active: bool) -> ApplicationResult<bool>;
}
