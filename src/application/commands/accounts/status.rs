// src/application/commands/accounts/status.rs
use super::{AccountCommandService, admin::ensure_admin};
use crate::application::{
    dto::{AuthenticatedSubject, RevocationSummary},
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::session::SubjectId;
use serde::Serialize;

/// Result of an activation or deactivation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// `false` when the account was already in the requested state.
    pub changed: bool,
    pub revoked: RevocationSummary,
}

impl AccountCommandService {
    /// Deactivate the caller's own account and revoke all of its tokens.
    pub async fn deactivate_self(
        &self,
        actor: &AuthenticatedSubject,
    ) -> ApplicationResult<StatusChange> {
        self.deactivate_subject(&actor.subject_id).await
    }

    /// Admin-only: deactivate `target` and revoke all of its tokens.
    pub async fn deactivate_user(
        &self,
        actor: &AuthenticatedSubject,
        target: &SubjectId,
    ) -> ApplicationResult<StatusChange> {
        ensure_admin(self.directory.as_ref(), &actor.subject_id).await?;
        self.ensure_known(target).await?;
        self.deactivate_subject(target).await
    }

    /// Admin-only: reactivate `target`. Tokens revoked earlier stay revoked.
    pub async fn activate_user(
        &self,
        actor: &AuthenticatedSubject,
        target: &SubjectId,
    ) -> ApplicationResult<StatusChange> {
        ensure_admin(self.directory.as_ref(), &actor.subject_id).await?;
        self.ensure_known(target).await?;

        let changed = self.directory.set_active(target, true).await?;
        tracing::info!(subject = %target, changed, "account activated");
        Ok(StatusChange {
            changed,
            revoked: RevocationSummary::default(),
        })
    }

    async fn deactivate_subject(&self, target: &SubjectId) -> ApplicationResult<StatusChange> {
        let changed = self.directory.set_active(target, false).await?;
        // Revoke even when the flag was already off.
        let revoked = self.sessions.deactivate(target).await?;
        tracing::info!(
            subject = %target,
            changed,
            banned = revoked.banned,
            "account deactivated"
        );
        Ok(StatusChange { changed, revoked })
    }

    async fn ensure_known(&self, target: &SubjectId) -> ApplicationResult<()> {
        if self.directory.get_role_flags(target).await?.is_some() {
            Ok(())
        } else {
            Err(ApplicationError::not_found("user not found"))
        }
    }
}
