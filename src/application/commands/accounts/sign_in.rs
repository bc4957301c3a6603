// src/application/commands/accounts/sign_in.rs
use super::AccountCommandService;
use crate::application::{
    dto::{AuthenticatedSubject, IssuedToken},
    error::{ApplicationError, ApplicationResult},
};

pub struct SignInCommand {
    pub email: String,
    pub password: String,
}

impl AccountCommandService {
    pub async fn sign_in(&self, command: SignInCommand) -> ApplicationResult<IssuedToken> {
        let email = command.email.trim();
        if email.is_empty() || command.password.is_empty() {
            return Err(ApplicationError::validation("email and password are required"));
        }

        let subject = self
            .credentials
            .verify(email, &command.password)
            .await?
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        if !self.credentials.is_active(&subject).await? {
            tracing::info!(subject = %subject, "sign-in refused for inactive account");
            return Err(ApplicationError::forbidden("account is disabled"));
        }

        self.sessions.issue_session(&subject).await
    }

    /// Revoke the token the caller authenticated with.
    pub async fn sign_out(&self, actor: &AuthenticatedSubject) -> ApplicationResult<()> {
        self.sessions.logout(&actor.subject_id, &actor.token).await
    }
}
