// src/application/commands/accounts/admin.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::ports::accounts::UserDirectory;
use crate::domain::session::SubjectId;

pub(super) async fn ensure_admin(
    directory: &dyn UserDirectory,
    actor: &SubjectId,
) -> ApplicationResult<()> {
    let flags = directory.get_role_flags(actor).await?.unwrap_or_default();
    if flags.can_administer() {
        Ok(())
    } else {
        Err(ApplicationError::forbidden("admin access required"))
    }
}
