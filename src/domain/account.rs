// src/domain/account.rs
use serde::Serialize;

/// Role and status flags the user directory reports for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_active: bool,
}

impl RoleFlags {
    /// Admin rights only count for an account that is still active.
    pub const fn can_administer(&self) -> bool {
        self.is_admin && self.is_active
    }
}
