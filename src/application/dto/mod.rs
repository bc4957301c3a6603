// src/application/dto/mod.rs
pub mod auth;
pub mod sessions;

pub use auth::{AuthenticatedSubject, IssuedToken};
pub use sessions::{RevocationSummary, SessionInfoDto};
