// src/domain/session/mod.rs
pub mod claims;
pub mod value_objects;

pub use claims::{CLAIMS_VERSION, TokenClaims};
pub use value_objects::{SubjectId, TokenFingerprint};
