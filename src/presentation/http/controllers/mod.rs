// src/presentation/http/controllers/mod.rs
pub mod auth;
pub mod status;
pub mod users;
