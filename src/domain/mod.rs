// src/domain/mod.rs
pub mod errors;
pub mod session;
pub mod account;
