// src/lib.rs
//! Session-token issuance, tracking and revocation over a TTL cache store.
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
