// src/application/ports/mod.rs
pub mod accounts;
pub mod cache;
pub mod security;
pub mod time;

