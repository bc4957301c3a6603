// src/application/mod.rs
pub mod commands;
pub mod dto;
pub mod error;
pub mod ports;
pub mod services;
pub mod sessions;

pub use error::ApplicationResult;
