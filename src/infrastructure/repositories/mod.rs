// src/infrastructure/repositories/mod.rs
mod error;
mod postgres_account;

pub(crate) use error::map_sqlx;
pub use postgres_account::PostgresAccountStore;
