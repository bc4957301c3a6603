// tests/support/mocks/mod.rs
//! Test doubles for the application ports.
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod accounts;
pub mod cache;
pub mod time;

pub use accounts::InMemoryAccounts;
pub use cache::FaultyCacheStore;
pub use time::{ManualClock, fixed_now};
