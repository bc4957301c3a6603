// src/application/commands/accounts/mod.rs
mod admin;
mod service;
mod sign_in;
mod status;

pub use service::AccountCommandService;
pub use sign_in::SignInCommand;
pub use status::StatusChange;
