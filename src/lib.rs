pub mod config;
pub mod envelope;
pub mod error;
pub mod failure;
pub mod handlers;
pub mod i18n;
pub mod responder;
pub mod server;
