//! HTTP collector receiving tracker reports and appending them to daily CSV logs.

pub mod config;
mod error;
pub mod event_log;
pub mod handlers;
mod routes;
pub mod server;
pub mod state;

pub use config::CollectorConfig;
pub use error::CollectorError;
pub use server::CollectorServer;
