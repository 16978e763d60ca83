pub mod alerts;
pub mod config;
pub mod download;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod period;
pub mod serializer;
pub mod server;
pub mod services;
pub mod sql;

pub use error::AlertsError;
