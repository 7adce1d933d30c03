//! Infrastructure adapters: AI providers, failover, and SQLite persistence.

pub mod failover;
pub mod ports;
pub mod providers;
pub mod sqlite;

pub use failover::FailoverAiClient;
