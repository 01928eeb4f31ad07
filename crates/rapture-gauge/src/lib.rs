pub mod config;
pub mod error;
pub mod gauge;
pub mod telemetry;
