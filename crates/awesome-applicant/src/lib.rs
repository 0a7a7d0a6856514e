pub mod applicants;
pub mod config;
pub mod error;
pub mod telemetry;
