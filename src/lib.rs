pub mod config;
pub mod location;
pub mod output;
pub mod scoring;
pub mod telemetry;
