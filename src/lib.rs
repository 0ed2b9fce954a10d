pub mod auth_client;
pub mod configuration;
pub mod domain;
pub mod smoke;
pub mod telemetry;
