pub mod config;
pub mod domain;
pub mod error;
pub mod issuer;
pub mod runner;
pub mod telemetry;

pub use error::{ConfigError, LoadTestError};
pub use issuer::RequestIssuer;
