pub mod app_config;
pub mod catalog;
pub mod config;
pub mod property;
pub mod route;
pub mod schedule;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, SheetsSettings};
pub use catalog::{PropertyCatalog, RouteOption};
pub use config::{load_app_config, load_app_config_from_env};
pub use property::{ListingKind, NewProperty, Position, PropertyCategory, PropertyRecord};
pub use route::{Leg, RouteRequest, RouteResponse, RouteSource, RouteStep};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("route request must select at least one property")]
    EmptySelection,

    #[error("invalid start time \"{0}\": expected HH:MM")]
    InvalidStartTime(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
