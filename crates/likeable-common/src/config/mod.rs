//! Configuration structs

mod app_config;

pub use app_config::{
    AppSettings, CascadeConfig, ConfigError, DatabaseConfig, Environment, LikeableConfig,
    LogFormat,
};
