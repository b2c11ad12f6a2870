//! Configuration structs

mod app_config;
mod reactions_config;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, RedisConfig,
};
pub use reactions_config::{ReactionsConfig, Zones};
