//! Process bootstrap shared by Feast binaries: layered configuration,
//! home directory resolution and logging initialization.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    default_logging_config, AppConfig, AppSection, BackendConfig, CliArgs, LoggingConfig, Section,
};
