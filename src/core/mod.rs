// src/core/mod.rs
//! Configuration, HTTP access and log file handling

pub mod config_manager;
pub mod fs_ops;
pub mod status_client;

pub use config_manager::{CompanyConfig, CompanySecrets, ConfigManager, EnvSecrets, SecretStore};
pub use fs_ops::FsOps;
pub use status_client::{build_url, ApplicationSource, StatusClient};
