//! Application layer of the `tgbot` tool: configuration resolution, logging
//! setup and the command line front end over [`tgbot_api`].

pub mod cli;
pub mod config;
pub mod logging;

pub use config::{AppConfig, ConfigError};
