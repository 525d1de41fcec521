//! Configuration module for Media Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and applying the `DATABASE_URL` / `PORT` environment overrides.
//!
//! # Example
//!
//! ```no_run
//! use media_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvester.toml")).unwrap();
//! println!("Worker batch size: {}", config.worker.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DatabaseConfig, ServerConfig, UserAgentConfig, WorkerConfig};

// Re-export parser functions
pub use parser::{apply_env_overrides, load_config, load_config_or_default};
pub use validation::validate;
