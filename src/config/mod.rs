//! Configuration module for Site-Binder
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Command line flags are applied on top of a parsed file before validation.
//!
//! # Example
//!
//! ```no_run
//! use site_binder::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("binder.toml")).unwrap();
//! println!("Crawling from: {}", config.site.start_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, parse_config, parse_config_str};
pub use validation::validate;
