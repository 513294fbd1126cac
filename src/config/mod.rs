//! Configuration module for drudge-links
//!
//! This module handles loading, parsing, and validating the optional TOML configuration
//! file. Every key has a default, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use drudge_links::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("drudge-links.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SourceConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
