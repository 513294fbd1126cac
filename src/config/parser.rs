use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use drudge_links::config::load_config;
///
/// let config = load_config(Path::new("drudge-links.toml")).unwrap();
/// println!("Workers: {}", config.crawler.workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
///
/// Missing sections and keys fall back to their defaults. The archive base URL is
/// normalised to end with a `/` so paths can be appended to it directly.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;

    if !config.source.base_url.ends_with('/') {
        config.source.base_url.push('/');
    }

    validate(&config)?;

    Ok(config)
}

/// Hex-encoded SHA-256 of a configuration file's bytes
///
/// Logged at startup so the output of a crawl can be tied back to the settings it ran
/// with.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let bytes = std::fs::read(path)?;
    Ok(hash_content(&bytes))
}

/// Loads a configuration together with the hash of the exact text that was parsed
///
/// The file is read once, so the hash always matches the settings returned.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(content.as_bytes())))
}

fn hash_content(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
