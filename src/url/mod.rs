//! URL handling module for drudge-links
//!
//! This module provides the domain extraction used by the aggregation commands.

mod domain;

// Re-export main functions
pub use domain::{extract_host, registrable_domain};
