//! Exporter config: built-in defaults, an optional strict YAML file, then
//! command-line overrides.
//!
//! `parse_*` only decode. `load_*` decode and validate, for callers that use a
//! file as-is.

pub mod cli;
pub mod schema;

use std::fs;

use natsprom_core::error::{NatsPromError, Result};

pub use cli::Args;
pub use schema::ExporterConfig;

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let cfg = parse_file(path)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn parse_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| NatsPromError::Config(format!("read config {path} failed: {e}")))?;
    parse_str(&s)
}

pub fn parse_str(s: &str) -> Result<ExporterConfig> {
    serde_yaml::from_str(s).map_err(|e| NatsPromError::Config(format!("invalid yaml: {e}")))
}
