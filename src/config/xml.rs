//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - `$SMARTMV_CONFIG` must point to a readable file; the OS default location is optional.
//!
//! Notes:
//! - Unknown XML fields are rejected to surface misconfigurations early.
//! - Values are trimmed; empty elements count as unset.

use anyhow::Result;
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};
use super::CONFIG_ENV;
use crate::errors::SmartmvError;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default, deserialize_with = "de_i64_trimmed_opt")]
    warn_threshold: Option<i64>,
    log_level: Option<String>,
    log_file: Option<String>,
    git_binary: Option<String>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    git_timeout_seconds: Option<u64>,
    require_tracked: Option<bool>,
    preserve_metadata: Option<bool>,
}

// Custom deserializers that trim surrounding whitespace for optional integers
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<u64>().ok()))
}

fn de_i64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<i64>().ok()))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config on top of the defaults
fn xml_to_config(parsed: XmlConfig) -> Result<Config, SmartmvError> {
    let mut cfg = Config::default();

    if let Some(raw) = parsed.warn_threshold {
        cfg.warn_threshold = Config::threshold_from(raw);
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(SmartmvError::Config)?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);
    if let Some(s) = non_empty(parsed.git_binary.as_deref()) {
        cfg.git_binary = PathBuf::from(s);
    }
    if let Some(secs) = parsed.git_timeout_seconds.filter(|s| *s > 0) {
        cfg.git_timeout = Duration::from_secs(secs);
    }
    cfg.require_tracked = parsed.require_tracked.unwrap_or(cfg.require_tracked);
    cfg.preserve_metadata = parsed.preserve_metadata.unwrap_or(cfg.preserve_metadata);

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| {
        SmartmvError::Config(format!("cannot read '{}': {}", path.display(), e))
    })?;
    let parsed: XmlConfig = from_xml_str(&contents).map_err(|e| {
        SmartmvError::Config(format!("cannot parse '{}': {}", path.display(), e))
    })?;
    let cfg = xml_to_config(parsed)?;
    debug!(path = %path.display(), "Loaded config");
    Ok(cfg)
}

/// Resolve the effective configuration file and load it.
///
/// - `$SMARTMV_CONFIG` set: the file must exist and parse.
/// - Otherwise the OS default is used when present; a missing file yields defaults.
pub fn load_config() -> Result<Config> {
    if let Some(p) = env::var_os(CONFIG_ENV) {
        return load_config_from_xml_path(Path::new(&p));
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_config_from_xml_path(&path),
        _ => Ok(Config::default()),
    }
}

/// Example file printed by `--print-config`.
pub fn template() -> String {
    format!(
        "<config>\n  <warn_threshold>100</warn_threshold>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <git_binary>{}</git_binary>\n  <git_timeout_seconds>{}</git_timeout_seconds>\n  <require_tracked>false</require_tracked>\n  <preserve_metadata>true</preserve_metadata>\n</config>\n",
        super::DEFAULT_GIT_BINARY,
        super::DEFAULT_GIT_TIMEOUT.as_secs()
    )
}
