//! Configuration loader
//!
//! ## Loading Strategy
//! 1. An explicit path (from `--config`) must exist and parse
//! 2. Otherwise probe for `toggldeck.json` / `toggldeck.toml`
//! 3. Without any file, every setting takes its default
//! 4. `TOGGLDECK_*` environment variables override whatever was loaded
//!
//! ## Environment Variables
//! - `TOGGLDECK_API_BASE_URL`: Toggl API root
//! - `TOGGLDECK_API_TIMEOUT`: request timeout in seconds
//! - `TOGGLDECK_TICK_MILLIS`: refresh tick in milliseconds
//! - `TOGGLDECK_DEFAULT_POLL_SECONDS`: poll frequency for buttons without one
//! - `TOGGLDECK_LOG_LEVEL`: `tracing` filter directive
//! - `TOGGLDECK_LOG_FORMAT`: `pretty` or `json`
//! - `TOGGLDECK_LOG_DIR`: directory for rolling log files
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. The current working directory
//! 2. The directory holding the executable (the plugin bundle)
//! 3. Its parent directory

use std::path::{Path, PathBuf};
use std::str::FromStr;

use toggldeck_domain::{DeckError, LogFormat, PluginConfig, Result};
use url::Url;

const CONFIG_FILE_STEM: &str = "toggldeck";

/// Load configuration following the strategy above.
///
/// # Errors
/// Returns `DeckError::Config` if an explicit file is missing, a file does
/// not parse, an environment override is malformed, or the result fails
/// validation.
pub fn load(explicit: Option<&Path>) -> Result<PluginConfig> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(DeckError::Config(format!("Config file not found: {}", path.display())));
        }
        Some(path) => Some(path.to_path_buf()),
        None => probe_config_paths(),
    };

    let mut config = match path {
        Some(path) => load_from_file(&path)?,
        None => {
            tracing::debug!("No config file found; using defaults");
            PluginConfig::default()
        }
    };

    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a JSON or TOML file (by extension).
pub fn load_from_file(path: &Path) -> Result<PluginConfig> {
    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| DeckError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, path)
}

fn parse_config(contents: &str, path: &Path) -> Result<PluginConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DeckError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DeckError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(DeckError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing `toggldeck.{json,toml}` in the probe order.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
            dirs.push(exe_dir.join(".."));
        }
    }

    dirs.iter()
        .flat_map(|dir| {
            ["json", "toml"].map(|ext| dir.join(format!("{CONFIG_FILE_STEM}.{ext}")))
        })
        .find(|path| path.exists())
}

/// Overlay `TOGGLDECK_*` variables on `config`.
pub fn apply_env_overrides(config: &mut PluginConfig) -> Result<()> {
    if let Some(base_url) = env_string("TOGGLDECK_API_BASE_URL") {
        config.api.base_url = base_url;
    }
    if let Some(timeout) = env_parse::<u64>("TOGGLDECK_API_TIMEOUT")? {
        config.api.timeout_seconds = timeout;
    }
    if let Some(tick) = env_parse::<u64>("TOGGLDECK_TICK_MILLIS")? {
        config.refresh.tick_millis = tick;
    }
    if let Some(poll) = env_parse::<u64>("TOGGLDECK_DEFAULT_POLL_SECONDS")? {
        config.refresh.default_poll_seconds = poll;
    }
    if let Some(level) = env_string("TOGGLDECK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = env_string("TOGGLDECK_LOG_FORMAT") {
        config.logging.format = parse_log_format(&format)?;
    }
    if let Some(directory) = env_string("TOGGLDECK_LOG_DIR") {
        config.logging.directory = Some(directory);
    }
    Ok(())
}

fn validate(config: &PluginConfig) -> Result<()> {
    let url = Url::parse(&config.api.base_url)
        .map_err(|e| DeckError::Config(format!("Invalid API base URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(DeckError::Config(format!("Unsupported API URL scheme: {}", url.scheme())));
    }
    if config.api.timeout_seconds == 0 {
        return Err(DeckError::Config("api.timeout_seconds must be positive".into()));
    }
    if config.refresh.tick_millis == 0 {
        return Err(DeckError::Config("refresh.tick_millis must be positive".into()));
    }
    if config.refresh.default_poll_seconds == 0 {
        return Err(DeckError::Config("refresh.default_poll_seconds must be positive".into()));
    }
    Ok(())
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pretty" | "text" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(DeckError::Config(format!("Invalid log format: {other}"))),
    }
}

/// Non-blank environment variable.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|e| DeckError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}
