//! Configuration loading and validation.
//!
//! Precedence: environment variables > `<root>/.env` > `config.toml` > defaults.
//! Every section is `#[serde(default)]`, so a missing or empty config file is
//! valid.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::session::storage::validate_key;
use crate::session::store::DEFAULT_STORAGE_KEY;

/// Overrides the runtime root directory.
pub const HOME_ENV: &str = "SMARTHEALTH_HOME";

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session persistence and login behaviour.
    pub session: SessionConfig,
    /// Remote service endpoint.
    pub api: ApiConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Session persistence settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Storage key of the persisted session record.
    pub storage_key: String,
    /// Return to the originally requested path after login.
    pub resume_after_login: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            resume_after_login: true,
        }
    }
}

/// Remote service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the authentication and surveillance data service.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_owned(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Also write JSON logs to `<root>/logs/`.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: false,
        }
    }
}

impl Config {
    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Validate that configuration values are usable.
    ///
    /// # Errors
    ///
    /// Returns an error for an unsafe storage key or a non-http(s) base URL.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_key(&self.session.storage_key)
            .with_context(|| format!("session.storage_key {:?}", self.session.storage_key))?;

        check_base_url(&self.api.base_url).context("api.base_url")?;
        anyhow::ensure!(
            !self.logging.level.trim().is_empty(),
            "logging.level must not be empty"
        );
        Ok(())
    }

    /// Apply overrides from a variable resolver (env > config > defaults).
    ///
    /// Takes a resolver so tests need not touch the process environment.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("SMARTHEALTH_API_URL") {
            match check_base_url(&v) {
                Ok(()) => self.api.base_url = v,
                Err(e) => tracing::warn!(
                    var = "SMARTHEALTH_API_URL",
                    value = %v,
                    error = %e,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("SMARTHEALTH_LOG_LEVEL") {
            if v.trim().is_empty() {
                tracing::warn!(var = "SMARTHEALTH_LOG_LEVEL", "ignoring blank env override");
            } else {
                self.logging.level = v;
            }
        }
        if let Some(v) = env("SMARTHEALTH_STORAGE_KEY") {
            match validate_key(&v) {
                Ok(()) => self.session.storage_key = v,
                Err(_) => tracing::warn!(
                    var = "SMARTHEALTH_STORAGE_KEY",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("SMARTHEALTH_RESUME_AFTER_LOGIN") {
            match v.parse() {
                Ok(b) => self.session.resume_after_login = b,
                Err(_) => tracing::warn!(
                    var = "SMARTHEALTH_RESUME_AFTER_LOGIN",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }
}

/// An API base URL must parse and use http or https.
fn check_base_url(raw: &str) -> anyhow::Result<()> {
    let url = url::Url::parse(raw).with_context(|| format!("not a URL: {raw}"))?;
    anyhow::ensure!(
        url.scheme() == "http" || url.scheme() == "https",
        "must be http or https, found {}",
        url.scheme()
    );
    Ok(())
}

/// Load config from a TOML file. A missing file yields defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            tracing::debug!(path = %path.display(), "loading config from file");
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config at {}", path.display()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(anyhow::anyhow!(
            "failed to read config at {}: {e}",
            path.display()
        )),
    }
}

/// Read key/value pairs from a `.env` file. A missing file yields no pairs.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be parsed.
pub fn load_env_file(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let mut vars = BTreeMap::new();
    if !path.exists() {
        return Ok(vars);
    }
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read env file at {}", path.display()))?;
    for item in iter {
        let (key, value) = item
            .with_context(|| format!("failed to parse entry in env file {}", path.display()))?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Load, layer, and validate configuration for `paths`.
///
/// # Errors
///
/// Returns an error if any source fails to parse or the result is invalid.
pub fn load(paths: &RuntimePaths) -> anyhow::Result<Config> {
    let mut config = load_config(&paths.config_toml)?;
    let dotenv = load_env_file(&paths.env_file)?;
    config.apply_overrides(|key| std::env::var(key).ok().or_else(|| dotenv.get(key).cloned()));
    config.validate()?;
    Ok(config)
}

/// Resolved filesystem locations for client state.
#[derive(Debug, Clone)]
pub struct RuntimePaths {
    /// Root directory (`~/.smarthealth/` by default).
    pub root: PathBuf,
    /// Human-owned config file.
    pub config_toml: PathBuf,
    /// Optional `.env` overrides.
    pub env_file: PathBuf,
    /// Directory holding the persisted session record.
    pub session_dir: PathBuf,
    /// Directory for JSON log files.
    pub logs_dir: PathBuf,
}

impl RuntimePaths {
    /// Lay out paths under an explicit root.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_toml: root.join("config.toml"),
            env_file: root.join(".env"),
            session_dir: root.join("session"),
            logs_dir: root.join("logs"),
            root,
        }
    }
}

/// Resolve runtime paths: `explicit` root, else `$SMARTHEALTH_HOME`, else `~/.smarthealth/`.
///
/// # Errors
///
/// Returns an error if no override is given and the home directory cannot be determined.
pub fn runtime_paths(explicit: Option<&Path>) -> anyhow::Result<RuntimePaths> {
    if let Some(root) = explicit {
        return Ok(RuntimePaths::under(root));
    }
    if let Some(root) = std::env::var_os(HOME_ENV) {
        return Ok(RuntimePaths::under(root));
    }
    Ok(RuntimePaths::under(config_dir()?))
}

/// Default root directory (`~/.smarthealth/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".smarthealth"))
}
