//! Connection configuration and API-key resolution.
//!
//! # Design
//! `FathomConnection` only ever receives a finished `ConnectionConfig`.
//! Reading the process environment and the `~/.env` file happens here,
//! before the connection is built, so a missing key fails fast with no
//! network activity.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.fathom.ai/external/v1";
pub const API_KEY_VAR: &str = "FATHOM_API_KEY";

/// Immutable settings for one connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    api_key: String,
    base_url: String,
    debug: bool,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("api_key", &format_args!("<{} chars>", self.api_key.chars().count()))
            .field("base_url", &self.base_url)
            .field("debug", &self.debug)
            .finish()
    }
}

impl ConnectionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            debug: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Resolve the API key from, in order: `explicit`, the process
    /// environment, then `env_file` (defaulting to `~/.env`).
    pub fn resolve(explicit: Option<String>, env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let env_file = env_file.map(Path::to_path_buf).or_else(default_env_file);
        let api_key = resolve_api_key(
            explicit,
            std::env::var(API_KEY_VAR).ok(),
            env_file.as_deref(),
        )?;
        Ok(Self::new(api_key))
    }
}

/// `~/.env`, when a home directory is known.
pub fn default_env_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".env"))
}

/// Pick the first non-empty key from the explicit value, the process
/// environment value, and the env file.
pub fn resolve_api_key(
    explicit: Option<String>,
    from_process: Option<String>,
    env_file: Option<&Path>,
) -> Result<String, ConfigError> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key);
    }
    if let Some(key) = from_process.filter(|k| !k.is_empty()) {
        tracing::debug!("using {API_KEY_VAR} from the process environment");
        return Ok(key);
    }
    if let Some(path) = env_file {
        if let Some(key) = load_env_file(path)?
            .remove(API_KEY_VAR)
            .filter(|k| !k.is_empty())
        {
            tracing::debug!(path = %path.display(), "using {API_KEY_VAR} from env file");
            return Ok(key);
        }
    }
    Err(ConfigError::MissingApiKey {
        env_file: env_file.map(Path::to_path_buf),
    })
}

/// Parse a dotenv-style file without touching the process environment.
/// A missing file yields an empty map.
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let env_error = |e: dotenv::Error| ConfigError::EnvFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut vars = HashMap::new();
    for item in dotenv::from_path_iter(path).map_err(env_error)? {
        let (key, value) = item.map_err(env_error)?;
        vars.insert(key, value);
    }
    Ok(vars)
}
