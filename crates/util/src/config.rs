//! Client configuration for the registration service.
//!
//! Settings are read from `~/.config/enroll/config.json` (or the path in
//! `ENROLL_CONFIG_PATH`), then selected environment variables override the
//! file. The token is stored as a placeholder such as
//! `${secret:enroll-api-token}` and only interpolated when the client is
//! built.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::path_processing::{enroll_config_dir, expand_tilde};
use crate::secrets::{InterpolationError, has_placeholders, interpolate_string};

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "ENROLL_CONFIG_PATH";
/// Environment variable overriding the registration service base URL.
pub const API_BASE_ENV: &str = "ENROLL_API_BASE";
/// Environment variable holding the bearer token (or a placeholder for it).
pub const API_TOKEN_ENV: &str = "ENROLL_API_TOKEN";

pub const DEFAULT_BASE_URL: &str = "https://renting-api.onrender.com";
pub const DEFAULT_REGISTER_PATH: &str = "/users/register";
pub const DEFAULT_USER_TYPE: &str = "admin";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error surfaced when loading configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error for {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
}

/// Settings used to reach the registration service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Scheme and host of the registration service.
    pub base_url: String,
    /// Path of the registration endpoint, appended to `base_url`.
    pub register_path: String,
    /// Bearer token or a `${env:..}` / `${secret:..}` placeholder for it.
    pub token: Option<String>,
    /// Request timeout; a request that exceeds it counts as a transport failure.
    pub timeout_secs: u64,
    /// Constant value submitted as the hidden `userType` field.
    pub user_type: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            register_path: DEFAULT_REGISTER_PATH.to_string(),
            token: Some(format!("${{env:{}}}", API_TOKEN_ENV)),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_type: DEFAULT_USER_TYPE.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the registration endpoint.
    pub fn register_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.register_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Resolve the bearer token, interpolating any placeholder.
    ///
    /// Returns `Ok(None)` when no token is configured or the placeholder's
    /// environment variable is unset; the request is then sent without an
    /// `Authorization` header.
    pub fn resolve_token(&self) -> Result<Option<String>, ConfigError> {
        let Some(raw) = self.token.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        if !has_placeholders(raw) {
            return Ok(Some(raw.to_string()));
        }
        match interpolate_string(raw) {
            Ok(token) if token.trim().is_empty() => Ok(None),
            Ok(token) => Ok(Some(token)),
            Err(InterpolationError::MissingEnvVar { name }) => {
                warn!(variable = %name, "registration token variable is not set; sending unauthenticated requests");
                Ok(None)
            }
            Err(error) => Err(error.into()),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base) = env::var(API_BASE_ENV)
            && !base.trim().is_empty()
        {
            debug!(base = %base, "base URL overridden from environment");
            self.base_url = base.trim().to_string();
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeoutSecs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.user_type.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "userType",
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }
    enroll_config_dir().join("config.json")
}

/// Loads configuration from the default path.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    load_config_from_path(&default_config_path())
}

/// Loads configuration from a specific path. A missing file yields defaults.
pub fn load_config_from_path(path: &Path) -> Result<ClientConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            ClientConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        temp_env::with_var(API_BASE_ENV, None::<&str>, || {
            let dir = tempfile::tempdir().expect("temp dir");
            let config = load_config_from_path(&dir.path().join("absent.json")).expect("defaults load");
            assert_eq!(config, ClientConfig::default());
            assert_eq!(config.register_url(), "https://renting-api.onrender.com/users/register");
        });
    }

    #[test]
    fn partial_file_is_layered_over_defaults() {
        temp_env::with_var(API_BASE_ENV, None::<&str>, || {
            let mut file = tempfile::NamedTempFile::new().expect("temp file");
            write!(file, r#"{{"baseUrl":"http://localhost:8080/","timeoutSecs":5}}"#).expect("write config");
            let config = load_config_from_path(file.path()).expect("config loads");
            assert_eq!(config.register_url(), "http://localhost:8080/users/register");
            assert_eq!(config.timeout(), Duration::from_secs(5));
            assert_eq!(config.user_type, DEFAULT_USER_TYPE);
        });
    }

    #[test]
    fn environment_overrides_base_url() {
        temp_env::with_var(API_BASE_ENV, Some("http://127.0.0.1:9000"), || {
            let dir = tempfile::tempdir().expect("temp dir");
            let config = load_config_from_path(&dir.path().join("absent.json")).expect("config loads");
            assert_eq!(config.base_url, "http://127.0.0.1:9000");
        });
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"timeoutSecs":0}}"#).expect("write config");
        let error = load_config_from_path(file.path()).expect_err("zero timeout is invalid");
        assert!(matches!(error, ConfigError::Invalid { field: "timeoutSecs", .. }));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write config");
        let error = load_config_from_path(file.path()).expect_err("parse fails");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn token_resolves_from_environment_placeholder() {
        temp_env::with_var(API_TOKEN_ENV, Some("secret-token"), || {
            let config = ClientConfig::default();
            assert_eq!(config.resolve_token().expect("token resolves"), Some("secret-token".to_string()));
        });
    }

    #[test]
    fn unset_token_variable_means_no_token() {
        temp_env::with_var(API_TOKEN_ENV, None::<&str>, || {
            let config = ClientConfig::default();
            assert_eq!(config.resolve_token().expect("missing token tolerated"), None);
        });
    }

    #[test]
    fn literal_token_is_used_verbatim() {
        let config = ClientConfig {
            token: Some("literal".to_string()),
            ..ClientConfig::default()
        };
        assert_eq!(config.resolve_token().expect("literal token"), Some("literal".to_string()));
    }
}
