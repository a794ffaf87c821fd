//! Interpolation of environment variables and keychain secrets.
//!
//! Configuration values may reference `${env:NAME}` or `${secret:NAME}`
//! placeholders. The registration bearer token is resolved this way so it is
//! never embedded in source or written in clear text to the config file.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

static SERVICE: &str = "enroll";
/// Environment variable used to select the secret resolution backend.
pub const SECRETS_BACKEND_ENV_VAR: &str = "ENROLL_SECRETS_BACKEND";

static ENV_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{env:([\w+_-]*)}").expect("env placeholder regex should compile"));
static SECRET_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{secret:([\w+_-]*)}").expect("secret placeholder regex should compile"));

/// Secret resolution backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretsBackend {
    /// Resolve `${secret:NAME}` values via OS keychain (`keyring-rs`).
    Keychain,
    /// Resolve `${secret:NAME}` values from process environment variable `NAME`.
    Environment,
}

impl SecretsBackend {
    fn from_env_var(raw: Option<String>) -> Self {
        match raw.unwrap_or_default().trim().to_ascii_lowercase().as_str() {
            "env" => Self::Environment,
            _ => Self::Keychain,
        }
    }
}

/// Determine the currently configured secrets backend.
pub fn secrets_backend() -> SecretsBackend {
    let configured_value = std::env::var(SECRETS_BACKEND_ENV_VAR).ok();
    SecretsBackend::from_env_var(configured_value)
}

/// Whether the value contains any placeholder that needs resolving.
pub fn has_placeholders(value: &str) -> bool {
    ENV_PLACEHOLDER.is_match(value) || SECRET_PLACEHOLDER.is_match(value)
}

/// Interpolate a string value, replacing ${env:NAME} and ${secret:NAME} patterns.
pub fn interpolate_string(value: &str) -> Result<String, InterpolationError> {
    let mut resolved_env = Vec::new();
    for cap in ENV_PLACEHOLDER.captures_iter(value) {
        let var_name = cap[1].to_string();
        let env_value = std::env::var(&var_name).map_err(|_| InterpolationError::MissingEnvVar { name: var_name.clone() })?;
        debug!("Interpolated env var: {} -> [REDACTED]", var_name);
        resolved_env.push((cap[0].to_string(), env_value));
    }

    let mut resolved_secrets = Vec::new();
    for cap in SECRET_PLACEHOLDER.captures_iter(value) {
        let secret_name = cap[1].to_string();
        let secret_value = resolve_secret(&secret_name)?;
        debug!("Interpolated secret: {} -> [REDACTED]", secret_name);
        resolved_secrets.push((cap[0].to_string(), secret_value));
    }

    let mut result = value.to_string();
    for (placeholder, env_value) in resolved_env {
        result = result.replace(&placeholder, &env_value);
    }
    for (placeholder, secret_value) in resolved_secrets {
        result = result.replace(&placeholder, &secret_value);
    }

    Ok(result)
}

/// Resolve a secret using the configured secrets backend.
pub fn resolve_secret(name: &str) -> Result<String, InterpolationError> {
    match secrets_backend() {
        SecretsBackend::Environment => std::env::var(name).map_err(|error| InterpolationError::MissingSecret {
            name: name.to_string(),
            error: error.to_string(),
        }),
        SecretsBackend::Keychain => {
            let keyring = keychain_entry(name)?;
            keyring.get_password().map_err(|e| InterpolationError::MissingSecret {
                name: name.to_string(),
                error: e.to_string(),
            })
        }
    }
}

/// Store a secret in the OS keychain.
pub fn store_secret(name: &str, value: &str) -> Result<(), InterpolationError> {
    let keyring = keychain_entry(name)?;
    keyring.set_password(value).map_err(|e| InterpolationError::KeyringError {
        name: name.to_string(),
        error: e.to_string(),
    })?;

    debug!("Stored secret in keychain: {}", name);
    Ok(())
}

/// Remove a secret from the OS keychain.
pub fn remove_secret(name: &str) -> Result<(), InterpolationError> {
    let keyring = keychain_entry(name)?;
    keyring.delete_credential().map_err(|e| InterpolationError::KeyringError {
        name: name.to_string(),
        error: e.to_string(),
    })?;

    debug!("Removed secret from keychain: {}", name);
    Ok(())
}

fn keychain_entry(name: &str) -> Result<keyring::Entry, InterpolationError> {
    keyring::Entry::new(SERVICE, name).map_err(|e| InterpolationError::KeyringError {
        name: name.to_string(),
        error: e.to_string(),
    })
}

/// Errors that can occur during interpolation.
#[derive(Debug, Error, Clone)]
pub enum InterpolationError {
    #[error("Missing environment variable: {name}")]
    MissingEnvVar { name: String },

    #[error("Missing secret: {name} - {error}")]
    MissingSecret { name: String, error: String },

    #[error("Keyring error for {name}: {error}")]
    KeyringError { name: String, error: String },
}
