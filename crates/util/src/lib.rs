pub mod config;
pub mod path_processing;
pub mod redaction;
pub mod secrets;

pub use config::{ClientConfig, ConfigError, default_config_path, load_config, load_config_from_path};
pub use path_processing::{default_log_path, expand_tilde};
pub use redaction::{redact_json, redact_sensitive};
pub use secrets::{InterpolationError, SecretsBackend, interpolate_string, remove_secret, resolve_secret, secrets_backend, store_secret};
