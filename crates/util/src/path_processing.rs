use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Environment variable used to override where the TUI writes its log file.
pub const LOG_PATH_ENV: &str = "ENROLL_LOG_PATH";

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Directory holding enroll's configuration and log files.
pub fn enroll_config_dir() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("enroll")
}

/// Location of the log file used while the terminal UI owns the screen.
pub fn default_log_path() -> PathBuf {
    if let Ok(path) = env::var(LOG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }
    enroll_config_dir().join("enroll.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paths_are_untouched() {
        assert_eq!(expand_tilde(" /tmp/enroll.log "), PathBuf::from("/tmp/enroll.log"));
    }

    #[test]
    fn log_path_honors_environment_override() {
        temp_env::with_var(LOG_PATH_ENV, Some("/var/tmp/wizard.log"), || {
            assert_eq!(default_log_path(), PathBuf::from("/var/tmp/wizard.log"));
        });
    }
}
