//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Malformed cricket-hub.toml")]
    Toml(#[from] toml::de::Error),

    /// A value outside `[admin]` is out of range.
    #[error("Invalid config: {0}")]
    Validation(String),

    /// The keystroke gate or the admin account is unusable.
    #[error("[admin.{field}] {reason}")]
    Admin { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_file() {
        let err = ConfigError::Io(
            PathBuf::from("cricket-hub.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert_eq!(err.to_string(), "Failed to read config `cricket-hub.toml`");
    }

    #[test]
    fn test_admin_error_names_field() {
        let err = ConfigError::Admin {
            field: "window",
            reason: "must be at least 9 to hold the sequence".into(),
        };
        assert_eq!(
            err.to_string(),
            "[admin.window] must be at least 9 to hold the sequence"
        );
    }
}
