//! Error types for htmltrace

use std::path::PathBuf;

/// htmltrace error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to rotate {from} to {to}: {source}")]
    RotationFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for htmltrace
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("max_files must be at least 1");
        assert_eq!(err.to_string(), "Config error: max_files must be at least 1");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
    }

    #[test]
    fn test_rotation_error_display() {
        let err = Error::RotationFailed {
            from: PathBuf::from("Trace App/trace.html"),
            to: PathBuf::from("Trace App/2024-01-01_10_00_00_trace.html"),
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "exists"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to rotate Trace App/trace.html"));
        assert!(msg.contains("2024-01-01_10_00_00_trace.html"));
    }
}
