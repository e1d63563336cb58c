//! Error types and handling for the JanmaBhoomi explorer

use thiserror::Error;

/// Main error type for the JanmaBhoomi explorer
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport failures and non-success HTTP responses
    #[error("Network error: {message}")]
    Network { message: String },

    /// A valid response that lacked the requested field
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExplorerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for transport-level failures, false for everything else
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, ExplorerError::Network { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ExplorerError::Network { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            ExplorerError::NotFound { message } => format!("Nothing found: {message}"),
            ExplorerError::Validation { message } => message.clone(),
            ExplorerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = ExplorerError::config("bad port");
        assert!(matches!(config_err, ExplorerError::Config { .. }));

        let network_err = ExplorerError::network("connection refused");
        assert!(network_err.is_network());

        let missing = ExplorerError::not_found("no extract");
        assert!(!missing.is_network());
    }

    #[test]
    fn test_user_messages() {
        let network_err = ExplorerError::network("test");
        assert!(network_err.user_message().contains("Unable to connect"));

        let validation_err = ExplorerError::validation("Please enter a place name.");
        assert_eq!(validation_err.user_message(), "Please enter a place name.");

        let missing = ExplorerError::not_found("Politics of Atlantis");
        assert!(missing.user_message().contains("Politics of Atlantis"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExplorerError = io_err.into();
        assert!(matches!(err, ExplorerError::Io { .. }));
    }
}
