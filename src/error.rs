//! Custom error types for eduportal
//!
//! User-friendly error messages for all failure scenarios.

use thiserror::Error;

/// Main error type for the eduportal application
#[derive(Error, Debug)]
pub enum PortalError {
    /// Request to the portal API timed out
    #[error("The request timed out: {0}\n\n  → Check your internet connection and try again.")]
    Timeout(String),

    /// Could not reach the portal API
    #[error("Could not connect to the server: {0}\n\n  → Check your internet connection.\n  → Verify the API address with 'edu config get api-url'.")]
    Connection(String),

    /// Portal API answered with a non-success status
    #[error("Server responded with {status}: {message}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Reason phrase or response body summary
        message: String,
    },

    /// Network request error not covered by the variants above
    #[error("Network request failed: {0}\n\n  → Check your internet connection.")]
    Network(#[from] reqwest::Error),

    /// Invalid API address in configuration
    #[error("Invalid API address '{0}'\n\n  → Expected an absolute URL such as http://localhost:5000/api/v1")]
    InvalidUrl(String),

    /// Preference store could not be read or written
    #[error("Cannot access preference storage: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Failed to parse data: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML serialization/deserialization error
    #[error("Configuration file is invalid: {0}")]
    Toml(String),

    /// Terminal/TUI error
    #[error("Terminal error: {0}\n\n  → Try resizing your terminal or restarting it.")]
    Terminal(String),

    /// Notification index out of range
    #[error("Notification #{0} does not exist.")]
    NotificationNotFound(usize),

    /// A background task panicked or was aborted unexpectedly
    #[error("Background task failed: {0}")]
    Task(String),

    /// Invalid input from user
    #[error("{0}")]
    InvalidInput(String),
}

impl PortalError {
    /// Short, stable kind name used when surfacing errors as `"{name}: {message}"`
    pub fn name(&self) -> &'static str {
        match self {
            PortalError::Timeout(_) => "TimeoutError",
            PortalError::Connection(_) => "ConnectionError",
            PortalError::HttpStatus { .. } => "HttpError",
            PortalError::Network(_) => "NetworkError",
            PortalError::InvalidUrl(_) => "UrlError",
            PortalError::Storage(_) => "StorageError",
            PortalError::Config(_) => "ConfigError",
            PortalError::Io(_) => "IoError",
            PortalError::Json(_) => "ParseError",
            PortalError::Toml(_) => "ConfigError",
            PortalError::Terminal(_) => "TerminalError",
            PortalError::NotificationNotFound(_) => "NotFoundError",
            PortalError::Task(_) => "TaskError",
            PortalError::InvalidInput(_) => "InputError",
        }
    }

    /// First line of the display message, without the `→` hints
    pub fn summary(&self) -> String {
        self.to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

impl From<toml::de::Error> for PortalError {
    fn from(err: toml::de::Error) -> Self {
        PortalError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for PortalError {
    fn from(err: toml::ser::Error) -> Self {
        PortalError::Toml(err.to_string())
    }
}

impl From<url::ParseError> for PortalError {
    fn from(err: url::ParseError) -> Self {
        PortalError::InvalidUrl(err.to_string())
    }
}

/// Result type alias using PortalError
pub type Result<T> = std::result::Result<T, PortalError>;
