use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors (terminal, log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Transport-level HTTP failure (connection refused, malformed body, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("server returned {status} for {path}")]
    Status { status: u16, path: String },

    /// The server base URL could not be used to build requests.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn status_error_display() {
        let err = AppError::Status {
            status: 404,
            path: "/docs".into(),
        };
        assert_eq!(err.to_string(), "server returned 404 for /docs");
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn invalid_url_error_display() {
        let err = AppError::InvalidUrl("not-a-url".into());
        assert_eq!(err.to_string(), "Invalid server URL: not-a-url");
    }
}
