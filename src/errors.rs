use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Login was rejected or the login page could not be understood
    #[error("Authentication failed: {0}")]
    AuthError(String),
    /// Server answered with something other than an archive
    #[error("Unexpected response (not a zip file), Content-Type: {content_type}, Body: {body}")]
    UnexpectedResponse { content_type: String, body: String },
    /// Downloaded file is not a readable archive
    #[error("Archive error: {0}")]
    ArchiveError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// Token is neither a known region nor a known country code
    #[error("invalid country/region: {0}")]
    UnresolvableToken(String),
    /// Configuration could not be parsed, written or validated
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
    /// An error annotated with the step that produced it
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Wraps this error with a description of what was being attempted.
    pub fn context(self, context: impl Into<String>) -> Self {
        AppError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigError(format!("error parsing config file: {err}"))
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::ConfigError(format!("error serializing config: {err}"))
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::ArchiveError(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
