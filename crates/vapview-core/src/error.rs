//! Error types for VAP Viewer Core

use thiserror::Error;

/// Result type alias for viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Viewer error types
#[derive(Error, Debug)]
pub enum Error {
    // Parameter errors
    #[error("Missing src parameter")]
    MissingSource,

    // Configuration errors
    #[error("Invalid configuration URL: {0}")]
    InvalidConfigUrl(String),

    #[error("Failed to fetch configuration from {url}: {reason}")]
    ConfigFetch { url: String, reason: String },

    #[error("Failed to decode configuration: {0}")]
    ConfigDecode(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Configuration document is not a JSON object")]
    ConfigNotObject,

    // Player errors
    #[error("Player initialization failed: {0}")]
    Initialization(String),

    // Network errors
    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl Error {
    /// Returns true if this error comes from configuration resolution.
    ///
    /// These never reach the user; the resolver degrades to an empty
    /// configuration instead.
    pub fn is_config_error(&self) -> bool {
        match self {
            Error::InvalidConfigUrl(_)
            | Error::ConfigFetch { .. }
            | Error::ConfigDecode(_)
            | Error::ConfigParse(_)
            | Error::ConfigNotObject => true,
            #[cfg(feature = "http")]
            Error::Network(_) => true,
            _ => false,
        }
    }

    /// Returns the error code for logs
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::MissingSource => "MISSING_SOURCE",
            Error::InvalidConfigUrl(_) => "CONFIG_URL",
            Error::ConfigFetch { .. } => "CONFIG_FETCH",
            Error::ConfigDecode(_) => "CONFIG_DECODE",
            Error::ConfigParse(_) => "CONFIG_PARSE",
            Error::ConfigNotObject => "CONFIG_NOT_OBJECT",
            Error::Initialization(_) => "INIT",
            #[cfg(feature = "http")]
            Error::Network(_) => "NETWORK",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_classified() {
        assert!(Error::ConfigNotObject.is_config_error());
        assert!(Error::ConfigDecode("bad utf-8".into()).is_config_error());
        assert!(!Error::MissingSource.is_config_error());
        assert!(!Error::Initialization("boom".into()).is_config_error());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::MissingSource.error_code(), "MISSING_SOURCE");
        assert_eq!(Error::Initialization("x".into()).error_code(), "INIT");
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(parse).error_code(), "CONFIG_PARSE");
    }
}
