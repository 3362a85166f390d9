//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration from {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to save configuration to {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("could not locate the configuration directory")]
    Locate(#[source] confy::ConfyError),
}

/// Errors from the Google sign-in flow.
///
/// The display strings end up verbatim in the error toast, so they are
/// written for the person at the keyboard.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Google sign-in is not configured")]
    NotConfigured,

    #[error("could not open the browser: {0}")]
    Browser(#[source] std::io::Error),

    #[error("sign-in callback failed: {0}")]
    Callback(#[source] std::io::Error),

    #[error("sign-in was cancelled: {0}")]
    Denied(String),

    #[error("timed out waiting for the browser to finish signing in")]
    Timeout,

    #[error("token exchange failed: {0}")]
    Exchange(String),

    #[error("unexpected response from the auth service: {0}")]
    InvalidResponse(String),

    #[error("invalid auth service URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Top-level application error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("terminal program failed")]
    Program(#[from] bubbletea_rs::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages_are_readable() {
        assert_eq!(
            AuthError::NotConfigured.to_string(),
            "Google sign-in is not configured"
        );
        assert_eq!(
            AuthError::Exchange("HTTP 400".to_string()).to_string(),
            "token exchange failed: HTTP 400"
        );
    }

    #[test]
    fn test_url_errors_convert() {
        let err: AuthError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, AuthError::Url(_)));
        assert!(err.to_string().starts_with("invalid auth service URL"));
    }

    #[test]
    fn test_io_errors_keep_their_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port busy");
        let err = AuthError::Callback(io);
        assert_eq!(err.to_string(), "sign-in callback failed: port busy");
        assert!(err.source().is_some());
    }
}
