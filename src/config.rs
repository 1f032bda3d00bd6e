//! Backend endpoint configuration

use std::time::Duration;

/// Configuration for one backend origin
///
/// All protocol operations target a single fixed origin over HTTPS.
///
/// # Example
///
/// ```
/// use avenue_rs::BackendConfig;
///
/// // Recommended: use the constructor methods
/// let config = BackendConfig::new("https://backend.example.com");
///
/// // Or opt in to a request timeout
/// let config = BackendConfig::with_timeout(
///     "https://backend.example.com",
///     std::time::Duration::from_secs(30),
/// );
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend origin without a trailing slash (e.g., "https://backend.example.com")
    pub origin: String,

    /// Per-request timeout
    ///
    /// `None` means requests never time out; a hung call is only released
    /// by dropping its future.
    pub timeout: Option<Duration>,
}

impl BackendConfig {
    /// Create a configuration for the given origin with no request timeout
    ///
    /// Trailing slashes on the origin are stripped so endpoint paths can
    /// be appended verbatim.
    pub fn new(origin: impl Into<String>) -> Self {
        let mut origin = origin.into();
        while origin.ends_with('/') {
            origin.pop();
        }
        Self {
            origin,
            timeout: None,
        }
    }

    /// Create a configuration with a per-request timeout
    pub fn with_timeout(origin: impl Into<String>, timeout: Duration) -> Self {
        let mut config = Self::new(origin);
        config.timeout = Some(timeout);
        config
    }

    /// Absolute URL for an endpoint path (path must start with '/')
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let config = BackendConfig::new("https://backend.example.com");
        assert_eq!(config.origin, "https://backend.example.com");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = BackendConfig::new("https://backend.example.com/");
        assert_eq!(config.origin, "https://backend.example.com");
        assert_eq!(
            config.url("/check-session/"),
            "https://backend.example.com/check-session/"
        );
    }

    #[test]
    fn test_with_timeout() {
        let config =
            BackendConfig::with_timeout("https://backend.example.com", Duration::from_secs(30));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_url_join() {
        let config = BackendConfig::new("http://127.0.0.1:8000");
        assert_eq!(
            config.url("/insert-draft-article/"),
            "http://127.0.0.1:8000/insert-draft-article/"
        );
    }
}
