//! Auth service settings from environment variables.

use crate::errors::{Error, Result};

/// Endpoint and public key of the hosted auth service
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Base URL of the backend project, e.g. `https://xyz.example.co`
    pub base_url: String,
    /// Anonymous (public) API key sent with every auth request
    pub anon_key: String,
}

impl AuthSettings {
    /// Reads `BACKEND_URL` and `BACKEND_ANON_KEY`. Both are required.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("BACKEND_URL")
            .inspect_err(|e| tracing::error!("BACKEND_URL not found: {e}"))?;
        let anon_key = std::env::var("BACKEND_ANON_KEY")
            .inspect_err(|e| tracing::error!("BACKEND_ANON_KEY not found: {e}"))?;
        Self::new(base_url, anon_key)
    }

    /// Builds settings from explicit values, rejecting blanks.
    pub fn new(base_url: String, anon_key: String) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() || anon_key.trim().is_empty() {
            return Err(Error::Config {
                message: "BACKEND_URL and BACKEND_ANON_KEY must not be empty".to_string(),
            });
        }
        Ok(Self { base_url, anon_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let settings = AuthSettings::new("https://backend.example/ ".to_string(), "key".to_string());
        assert!(matches!(settings, Ok(ref s) if s.base_url == "https://backend.example"));
    }

    #[test]
    fn test_new_rejects_blank_values() {
        assert!(AuthSettings::new(String::new(), "key".to_string()).is_err());
        assert!(AuthSettings::new("https://backend.example".to_string(), "  ".to_string()).is_err());
    }
}
