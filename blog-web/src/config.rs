//! Client-wide settings.
//!
//! Currently this is just the location of the remote API, resolved at
//! compile time with a local-development fallback.

/// Where the client sends its API requests
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Base URL of the remote API, including the `/api` prefix
    pub api_base_url: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("BLOG_API_URL")
                .unwrap_or("http://localhost:5000/api")
                .to_string(),
        }
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the API base URL
    #[must_use]
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontend_config_default() {
        let config = FrontendConfig::default();
        assert!(!config.api_base_url.is_empty());
        assert!(config.api_base_url.starts_with("http"));
    }

    #[test]
    fn test_frontend_config_clone() {
        let config1 = FrontendConfig::new();
        let config2 = config1.clone();
        assert_eq!(config1.api_base_url(), config2.api_base_url());
    }
}
