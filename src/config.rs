//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; nothing here is refreshed at runtime.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID hosting the Firestore database
    pub gcp_project_id: String,
    /// Application instance ID — all collections live under this scope so
    /// multiple deployments sharing a project do not collide
    pub app_instance_id: String,
    /// Firebase Web API key (public) for the identity-toolkit REST endpoints
    pub firebase_api_key: String,
    /// Optional pre-issued custom token used to bootstrap sign-in
    pub bootstrap_token: Option<String>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            app_instance_id: "test-campus".to_string(),
            firebase_api_key: "test_api_key".to_string(),
            bootstrap_token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            app_instance_id: env::var("APP_INSTANCE_ID")
                .unwrap_or_else(|_| "default-campus".to_string()),
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            bootstrap_token: env::var("BOOTSTRAP_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: env mutations would race across parallel tests.
    #[test]
    fn test_config_from_env() {
        env::set_var("FIREBASE_API_KEY", "test_key");
        env::set_var("APP_INSTANCE_ID", "campus-42");
        env::remove_var("BOOTSTRAP_TOKEN");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.firebase_api_key, "test_key");
        assert_eq!(config.app_instance_id, "campus-42");
        assert!(config.bootstrap_token.is_none());

        // A blank bootstrap token is treated as absent.
        env::set_var("BOOTSTRAP_TOKEN", "   ");
        let config = Config::from_env().expect("Config should load");
        assert!(config.bootstrap_token.is_none());
    }
}
