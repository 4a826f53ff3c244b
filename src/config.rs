//! Configuration management for the Search Console MCP Server.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Webmasters v3 REST endpoint used by the Search Console API.
const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/webmasters/v3";

/// Read-only Search Console scope.
const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/webmasters.readonly";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Path to the service account key file (JSON)
    pub credentials_path: Option<PathBuf>,

    /// Search Console property, e.g. "https://example.com/" or "sc-domain:example.com"
    pub site_url: Option<String>,

    /// Enable debug mode for MCP message logging
    #[serde(default)]
    pub debug: bool,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Buffer before token expiration to refresh (seconds)
    #[serde(default = "default_token_buffer")]
    pub token_refresh_buffer_seconds: u64,

    /// Base URL of the Search Console REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// OAuth2 scope requested for the service account.
    /// Sitemap submission and deletion need the non-readonly scope.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Optional override for the bundled dimension catalog
    pub dimensions_file: Option<PathBuf>,

    /// Optional override for the bundled metric catalog
    pub metrics_file: Option<PathBuf>,
}

fn default_timeout() -> u64 {
    30
}

fn default_token_buffer() -> u64 {
    60
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials_path: None,
            site_url: None,
            debug: false,
            timeout_seconds: default_timeout(),
            token_refresh_buffer_seconds: default_token_buffer(),
            api_base_url: default_api_base_url(),
            scope: default_scope(),
            dimensions_file: None,
            metrics_file: None,
        }
    }
}

/// Values supplied on the command line or through the environment.
/// They take precedence over the configuration file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub credentials_path: Option<PathBuf>,
    pub site_url: Option<String>,
    pub debug: bool,
}

impl Config {
    /// Load configuration from an optional file, apply overrides and validate.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file without validating it.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(credentials_path) = overrides.credentials_path {
            self.credentials_path = Some(credentials_path);
        }
        if let Some(site_url) = overrides.site_url {
            self.site_url = Some(site_url);
        }
        self.debug |= overrides.debug;
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        let credentials_path = match &self.credentials_path {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => {
                return Err(ConfigError::MissingField(
                    "credentials_path (or GOOGLE_APPLICATION_CREDENTIALS)".into(),
                ))
            }
        };
        if !credentials_path.exists() {
            return Err(ConfigError::Invalid(format!(
                "Credentials file not found: {}",
                credentials_path.display()
            )));
        }

        let site_url = match &self.site_url {
            Some(s) if !s.is_empty() => s,
            _ => return Err(ConfigError::MissingField("site_url (or GSC_SITE_URL)".into())),
        };
        let valid_prefixes = ["https://", "http://", "sc-domain:"];
        if !valid_prefixes.iter().any(|p| site_url.starts_with(p)) {
            return Err(ConfigError::Invalid(format!(
                "Invalid site_url '{}'. Expected one of the prefixes: {:?}",
                site_url, valid_prefixes
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "timeout_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// The configured Search Console property.
    /// Empty only if the config was never validated.
    pub fn site_url(&self) -> &str {
        self.site_url.as_deref().unwrap_or_default()
    }

    /// Get timeout as Duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }

    /// Get token refresh buffer as chrono Duration.
    pub fn token_buffer(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_refresh_buffer_seconds as i64)
    }
}
