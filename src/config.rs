//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use secrecy::SecretString;

/// Cookie holding the locally persisted session (`{v, username, email}`).
pub const SESSION_COOKIE: &str = "qa-dashboard-user";

/// Content type holding the user registration ledger.
pub const USER_CONTENT_TYPE: &str = "users";

/// Default values used when a variable is unset.
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 3000;
    pub const CMS_ENVIRONMENT: &str = "production";
    pub const CMS_REGION: &str = "us";
    pub const CMS_CONTENT_TYPE: &str = "entry";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Contentstack hosting region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Us,
    Eu,
    AzureNa,
    AzureEu,
}

impl Region {
    /// Parse a region code (`us`, `eu`, `azure-na`, `azure-eu`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "us" | "na" => Some(Self::Us),
            "eu" => Some(Self::Eu),
            "azure-na" | "azure_na" => Some(Self::AzureNa),
            "azure-eu" | "azure_eu" => Some(Self::AzureEu),
            _ => None,
        }
    }

    /// Content Delivery API base URL (reads).
    pub fn delivery_base_url(&self) -> &'static str {
        match self {
            Self::Us => "https://cdn.contentstack.io",
            Self::Eu => "https://eu-cdn.contentstack.com",
            Self::AzureNa => "https://azure-na-cdn.contentstack.com",
            Self::AzureEu => "https://azure-eu-cdn.contentstack.com",
        }
    }

    /// Content Management API base URL (writes).
    pub fn management_base_url(&self) -> &'static str {
        match self {
            Self::Us => "https://api.contentstack.io",
            Self::Eu => "https://eu-api.contentstack.com",
            Self::AzureNa => "https://azure-na-api.contentstack.com",
            Self::AzureEu => "https://azure-eu-api.contentstack.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
            Self::AzureNa => "azure-na",
            Self::AzureEu => "azure-eu",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contentstack connection settings.
///
/// Credentials are optional here: their absence is reported when a call
/// needs them, never at startup.
#[derive(Debug, Clone)]
pub struct CmsSettings {
    /// Stack API key
    pub api_key: Option<String>,
    /// Read-only delivery token
    pub delivery_token: Option<SecretString>,
    /// Management token for create/publish/update/unpublish/delete
    pub management_token: Option<SecretString>,
    /// Publishing environment name
    pub environment: String,
    /// Hosting region
    pub region: Region,
    /// Content type holding test-run entries
    pub content_type: String,
    /// Delivery base URL override
    pub delivery_url: Option<String>,
    /// Management base URL override
    pub management_url: Option<String>,
}

impl CmsSettings {
    /// Settings with no credentials and default region/environment.
    pub fn unconfigured() -> Self {
        Self {
            api_key: None,
            delivery_token: None,
            management_token: None,
            environment: defaults::CMS_ENVIRONMENT.to_string(),
            region: Region::Us,
            content_type: defaults::CMS_CONTENT_TYPE.to_string(),
            delivery_url: None,
            management_url: None,
        }
    }

    /// Whether both read credentials (API key and delivery token) are present.
    pub fn has_delivery_credentials(&self) -> bool {
        self.api_key.is_some() && self.delivery_token.is_some()
    }

    /// Whether the management token needed for writes is present.
    pub fn has_management_credentials(&self) -> bool {
        self.api_key.is_some() && self.management_token.is_some()
    }

    /// Effective delivery base URL, without trailing slash.
    pub fn delivery_base_url(&self) -> String {
        self.delivery_url
            .as_deref()
            .unwrap_or(self.region.delivery_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Effective management base URL, without trailing slash.
    pub fn management_base_url(&self) -> String {
        self.management_url
            .as_deref()
            .unwrap_or(self.region.management_base_url())
            .trim_end_matches('/')
            .to_string()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Directory for static assets served at `/assets`
    pub static_dir: Option<PathBuf>,
    /// Contentstack settings
    pub cms: CmsSettings,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `QAD_HOST`: Server host (default: 127.0.0.1)
    /// - `QAD_PORT`: Server port (default: 3000)
    /// - `QAD_STATIC_DIR`: Static assets directory
    /// - `CONTENTSTACK_API_KEY`: Stack API key
    /// - `CONTENTSTACK_DELIVERY_TOKEN`: Delivery token
    /// - `CONTENTSTACK_MANAGEMENT_TOKEN`: Management token
    /// - `CONTENTSTACK_ENVIRONMENT`: Publishing environment (default: production)
    /// - `CONTENTSTACK_REGION`: us, eu, azure-na or azure-eu (default: us)
    /// - `CONTENTSTACK_CONTENT_TYPE`: Test-run content type (default: entry)
    /// - `CONTENTSTACK_DELIVERY_URL` / `CONTENTSTACK_MANAGEMENT_URL`: base URL overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// or `None` when it is unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let env_str = lookup("RUST_ENV").ok_or(ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let host = lookup("QAD_HOST").unwrap_or_else(|| defaults::HOST.to_string());

        let port = lookup("QAD_PORT")
            .unwrap_or_else(|| defaults::PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("QAD_PORT must be a valid port number"))?;

        let static_dir = lookup("QAD_STATIC_DIR").map(PathBuf::from);

        let region_str =
            lookup("CONTENTSTACK_REGION").unwrap_or_else(|| defaults::CMS_REGION.to_string());
        let region = Region::parse(&region_str).ok_or(ConfigError::InvalidValue(
            "CONTENTSTACK_REGION must be one of us, eu, azure-na, azure-eu",
        ))?;

        let cms = CmsSettings {
            api_key: non_empty("CONTENTSTACK_API_KEY"),
            delivery_token: non_empty("CONTENTSTACK_DELIVERY_TOKEN").map(SecretString::from),
            management_token: non_empty("CONTENTSTACK_MANAGEMENT_TOKEN").map(SecretString::from),
            environment: non_empty("CONTENTSTACK_ENVIRONMENT")
                .unwrap_or_else(|| defaults::CMS_ENVIRONMENT.to_string()),
            region,
            content_type: non_empty("CONTENTSTACK_CONTENT_TYPE")
                .unwrap_or_else(|| defaults::CMS_CONTENT_TYPE.to_string()),
            delivery_url: non_empty("CONTENTSTACK_DELIVERY_URL"),
            management_url: non_empty("CONTENTSTACK_MANAGEMENT_URL"),
        };

        Ok(Config {
            environment,
            host,
            port,
            static_dir,
            cms,
        })
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),
}
