use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use url::Url;

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid server configuration: {0}")]
    Server(String),
    #[error("Invalid database configuration: {0}")]
    Database(String),
    #[error("Invalid logging configuration: {0}")]
    Logging(String),
    #[error("Invalid Sentry configuration: {0}")]
    Sentry(String),
    #[error("Invalid auth configuration: {0}")]
    Auth(String),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub sentry: SentryConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub environment: String,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logging.validate()?;
        self.sentry.validate()?;
        self.auth.validate()?;
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development" || self.environment == "dev"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production" || self.environment == "prod"
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout_seconds: u64,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.host.is_empty() {
            return Err(ConfigValidationError::Server("Host cannot be empty".to_string()));
        }

        if self.host != "localhost" && IpAddr::from_str(&self.host).is_err() {
            // Hostname, not an IP. Reject obviously broken values.
            if self.host.contains(' ') || self.host.contains('\t') {
                return Err(ConfigValidationError::Server("Invalid host format".to_string()));
            }
        }

        if self.port == 0 {
            return Err(ConfigValidationError::Server("Port cannot be 0".to_string()));
        }

        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError::Server(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        let ip = if self.host == "localhost" {
            IpAddr::from_str("127.0.0.1").map_err(|e| ConfigValidationError::Server(e.to_string()))?
        } else {
            IpAddr::from_str(&self.host)
                .map_err(|_| ConfigValidationError::Server(format!("Invalid IP address: {}", self.host)))?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.url.is_empty() {
            return Err(ConfigValidationError::Database(
                "Database URL cannot be empty".to_string(),
            ));
        }

        Url::parse(&self.url)
            .map_err(|e| ConfigValidationError::Database(format!("Invalid database URL: {}", e)))?;

        if self.max_connections == 0 {
            return Err(ConfigValidationError::Database(
                "Max connections must be greater than 0".to_string(),
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigValidationError::Database(
                "Min connections cannot be greater than max connections".to_string(),
            ));
        }

        if self.acquire_timeout_seconds == 0 || self.idle_timeout_seconds == 0 {
            return Err(ConfigValidationError::Database(
                "Timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub include_location: bool,
    #[serde(default = "default_log_target")]
    pub target: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigValidationError::Logging(format!(
                "Invalid log level '{}'. Valid levels: {}",
                self.level,
                valid_levels.join(", ")
            )));
        }

        let valid_formats = ["json", "pretty", "compact"];
        if !valid_formats.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigValidationError::Logging(format!(
                "Invalid log format '{}'. Valid formats: {}",
                self.format,
                valid_formats.join(", ")
            )));
        }

        let valid_targets = ["stdout", "stderr", "file"];
        if !valid_targets.contains(&self.target.to_lowercase().as_str()) {
            return Err(ConfigValidationError::Logging(format!(
                "Invalid log target '{}'. Valid targets: {}",
                self.target,
                valid_targets.join(", ")
            )));
        }

        if self.target.to_lowercase() == "file" && self.file_path.is_none() {
            return Err(ConfigValidationError::Logging(
                "File path must be provided when target is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_log_target() -> String {
    "stdout".to_string()
}

/// Sentry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentryConfig {
    pub dsn: String,
    pub environment: String,
    pub traces_sample_rate: f32,
    #[serde(default)]
    pub debug: bool,
}

impl SentryConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // Empty DSN disables Sentry
        if !self.dsn.is_empty()
            && !self.dsn.starts_with("https://")
            && !self.dsn.starts_with("http://")
        {
            return Err(ConfigValidationError::Sentry(
                "DSN must be a valid URL starting with http:// or https://".to_string(),
            ));
        }

        if self.environment.is_empty() {
            return Err(ConfigValidationError::Sentry("Environment cannot be empty".to_string()));
        }

        if self.traces_sample_rate < 0.0 || self.traces_sample_rate > 1.0 {
            return Err(ConfigValidationError::Sentry(
                "Traces sample rate must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        !self.dsn.is_empty()
    }
}

/// Token verification configuration.
///
/// The token issuer is a separate identity service that evolves
/// independently, so the algorithm allow-list and the claim names used to
/// extract subject and role are configurable rather than hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared symmetric signing secret
    pub secret: String,
    /// Allow-listed symmetric algorithms (HS256, HS384, HS512)
    pub algorithms: Vec<String>,
    /// Clock-skew tolerance when checking expiry, in seconds
    #[serde(default = "default_leeway_seconds")]
    pub leeway_seconds: u64,
    /// Claim holding the subject identifier
    #[serde(default = "default_subject_claim")]
    pub subject_claim: String,
    /// Claim holding the caller role
    #[serde(default = "default_role_claim")]
    pub role_claim: String,
}

const ALLOWED_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.secret.is_empty() {
            return Err(ConfigValidationError::Auth(
                "Signing secret cannot be empty".to_string(),
            ));
        }

        if self.algorithms.is_empty() {
            return Err(ConfigValidationError::Auth(
                "At least one algorithm must be allow-listed".to_string(),
            ));
        }

        for algorithm in &self.algorithms {
            if !ALLOWED_ALGORITHMS.contains(&algorithm.as_str()) {
                return Err(ConfigValidationError::Auth(format!(
                    "Unsupported algorithm '{}'. Supported: {}",
                    algorithm,
                    ALLOWED_ALGORITHMS.join(", ")
                )));
            }
        }

        if self.subject_claim.is_empty() || self.role_claim.is_empty() {
            return Err(ConfigValidationError::Auth(
                "Claim names cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Allow-listed algorithms parsed for the JWT library.
    ///
    /// Unparseable names are dropped here; `validate()` has already
    /// rejected anything outside the supported set.
    pub fn parsed_algorithms(&self) -> Vec<Algorithm> {
        self.algorithms
            .iter()
            .filter_map(|name| Algorithm::from_str(name).ok())
            .collect()
    }
}

fn default_leeway_seconds() -> u64 {
    30
}

fn default_subject_claim() -> String {
    "sub".to_string()
}

fn default_role_claim() -> String {
    "role".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/club".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: 600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            include_location: false,
            target: default_log_target(),
            file_path: None,
        }
    }
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: "".to_string(),
            environment: "development".to_string(),
            traces_sample_rate: 0.1,
            debug: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret".to_string(),
            algorithms: vec!["HS256".to_string(), "HS512".to_string()],
            leeway_seconds: default_leeway_seconds(),
            subject_claim: default_subject_claim(),
            role_claim: default_role_claim(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            sentry: SentryConfig::default(),
            auth: AuthConfig::default(),
            environment: "development".to_string(),
        }
    }
}
