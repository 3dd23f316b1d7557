use crate::config::settings::{AppConfig, ConfigValidationError};
use config::{Config, ConfigError, Environment, File, FileFormat};
use std::env;
use std::path::Path;

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Validation error: {0}")]
    Validation(#[from] ConfigValidationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppConfig {
    /// Load configuration from layered sources with priority:
    /// 1. `APP__`-prefixed environment variables (highest)
    /// 2. `config/local.yaml` developer overrides
    /// 3. `config/{environment}.yaml`
    /// 4. `config/default.yaml`
    /// 5. Built-in defaults (lowest)
    pub fn load() -> Result<Self, ConfigLoadError> {
        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let mut builder = Config::builder();

        builder = builder.add_source(config::File::from_str(
            Self::default_config_template(),
            FileFormat::Yaml,
        ));

        if Path::new("config/default.yaml").exists() {
            builder = builder.add_source(File::with_name("config/default"));
        }

        let env_config_path = format!("config/{}", environment);
        if Path::new(&format!("{}.yaml", env_config_path)).exists() {
            builder = builder.add_source(File::with_name(&env_config_path));
        }

        if Path::new("config/local.yaml").exists() {
            builder = builder.add_source(File::with_name("config/local").required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.environment = environment;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Built-in defaults, overridable by every other source
    fn default_config_template() -> &'static str {
        r#"
server:
  host: "0.0.0.0"
  port: 8080
  timeout_seconds: 30

database:
  url: "postgresql://localhost/club"
  max_connections: 10
  min_connections: 1
  acquire_timeout_seconds: 30
  idle_timeout_seconds: 600

logging:
  level: "info"
  format: "json"
  include_location: false
  target: "stdout"

sentry:
  dsn: ""
  environment: "development"
  traces_sample_rate: 0.1

auth:
  secret: "development-secret"
  algorithms: ["HS256", "HS512"]
  leeway_seconds: 30
  subject_claim: "sub"
  role_claim: "role"
"#
    }
}
