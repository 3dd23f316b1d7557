use crate::config::settings::{AppConfig, LoggingConfig, SentryConfig};
use anyhow::Result;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};
use uuid::Uuid;

/// Correlation ID attached to every request for log attribution
#[derive(Debug, Clone)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Initialize the tracing subscriber from configuration.
///
/// Returns the appender guard when logging to a file; dropping it flushes
/// buffered log lines, so the caller must hold it for the process lifetime.
pub fn init_tracing(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let logging_config = &config.logging;

    // The sentry client must outlive this function; the guard is held
    // for the process lifetime.
    if let Some(sentry_guard) = init_sentry(&config.sentry)? {
        std::mem::forget(sentry_guard);
    }
    let env_filter = create_env_filter(logging_config);

    let guard = match logging_config.target.to_lowercase().as_str() {
        "stderr" => {
            init_with_writer(logging_config, env_filter, io::stderr);
            None
        }
        "file" => Some(init_file_tracing(logging_config, env_filter)?),
        _ => {
            init_with_writer(logging_config, env_filter, io::stdout);
            None
        }
    };

    tracing::info!(
        level = %logging_config.level,
        format = %logging_config.format,
        target = %logging_config.target,
        sentry_enabled = config.sentry.is_enabled(),
        "Tracing initialized"
    );

    Ok(guard)
}

/// Initialize the Sentry SDK when a DSN is configured
fn init_sentry(config: &SentryConfig) -> Result<Option<sentry::ClientInitGuard>> {
    if !config.is_enabled() {
        return Ok(None);
    }

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(config.dsn.parse()?),
        environment: Some(config.environment.clone().into()),
        release: sentry::release_name!(),
        traces_sample_rate: config.traces_sample_rate,
        debug: config.debug,
        ..Default::default()
    });

    sentry::configure_scope(|scope| {
        scope.set_tag("service", "club-api");
        scope.set_tag("version", env!("CARGO_PKG_VERSION"));
    });

    tracing::info!(
        dsn = %mask_dsn(&config.dsn),
        environment = %config.environment,
        "Sentry initialized"
    );

    Ok(Some(guard))
}

/// Mask credentials embedded in the DSN before logging it
fn mask_dsn(dsn: &str) -> String {
    if let Ok(parsed) = dsn.parse::<url::Url>() {
        format!("{}://***@{}", parsed.scheme(), parsed.host_str().unwrap_or("unknown"))
    } else {
        "***".to_string()
    }
}

/// Sentry tracing layer: errors become Sentry events, warn/info/debug
/// become breadcrumbs, trace is ignored. A no-op until a client is bound.
fn create_sentry_layer() -> sentry_tracing::SentryLayer<Registry> {
    sentry_tracing::layer().event_filter(|metadata| match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
        _ => sentry_tracing::EventFilter::Breadcrumb,
    })
}

/// Log-level filter: `RUST_LOG` wins, then the configured level
fn create_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_with_writer<W>(config: &LoggingConfig, env_filter: EnvFilter, writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(FmtSpan::CLOSE);

    match config.format.to_lowercase().as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(create_sentry_layer())
                .with(env_filter)
                .with(layer.pretty())
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(create_sentry_layer())
                .with(env_filter)
                .with(layer.compact())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(create_sentry_layer())
                .with(env_filter)
                .with(layer.json())
                .init();
        }
    }
}

fn init_file_tracing(config: &LoggingConfig, env_filter: EnvFilter) -> Result<WorkerGuard> {
    let file_path = config
        .file_path
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("File path is required when target is 'file'"))?;

    let path = std::path::Path::new(file_path);
    let directory = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid file path: {}", file_path))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid filename: {}", file_path))?;

    std::fs::create_dir_all(directory)?;

    let file_appender = tracing_appender::rolling::daily(directory, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    init_with_writer(config, env_filter, non_blocking);

    Ok(guard)
}
