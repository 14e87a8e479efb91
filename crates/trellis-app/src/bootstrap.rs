use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info, warn};
use trellis_api::{ApiDependencies, ApiServer};
use trellis_config::{AppConfig, ConfigError, load_dotenv};
use trellis_identity::{ClerkClient, IdentityProvider};
use trellis_mail::MailService;
use trellis_telemetry::{
    GlobalContextGuard, LogFormat, LoggingConfig, Metrics, TelemetryError, build_sha,
};

use crate::error::{AppError, AppResult};

/// Dependencies required to serve the Trellis API.
pub(crate) struct BootstrapDependencies {
    config: AppConfig,
    identity: Arc<dyn IdentityProvider>,
    mail: Option<MailService>,
    metrics: Metrics,
}

impl BootstrapDependencies {
    /// Construct production collaborators for an already loaded configuration.
    pub(crate) fn from_config(config: AppConfig) -> AppResult<Self> {
        let identity = ClerkClient::new(&config.identity)
            .map_err(|err| AppError::identity("identity.client", err))?;
        let mail = match &config.mail {
            Some(mail) => Some(
                MailService::from_config(mail)
                    .map_err(|err| AppError::mail("mail.from_config", err))?,
            ),
            None => {
                warn!("EMAIL_HOST not set; email delivery disabled");
                None
            }
        };
        let metrics =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;

        Ok(Self {
            config,
            identity: Arc::new(identity),
            mail,
            metrics,
        })
    }
}

/// Entry point for the Trellis boot sequence.
///
/// Loads `.env` and the environment, installs logging, wires the identity,
/// mail and metrics collaborators, and serves until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a collaborator cannot be
/// constructed, or the listener fails.
pub async fn run_app() -> AppResult<()> {
    let config =
        load_dotenv().and_then(|dotenv| AppConfig::from_env().map(|config| (dotenv, config)));
    install_logging(config.as_ref().ok().map(|(_, config)| config))?;

    let (dotenv, config) = config.map_err(|err| {
        log_config_error(&err);
        AppError::config("config.from_env", err)
    })?;
    let _context = GlobalContextGuard::new(&config.app_name, config.environment.as_str());
    if let Some(path) = dotenv {
        info!(path = %path.display(), "environment loaded from dotenv file");
    }
    info!("Trellis application bootstrap starting");

    let addr = config.server.socket_addr();
    let dependencies = BootstrapDependencies::from_config(config)?;
    let result = Box::pin(run_app_with(dependencies, addr, shutdown_signal())).await;
    if let Err(err) = &result {
        error!(operation = err.operation(), error = %err, "application terminated with error");
    }
    result
}

/// Serve the API on `addr` with injected dependencies until `shutdown` resolves.
pub(crate) async fn run_app_with<F>(
    dependencies: BootstrapDependencies,
    addr: SocketAddr,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let BootstrapDependencies {
        config,
        identity,
        mail,
        metrics,
    } = dependencies;

    let api = ApiServer::new(
        &config,
        ApiDependencies {
            identity,
            mail,
            metrics,
        },
    )
    .map_err(|err| AppError::api_server("api_server.new", err))?;

    info!(addr = %addr, environment = config.environment.as_str(), "Launching API listener");
    api.serve(addr, shutdown)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn install_logging(config: Option<&AppConfig>) -> AppResult<()> {
    let (logging, rejected_format) = logging_config(config);
    trellis_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    if let Some(err) = rejected_format {
        error!(error = %err, "LOG_FORMAT is invalid");
        return Err(AppError::telemetry("telemetry.log_format", err));
    }
    Ok(())
}

/// Logging settings for `config`, falling back to defaults so that boot
/// failures can still be logged. An unusable `LOG_FORMAT` is handed back.
fn logging_config(config: Option<&AppConfig>) -> (LoggingConfig<'_>, Option<TelemetryError>) {
    let Some(config) = config else {
        return (LoggingConfig::default(), None);
    };
    match LogFormat::from_setting(config.logging.format.as_deref()) {
        Ok(format) => (
            LoggingConfig {
                level: &config.logging.level,
                format,
                build_sha: option_env!("TRELLIS_BUILD_SHA").unwrap_or_else(build_sha),
            },
            None,
        ),
        Err(err) => (LoggingConfig::default(), Some(err)),
    }
}

fn log_config_error(err: &ConfigError) {
    match err {
        ConfigError::MissingVar { name } => {
            error!(variable = name, "required environment variable is missing");
        }
        ConfigError::InvalidVar { name, reason, .. } => {
            error!(variable = name, reason = reason, "environment variable is invalid");
        }
        ConfigError::Dotenv { path, source } => {
            error!(path = %path.display(), error = %source, "dotenv file could not be parsed");
        }
    }
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received; draining connections");
}
