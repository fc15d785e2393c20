//! `tollgate run`: start the proxy server.
//!
//! Resolves configuration from an optional file plus flag and environment
//! overrides, then serves the Axum router until SIGTERM or Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::RunArgs;
use crate::config;
use crate::error::TollgateError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), TollgateError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let (config, source) =
        config::resolve(args.config.as_deref(), args.overrides.to_overrides()).await?;

    let state = Arc::new(AppState::new(config, source)?);
    let backend = state.backend.base().to_string();
    let timeout_ms = state.config.backend.timeout;
    let provider = state.sessions.name();
    let config_source = state.config_source.clone();

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        backend = %backend,
        timeout_ms,
        session_provider = provider,
        config_source = %config_source,
        "tollgate started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("tollgate stopped");
    Ok(())
}
