//! gymgate gateway binary.
//!
//! - Config: `$GYMGATE_CONFIG` or `gymgate.yaml` (strict parsing + validate)
//! - Every request passes the gate middleware before routing
//! - Ctrl-C flips readiness to draining, then shuts down gracefully

use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};

use gymgate_core::error::{GateError, Result};
use gymgate_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "gymgate-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::var("GYMGATE_CONFIG").unwrap_or_else(|_| "gymgate.yaml".into());
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg
        .gateway
        .listen
        .parse()
        .map_err(|e| GateError::Config(format!("gateway.listen: {e}")))?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state.clone());

    tracing::info!(%listen, config = %path, "gymgate-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| GateError::Internal(format!("bind {listen}: {e}")))?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested; draining");
            state.begin_drain();
        })
        .await
        .map_err(|e| GateError::Internal(format!("server failed: {e}")))
}
