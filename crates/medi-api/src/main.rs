//! # MediSnap
//!
//! Marketplace API server for an online medicine store.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export ACCESS_TOKEN_SECRET=...
//! export MONGODB_URI=mongodb+srv://...
//! export STRIPE_SECRET_KEY=sk_test_...
//!
//! # Run the server
//! medisnap
//! ```

use medi_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    print_banner();

    let state = AppState::from_env().await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Storage backend: {}", state.store.backend_name());
    info!("Payment provider: {}", state.payments.provider_name());

    let store = state.store.clone();
    let app = routes::create_router(state);

    info!("MediSnap starting on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Token: POST http://{}/jwt", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server stopped");

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

fn print_banner() {
    println!(
        r#"
  MediSnap
  ━━━━━━━━━━━━━━━━━━━━━━━
  Medicine marketplace API
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
