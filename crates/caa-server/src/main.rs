//! Binary entrypoint for the studio HTTP server.
//!
//! Configuration comes from the environment (see [`ServerConfig`]); logging
//! honours `RUST_LOG` and defaults to `info`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use caa_server::config::ServerConfig;
use caa_server::router::build_router;
use caa_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().expect("Invalid server configuration");
    let state = AppState::new(&config).expect("Failed to initialize application state");

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(db = %config.db_path, "studio server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
