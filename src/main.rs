// SPDX-License-Identifier: AGPL-3.0-or-later

use std::{env, net::SocketAddr};

use enclave_ca_server::api::router;
use enclave_ca_server::config::{
    DATA_DIR_ENV, DEFAULT_DATA_DIR, DEFAULT_GATEWAY_DOMAIN, GATEWAY_DOMAIN_ENV, HOST_ENV,
    LOG_FORMAT_ENV, PORT_ENV,
};
use enclave_ca_server::gateway::EnclaveGateway;
use enclave_ca_server::state::AppState;
use enclave_ca_server::storage::{ArtifactStore, CaPaths, CaRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    // Composition root: every store and client is constructed here and
    // handed to the router through AppState.
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let paths = CaPaths::new(&data_dir);
    let registry = CaRegistry::open(&paths.registry_db()).expect("Failed to open CA registry");
    let artifacts =
        ArtifactStore::open(paths.enclaves_dir()).expect("Failed to open artifact store");

    let gateway_domain =
        env::var(GATEWAY_DOMAIN_ENV).unwrap_or_else(|_| DEFAULT_GATEWAY_DOMAIN.to_string());
    let state = AppState::new(registry, artifacts, EnclaveGateway::new(gateway_domain));
    let app = router(state);

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    tracing::info!(%data_dir, "Enclave CA server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let json = env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
