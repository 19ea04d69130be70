// [apps/windi-gateway/src/lib.rs]
/*!
 * =================================================================
 * APARATO: WINDI GOVERNANCE CORE GATEWAY
 * CLASIFICACIÓN: APPLICATION SHELL
 * RESPONSABILIDAD: COMPOSICIÓN DEL ESTADO, ENRUTAMIENTO HTTP, IGNICIÓN
 *
 * Two HTTP surfaces behind one process: the Bridge ingestion API and
 * the Governance API, each bound to its own port (§6). The Guard's five
 * background loops run alongside both, sharing the same `GatewayState`.
 * =================================================================
 */

pub mod auth;
pub mod bridge_routes;
pub mod config;
pub mod error;
pub mod governance_routes;
pub mod isp_profiles;
pub mod state;
pub mod submissions;

use std::time::Duration;

use axum::http::{header, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use config::GatewayConfig;
use state::GatewayState;

fn cors_shield() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

pub fn bridge_router(state: GatewayState) -> Router {
    bridge_routes::router().layer(cors_shield()).with_state(state)
}

pub fn governance_router(state: GatewayState) -> Router {
    governance_routes::router().layer(cors_shield()).with_state(state)
}

/// Assembles state, starts the Guard's background loops, and serves both
/// HTTP surfaces concurrently until either listener fails.
pub async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let state = GatewayState::assemble(&config).await?;
    let guard = state.ignite_guard(&config);
    let _guard_tasks = guard.spawn_all();

    let bridge_app = bridge_router(state.clone());
    let governance_app = governance_router(state);

    let bridge_listener = tokio::net::TcpListener::bind(("0.0.0.0", config.bridge_port)).await?;
    let governance_listener = tokio::net::TcpListener::bind(("0.0.0.0", config.governance_port)).await?;

    info!(port = config.bridge_port, "bridge surface listening");
    info!(port = config.governance_port, "governance surface listening");

    let bridge_server = axum::serve(bridge_listener, bridge_app);
    let governance_server = axum::serve(governance_listener, governance_app);

    tokio::try_join!(bridge_server, governance_server)?;
    Ok(())
}
