//! Backend entry-point: wires the REST endpoints and OpenAPI docs.

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use skillswap_backend::inbound::http::health::HealthState;
use skillswap_backend::server::{create_server, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
