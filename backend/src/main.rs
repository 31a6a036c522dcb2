//! Service entry-point: loads settings, connects to the store, serves the
//! API and drains it on SIGINT/SIGTERM.

mod server;

use std::net::SocketAddr;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use payments_api::config::AppSettings;
use payments_api::inbound::http::health::HealthState;
use payments_api::outbound::persistence::connect_with_retry;

use server::{ServerConfig, create_server, run_until_shutdown, shutdown_signal};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr: SocketAddr = settings
        .bind_addr()
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}", settings.bind_addr()))?;

    let pool = connect_with_retry(settings.pool_config(), settings.connect_retry())
        .await
        .wrap_err("could not connect to the database")?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, pool)
        .with_amount_policy(settings.amount_policy())
        .with_conflict_retry(settings.conflict_retry())
        .with_shutdown_timeout(settings.shutdown_timeout());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "payments api listening");

    run_until_shutdown(
        server,
        health_state,
        shutdown_signal(),
        settings.shutdown_timeout(),
    )
    .await
    .wrap_err("shutdown did not complete cleanly")?;

    info!("payments api stopped");
    Ok(())
}
