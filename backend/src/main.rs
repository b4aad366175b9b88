//! ShareIt server entry point.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use shareit::inbound::http::health::HealthState;
use shareit::outbound::persistence::{DbPool, run_pending_migrations};

use server::{ServerConfig, ShareitSettings, create_server};

fn init_tracing(pretty: bool) {
    let builder = fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    let result = if pretty {
        builder.pretty().try_init()
    } else {
        builder.json().try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = ShareitSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    init_tracing(settings.pretty_logs);

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(bind_addr);

    if let Some(pool_config) = settings.pool_config() {
        run_pending_migrations(pool_config.database_url().to_owned())
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(e.into_message()))?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(server::build_metrics()?));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "shareit listening");
    server.await
}
