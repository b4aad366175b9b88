//! Runtime settings and the server configuration built from them.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use shareit::outbound::persistence::{DbPool, PoolConfig};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const POOL_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings loaded from CLI flags, `SHAREIT_*` variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHAREIT")]
pub struct ShareitSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections the pool keeps open.
    pub pool_min_idle: Option<u32>,
    /// Human-readable logs instead of JSON.
    #[ortho_config(default = false)]
    pub pretty_logs: bool,
}

/// Errors raised while turning settings into a bind address.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid host {host:?}: {source}")]
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
}

impl ShareitSettings {
    /// Configured host, or `0.0.0.0`.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured port, or 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Configured pool size, or 10.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|source| SettingsError::InvalidHost {
            host: host.to_owned(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port()))
    }

    /// Pool configuration when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_ref().map(|url| {
            let defaults = PoolConfig::new(url.clone());
            let min_idle = self
                .pool_min_idle
                .map_or(defaults.min_idle(), |idle| Some(idle.min(self.pool_max_size())));
            defaults
                .with_max_size(self.pool_max_size())
                .with_min_idle(min_idle)
                .with_connection_timeout(POOL_CHECKOUT_TIMEOUT)
        })
    }
}

/// Store backing the driven ports.
#[derive(Clone)]
pub enum StoreBackend {
    /// Process-local maps; state is lost on restart.
    InMemory,
    /// PostgreSQL through Diesel.
    Postgres(DbPool),
}

/// Everything [`super::create_server`] needs.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: StoreBackend,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Bind to `bind_addr` with the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            store: StoreBackend::InMemory,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Use PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.store = StoreBackend::Postgres(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
