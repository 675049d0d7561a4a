use crate::executor::{Executor, ExecutorConfig, SimulatedExecutor};
use crate::session::Session;
use crate::transport::{MockTransport, TransportConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

const DEFAULT_PORT: u16 = 3001;

/// Where the HTTP server listens
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind = match std::env::var("CODETRIBE_BIND") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid CODETRIBE_BIND={:?}", raw);
                defaults.bind
            }),
            Err(_) => defaults.bind,
        };

        let port = match std::env::var("CODETRIBE_PORT") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid CODETRIBE_PORT={:?}", raw);
                defaults.port
            }),
            Err(_) => defaults.port,
        };

        Self { bind, port }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Shared by every connection. Holds no session data: each socket gets
/// its own store and transport.
pub struct AppState {
    pub executor: Arc<dyn Executor>,
    pub transport_config: TransportConfig,
}

impl AppState {
    pub fn new(executor: Arc<dyn Executor>, transport_config: TransportConfig) -> Self {
        Self {
            executor,
            transport_config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            Arc::new(SimulatedExecutor::new(ExecutorConfig::from_env())),
            TransportConfig::from_env(),
        )
    }

    /// Fresh session for one connection
    pub fn new_session(&self) -> Session {
        Session::new(
            MockTransport::new(self.transport_config.clone()),
            self.executor.clone(),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(SimulatedExecutor::default()),
            TransportConfig::default(),
        )
    }
}
