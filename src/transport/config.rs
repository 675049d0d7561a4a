use std::time::Duration;

const MIN_DELAY_MS: u64 = 50;
const MAX_DELAY_MS: u64 = 500;

/// Simulated round-trip latency per echoed event
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub join_delay: Duration,
    pub code_delay: Duration,
    pub chat_delay: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            join_delay: Duration::from_millis(500),
            code_delay: Duration::from_millis(50),
            chat_delay: Duration::from_millis(100),
        }
    }
}

impl TransportConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            join_delay: delay_from_env("TRANSPORT_JOIN_DELAY_MS", defaults.join_delay),
            code_delay: delay_from_env("TRANSPORT_CODE_DELAY_MS", defaults.code_delay),
            chat_delay: delay_from_env("TRANSPORT_CHAT_DELAY_MS", defaults.chat_delay),
        };

        tracing::info!(
            join_ms = config.join_delay.as_millis() as u64,
            code_ms = config.code_delay.as_millis() as u64,
            chat_ms = config.chat_delay.as_millis() as u64,
            "Transport config loaded"
        );

        config
    }
}

/// Read a delay in milliseconds, clamped into the simulated latency window
fn delay_from_env(key: &str, default: Duration) -> Duration {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS)),
            Err(_) => {
                tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}
