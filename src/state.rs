use std::sync::Arc;
use std::time::Duration;

use crate::config::{GatewayConfig, CONNECT_TIMEOUT_SECS};

pub type SharedState = Arc<GatewayState>;

/// Immutable process-wide state: configuration plus one shared HTTP client.
/// Requests never share anything mutable.
pub struct GatewayState {
    pub config: GatewayConfig,
    pub http_client: reqwest::Client,
}

impl GatewayState {
    pub fn new(config: GatewayConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(4)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_GATEWAY_PORT, PAGESPEED_API_BASE, UPSTREAM_TIMEOUT_SECS};

    fn make_test_config() -> GatewayConfig {
        GatewayConfig {
            port: DEFAULT_GATEWAY_PORT,
            api_key: None,
            allow_origins: vec![],
            upstream_base: PAGESPEED_API_BASE.to_string(),
            upstream_timeout_secs: UPSTREAM_TIMEOUT_SECS,
        }
    }

    #[test]
    fn test_state_construction() {
        let state = GatewayState::new(make_test_config());
        assert_eq!(state.config.port, DEFAULT_GATEWAY_PORT);
        assert!(state.config.api_key.is_none());
    }

    #[test]
    fn test_state_keeps_configured_key() {
        let mut config = make_test_config();
        config.api_key = Some("secret".to_string());
        let state = GatewayState::new(config);
        assert_eq!(state.config.api_key.as_deref(), Some("secret"));
    }
}
