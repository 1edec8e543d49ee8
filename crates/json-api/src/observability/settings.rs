//! Request tracing settings shared by the middleware.

use std::{sync::OnceLock, time::Duration};

use crate::config::ServerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RequestTracing {
    pub(super) slow_request_threshold: Duration,
    pub(super) record_metrics: bool,
}

impl Default for RequestTracing {
    fn default() -> Self {
        Self {
            slow_request_threshold: Duration::from_secs(1),
            record_metrics: true,
        }
    }
}

impl From<&ServerConfig> for RequestTracing {
    fn from(config: &ServerConfig) -> Self {
        Self {
            slow_request_threshold: Duration::from_millis(
                config.observability.slow_request_threshold_ms,
            ),
            record_metrics: config.observability.metrics_enabled,
        }
    }
}

static REQUEST_TRACING: OnceLock<RequestTracing> = OnceLock::new();

/// First call wins; later calls are ignored.
pub(super) fn apply_runtime_config(config: &ServerConfig) {
    _ = REQUEST_TRACING.set(RequestTracing::from(config));
}

pub(super) fn request_tracing() -> RequestTracing {
    REQUEST_TRACING.get().copied().unwrap_or_default()
}
