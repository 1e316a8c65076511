pub mod alerts;
pub mod health;
pub mod logs;
pub mod metrics_handler;

use crate::service::Services;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared state for every route
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub metrics: Arc<PrometheusHandle>,
}
