//! Core log service logic, independent of any transport
//!
//! - [`LogService`]: validate and append records, count ERROR ingests
//! - [`QueryEngine`]: filtered, most-recent-first retrieval
//! - [`AlertEvaluator`]: trailing-window error-rate check
//!
//! None of these hold state beyond their injected collaborators; isolation
//! between concurrent requests is delegated to the store.

pub mod alerts;
pub mod logs;
pub mod query;

pub use alerts::{AlertEvaluator, AlertRequest};
pub use logs::LogService;
pub use query::{ListRequest, QueryEngine};

use crate::clock::Clock;
use crate::config::Config;
use crate::error::ServiceError;
use crate::metrics::ErrorCounter;
use crate::store::LogStore;
use std::sync::Arc;

/// The three services wired to one store, clock and error counter
#[derive(Clone)]
pub struct Services {
    pub logs: Arc<LogService>,
    pub query: Arc<QueryEngine>,
    pub alerts: Arc<AlertEvaluator>,
}

impl Services {
    pub fn new(
        store: Arc<dyn LogStore>,
        clock: Arc<dyn Clock>,
        error_counter: Arc<ErrorCounter>,
        config: &Config,
    ) -> Self {
        let deadline = config.database.operation_timeout();

        Self {
            logs: Arc::new(
                LogService::new(store.clone(), clock.clone(), error_counter).with_deadline(deadline),
            ),
            query: Arc::new(
                QueryEngine::new(store.clone(), config.query.clone()).with_deadline(deadline),
            ),
            alerts: Arc::new(
                AlertEvaluator::new(store, clock, config.alerts.clone()).with_deadline(deadline),
            ),
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
