pub mod alert;
pub mod log;

pub use self::alert::{Alert, AlertResult, AlertsResponse};
pub use self::log::{CreateLogRequest, LogQuery, LogRecord, NewLogRecord, ERROR_LEVEL};
