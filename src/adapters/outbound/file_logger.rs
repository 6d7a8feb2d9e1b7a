use crate::domains::logger::{DomainLogger, FileLogger};
use std::sync::Arc;

/// Install fast_log on `path` and hand back the logger the service injects.
/// Only one process-wide `log` backend can exist, so a second call fails.
pub fn init_file_logger(path: &str) -> Result<Arc<dyn DomainLogger>, String> {
    FileLogger::init(path).map_err(|e| format!("cannot open log file {}: {}", path, e))?;
    Ok(Arc::new(FileLogger))
}
