use crate::adapters::outbound::{init_console_logger, init_file_logger};
use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Tees each diagnostic: the log file gets it first, then the terminal.
pub struct MultiLogger {
    primary: Arc<dyn DomainLogger>,
    secondary: Option<Arc<dyn DomainLogger>>,
}

impl MultiLogger {
    pub fn new(primary: Arc<dyn DomainLogger>, secondary: Option<Arc<dyn DomainLogger>>) -> Self {
        Self { primary, secondary }
    }

    fn each(&self, emit: impl Fn(&dyn DomainLogger)) {
        emit(self.primary.as_ref());
        if let Some(secondary) = &self.secondary {
            emit(secondary.as_ref());
        }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.each(|l| l.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.each(|l| l.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.each(|l| l.error(msg));
    }
}

/// Logger for the `pathfinder` service given the `[logging] file` setting.
///
/// Without a file, or when fast_log cannot take over the `log` facade, the
/// service logs to the terminal only.
pub fn init_combined_logger(path: Option<&str>) -> Arc<dyn DomainLogger> {
    let console = init_console_logger();
    let Some(path) = path else {
        return console;
    };
    match init_file_logger(path) {
        Ok(file) => Arc::new(MultiLogger::new(file, Some(console))) as Arc<dyn DomainLogger>,
        Err(e) => {
            console.warn(&format!("{}; logging to the terminal only", e));
            console
        }
    }
}
