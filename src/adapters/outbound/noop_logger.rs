use crate::domains::logger::DomainLogger;
use std::sync::Arc;

/// Swallows every diagnostic. Scheduler and service tests inject it when the
/// log lines themselves are not under test.
struct SilentLogger;

impl DomainLogger for SilentLogger {
    fn info(&self, _: &str) {}
    fn warn(&self, _: &str) {}
    fn error(&self, _: &str) {}
}

pub fn init_noop_logger() -> Arc<dyn DomainLogger> {
    Arc::new(SilentLogger)
}
