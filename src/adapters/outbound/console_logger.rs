use crate::domains::logger::DomainLogger;
use std::sync::Arc;

const TAG: &str = "[pathfinder]";

/// Plan and registration diagnostics on stdout; errors on stderr.
struct TerminalLogger;

impl DomainLogger for TerminalLogger {
    fn info(&self, msg: &str) { println!("{} {}", TAG, msg); }
    fn warn(&self, msg: &str) { println!("{} warning: {}", TAG, msg); }
    fn error(&self, msg: &str) { eprintln!("{} error: {}", TAG, msg); }
}

/// Logger used by both binaries when no log file is configured.
pub fn init_console_logger() -> Arc<dyn DomainLogger> {
    Arc::new(TerminalLogger)
}
