use std::sync::{Arc, Mutex};

use pathfinder_app::adapters::outbound::{init_combined_logger, init_noop_logger, MultiLogger};
use pathfinder_app::domains::logger::DomainLogger;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self { Self { messages: Arc::new(Mutex::new(Vec::new())) } }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}

#[test]
fn test_multi_logger_forwards_to_both() {
    let primary = Arc::new(BridgeCapture::new());
    let secondary = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(
        primary.clone() as Arc<dyn DomainLogger>,
        Some(secondary.clone() as Arc<dyn DomainLogger>),
    );

    multi.info("one");
    multi.warn("two");
    multi.error("three");

    for capture in [&primary, &secondary] {
        let msgs = capture.messages.lock().unwrap();
        assert_eq!(*msgs, vec!["INFO:one", "WARN:two", "ERR:three"]);
    }
}

#[test]
fn test_multi_logger_without_secondary() {
    let primary = Arc::new(BridgeCapture::new());
    let multi = MultiLogger::new(primary.clone() as Arc<dyn DomainLogger>, None);

    multi.warn("only primary");
    assert_eq!(*primary.messages.lock().unwrap(), vec!["WARN:only primary"]);
}

#[test]
fn test_console_and_noop_loggers_accept_calls() {
    // without a log file the combined logger is the console logger
    let console = init_combined_logger(None);
    console.info("console info");
    console.warn("console warn");

    let noop = init_noop_logger();
    noop.info("ignored");
    noop.error("ignored-err");
}
