use std::collections::BTreeSet;

use super::messages::{ControlMessage, Path, PathBroadcast};
use super::ports::PathSink;
use crate::common::DomainResult;

/// Addresses of downstream consumers. Opaque strings; order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberRegistry {
    addresses: BTreeSet<String>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the address was already registered.
    pub fn register(&mut self, address: impl Into<String>) -> bool {
        self.addresses.insert(address.into())
    }

    /// Returns false if the address was not registered.
    pub fn unregister(&mut self, address: &str) -> bool {
        self.addresses.remove(address)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub delivered: usize,
    /// Addresses removed because delivery to them failed.
    pub pruned: Vec<String>,
}

/// Fans the newest path out to every registered subscriber.
pub struct PathPublisher<S: PathSink> {
    registry: SubscriberRegistry,
    sink: S,
}

impl<S: PathSink> PathPublisher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            registry: SubscriberRegistry::new(),
            sink,
        }
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        &self.registry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Apply a REGISTER/UNREGISTER. Returns whether the registry changed.
    pub fn handle_control(&mut self, message: ControlMessage) -> bool {
        match message {
            ControlMessage::Register(address) => self.registry.register(address),
            ControlMessage::Unregister(address) => self.registry.unregister(&address),
        }
    }

    /// Serialize once and send the same bytes to every subscriber. Failed
    /// addresses are pruned without retry.
    pub fn publish(&mut self, path: &Path) -> DomainResult<PublishReport> {
        let payload = PathBroadcast::from_path(path).encode()?;
        let mut report = PublishReport::default();

        for address in self.registry.addresses() {
            match self.sink.deliver(address, &payload) {
                Ok(()) => report.delivered += 1,
                Err(_) => report.pruned.push(address.to_string()),
            }
        }
        for address in &report.pruned {
            self.registry.unregister(address);
        }
        Ok(report)
    }
}
