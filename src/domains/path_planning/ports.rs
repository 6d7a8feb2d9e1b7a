use crate::common::DomainResult;

/// Port trait that the path_planning domain depends on for loading map documents.
/// Implementations (adapters) provide filesystem or other backed sources.
pub trait MapSource: Send + Sync {
    fn load_map(&self, name: &str) -> DomainResult<String>;
}

/// Port for delivering one encoded broadcast to one subscriber address.
///
/// Delivery is best effort and must not block; any error means the address
/// is dropped from the registry.
pub trait PathSink {
    fn deliver(&self, address: &str, payload: &[u8]) -> std::io::Result<()>;
}

impl<T: PathSink + ?Sized> PathSink for &T {
    fn deliver(&self, address: &str, payload: &[u8]) -> std::io::Result<()> {
        (**self).deliver(address, payload)
    }
}
