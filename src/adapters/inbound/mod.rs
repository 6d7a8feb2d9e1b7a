pub mod datagram_endpoints;

pub use datagram_endpoints::*;
