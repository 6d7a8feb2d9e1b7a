use std::sync::Arc;

use tokio::net::UnixDatagram;

use crate::domains::path_planning::ports::PathSink;

/// Delivers broadcasts from the path server socket with non-blocking sends.
///
/// A full receive buffer on the subscriber side surfaces as `WouldBlock` and
/// is treated like any other delivery failure.
#[derive(Clone)]
pub struct DatagramPathSink {
    socket: Arc<UnixDatagram>,
}

impl DatagramPathSink {
    pub fn new(socket: Arc<UnixDatagram>) -> Self {
        Self { socket }
    }
}

impl PathSink for DatagramPathSink {
    fn deliver(&self, address: &str, payload: &[u8]) -> std::io::Result<()> {
        self.socket.try_send_to(payload, address).map(|_| ())
    }
}
