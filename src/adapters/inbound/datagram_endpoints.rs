//! Local datagram endpoints and the per-tick multiplexing step.

use std::io::ErrorKind;
use std::os::unix::fs::FileTypeExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UnixDatagram;
use tracing::{debug, warn};

use crate::adapters::outbound::DatagramPathSink;
use crate::common::{ApplicationError, ApplicationResult};
use crate::config::EndpointConfig;
use crate::domains::path_planning::{ControlMessage, LoopEvent};
use crate::domains::DynLogger;

const FEED_BUFFER_SIZE: usize = 8192;
const CONTROL_BUFFER_SIZE: usize = 4096;

/// A datagram socket bound to a filesystem address. The address is unlinked on drop.
pub struct BoundSocket {
    socket: Arc<UnixDatagram>,
    address: String,
}

impl BoundSocket {
    /// Bind `address`. A socket file nobody is listening on is left over from
    /// a crashed run and is always removed. With `reclaim`, any other existing
    /// file is removed as well; otherwise it makes the bind fail.
    pub fn bind(address: &str, reclaim: bool) -> ApplicationResult<Self> {
        let setup_error = |source| ApplicationError::ResourceSetup {
            address: address.to_string(),
            source,
        };
        if Path::new(address).exists() && (reclaim || is_dead_socket(address)) {
            debug!(address, "removing stale socket file");
            std::fs::remove_file(address).map_err(setup_error)?;
        }
        let socket = UnixDatagram::bind(address).map_err(setup_error)?;
        Ok(Self {
            socket: Arc::new(socket),
            address: address.to_string(),
        })
    }

    pub fn socket(&self) -> &Arc<UnixDatagram> {
        &self.socket
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// True when `address` is a socket file whose owner is gone. Connecting a
/// datagram socket checks for a live peer without sending anything.
fn is_dead_socket(address: &str) -> bool {
    let is_socket = std::fs::metadata(address)
        .map(|m| m.file_type().is_socket())
        .unwrap_or(false);
    if !is_socket {
        return false;
    }
    match std::os::unix::net::UnixDatagram::unbound().and_then(|peer| peer.connect(address)) {
        Ok(()) => false,
        Err(e) => e.kind() == ErrorKind::ConnectionRefused,
    }
}

impl Drop for BoundSocket {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.address) {
            debug!(address = %self.address, error = %e, "socket file already gone");
        }
    }
}

/// The two inbound endpoints of the pathfinder: its client address on the
/// upstream position feed and the path server subscribers register with.
pub struct DatagramEndpoints {
    feed: BoundSocket,
    path_server: BoundSocket,
    upstream: String,
    registered_upstream: bool,
}

impl DatagramEndpoints {
    /// Must be called inside a tokio runtime.
    pub fn bind(config: &EndpointConfig) -> ApplicationResult<Self> {
        // The per-process feed address can only belong to a previous run of this process id.
        let feed = BoundSocket::bind(&config.feed_client_address(), true)?;
        let path_server = BoundSocket::bind(&config.path_server, config.reclaim_stale_sockets)?;
        Ok(Self {
            feed,
            path_server,
            upstream: config.position_feed.clone(),
            registered_upstream: false,
        })
    }

    pub fn feed_address(&self) -> &str {
        self.feed.address()
    }

    pub fn path_server_address(&self) -> &str {
        self.path_server.address()
    }

    pub fn sink(&self) -> DatagramPathSink {
        DatagramPathSink::new(self.path_server.socket().clone())
    }

    /// Send `REGISTER:<feed address>` to the upstream feed.
    pub fn register_upstream(&mut self) -> std::io::Result<()> {
        let message = ControlMessage::Register(self.feed.address().to_string()).encode();
        self.feed.socket().try_send_to(&message, &self.upstream)?;
        self.registered_upstream = true;
        Ok(())
    }

    /// Wait up to `timeout` for one datagram on either endpoint.
    pub async fn next_event(&self, timeout: Duration) -> LoopEvent {
        let mut feed_buf = vec![0u8; FEED_BUFFER_SIZE];
        let mut control_buf = vec![0u8; CONTROL_BUFFER_SIZE];

        tokio::select! {
            received = self.feed.socket().recv(&mut feed_buf) => match received {
                Ok(n) => LoopEvent::PositionFeed(feed_buf[..n].to_vec()),
                Err(e) => {
                    warn!(error = %e, "position feed receive failed");
                    LoopEvent::Idle
                }
            },
            received = self.path_server.socket().recv(&mut control_buf) => match received {
                Ok(n) => LoopEvent::Registration(control_buf[..n].to_vec()),
                Err(e) => {
                    warn!(error = %e, "registration receive failed");
                    LoopEvent::Idle
                }
            },
            _ = tokio::time::sleep(timeout) => LoopEvent::Idle,
        }
    }

    /// Unregister from the upstream feed if registered, then release both addresses.
    pub fn shutdown(mut self, logger: &DynLogger) {
        if self.registered_upstream {
            let message = ControlMessage::Unregister(self.feed.address().to_string()).encode();
            match self.feed.socket().try_send_to(&message, &self.upstream) {
                Ok(_) => logger.info(&format!("Unregistered from position feed {}", self.upstream)),
                Err(e) => logger.warn(&format!(
                    "Could not unregister from position feed {}: {}",
                    self.upstream, e
                )),
            }
            self.registered_upstream = false;
        }
        let DatagramEndpoints {
            feed, path_server, ..
        } = self;
        let released = format!(
            "Released endpoints {} and {}",
            feed.address(),
            path_server.address()
        );
        drop(feed);
        drop(path_server);
        logger.info(&released);
    }
}
