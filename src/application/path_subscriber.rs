use std::future::Future;

use crate::adapters::inbound::BoundSocket;
use crate::common::{ApplicationResult, DomainResult};
use crate::domains::path_planning::{ControlMessage, PathBroadcast};
use crate::domains::DynLogger;

const BROADCAST_BUFFER_SIZE: usize = 65536;

/// Downstream consumer of path broadcasts.
pub struct PathSubscriber {
    socket: BoundSocket,
    server: String,
    logger: DynLogger,
}

impl PathSubscriber {
    /// Bind the subscriber's own address. Must be called inside a tokio runtime.
    pub fn bind(own_address: &str, server: &str, logger: DynLogger) -> ApplicationResult<Self> {
        let socket = BoundSocket::bind(own_address, true)?;
        Ok(Self {
            socket,
            server: server.to_string(),
            logger,
        })
    }

    pub fn address(&self) -> &str {
        self.socket.address()
    }

    pub fn register(&self) -> std::io::Result<()> {
        self.send_control(ControlMessage::Register(self.address().to_string()))
    }

    pub fn unregister(&self) -> std::io::Result<()> {
        self.send_control(ControlMessage::Unregister(self.address().to_string()))
    }

    fn send_control(&self, message: ControlMessage) -> std::io::Result<()> {
        self.socket
            .socket()
            .try_send_to(&message.encode(), &self.server)
            .map(|_| ())
    }

    /// Wait for the next broadcast.
    pub async fn recv(&self) -> ApplicationResult<DomainResult<PathBroadcast>> {
        let mut buf = vec![0u8; BROADCAST_BUFFER_SIZE];
        let n = self.socket.socket().recv(&mut buf).await?;
        Ok(PathBroadcast::decode(&buf[..n]))
    }

    /// Register, report every broadcast until `shutdown` resolves, then unregister.
    pub async fn run_until<F>(self, shutdown: F) -> ApplicationResult<()>
    where
        F: Future<Output = ()>,
    {
        self.register()?;
        self.logger
            .info(&format!("Listening for path data on {}", self.address()));

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                received = self.recv() => match received? {
                    Ok(broadcast) => self.logger.info(&describe(&broadcast)),
                    Err(e) => self.logger.warn(&format!("Ignoring broadcast: {}", e)),
                },
            }
        }

        if let Err(e) = self.unregister() {
            self.logger
                .warn(&format!("Could not unregister from {}: {}", self.server, e));
        }
        self.logger.info("Exiting...");
        Ok(())
    }
}

/// One-paragraph summary of a broadcast: timestamp, endpoints, and the first waypoints.
pub fn describe(broadcast: &PathBroadcast) -> String {
    let fmt_point = |p: Option<&crate::domains::path_planning::Point2D>| match p {
        Some(p) => format!("({:.2}, {:.2})", p.x, p.y),
        None => "-".to_string(),
    };
    let mut out = format!(
        "=== New Path Data ===\nTimestamp : {:.2}\nStart     : {}\nGoal      : {}\nWaypoints : {}",
        broadcast.timestamp,
        fmt_point(broadcast.path.first()),
        fmt_point(broadcast.path.last()),
        broadcast.path.len()
    );
    for p in broadcast.path.iter().take(5) {
        out.push_str(&format!("\n   {}", fmt_point(Some(p))));
    }
    out
}
