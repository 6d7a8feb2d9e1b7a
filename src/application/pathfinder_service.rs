use std::future::Future;
use std::time::{Duration, Instant};

use crate::adapters::inbound::DatagramEndpoints;
use crate::adapters::outbound::DatagramPathSink;
use crate::common::ApplicationResult;
use crate::config::Config;
use crate::domains::path_planning::{FieldMap, Point2D, ReplanScheduler, Roadmap};
use crate::domains::DynLogger;

/// The pathfinder process: a single-threaded loop that multiplexes the feed
/// and registration endpoints, replans on cadence and fans paths out.
///
/// All mutable state lives in the scheduler and is only touched between
/// poll steps of [`PathfinderService::run_until`].
pub struct PathfinderService {
    scheduler: ReplanScheduler<DatagramPathSink>,
    endpoints: DatagramEndpoints,
    poll_timeout: Duration,
    logger: DynLogger,
}

impl PathfinderService {
    /// Bind endpoints, register upstream and build the roadmap.
    ///
    /// Binding happens first so that an address in use fails before the roadmap
    /// is built. A failed upstream registration is not fatal.
    pub async fn start(
        config: &Config,
        map: FieldMap,
        goal: Option<Point2D>,
        logger: DynLogger,
    ) -> ApplicationResult<Self> {
        config.validate()?;

        let mut endpoints = DatagramEndpoints::bind(&config.endpoints)?;
        logger.info(&format!(
            "Listening for subscribers on {}, feed client {}",
            endpoints.path_server_address(),
            endpoints.feed_address()
        ));
        if let Err(e) = endpoints.register_upstream() {
            logger.warn(&format!(
                "Could not register with position feed {}: {}",
                config.endpoints.position_feed, e
            ));
        }

        let roadmap = Roadmap::build(&map, &config.roadmap);
        logger.info(&format!(
            "[PRM] Nodes={} Edges={}",
            roadmap.node_count(),
            roadmap.edge_count()
        ));

        let mut scheduler = ReplanScheduler::new(
            map,
            roadmap,
            config.scheduler_settings(),
            endpoints.sink(),
            logger.clone(),
        );
        if let Some(goal) = goal {
            scheduler.set_goal(goal);
        }

        Ok(Self {
            scheduler,
            endpoints,
            poll_timeout: config.poll_timeout(),
            logger,
        })
    }

    pub fn scheduler(&self) -> &ReplanScheduler<DatagramPathSink> {
        &self.scheduler
    }

    pub fn path_server_address(&self) -> &str {
        self.endpoints.path_server_address()
    }

    pub fn feed_address(&self) -> &str {
        self.endpoints.feed_address()
    }

    /// Run one loop iteration: one multiplexing step, then one scheduler tick.
    pub async fn step(&mut self) {
        let event = self.endpoints.next_event(self.poll_timeout).await;
        self.scheduler.handle_event(event);
        self.scheduler.tick(Instant::now());
    }

    /// Run until `shutdown` resolves, then unregister upstream and release endpoints.
    pub async fn run_until<F>(mut self, shutdown: F) -> ApplicationResult<()>
    where
        F: Future<Output = ()>,
    {
        self.logger.info("Running. Waiting for position updates and goals.");
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.step() => {}
            }
        }

        self.logger.info("Exiting...");
        let PathfinderService {
            endpoints, logger, ..
        } = self;
        endpoints.shutdown(&logger);
        Ok(())
    }

    /// Run until the process receives an interrupt.
    pub async fn run(self) -> ApplicationResult<()> {
        let logger = self.logger.clone();
        self.run_until(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                logger.error(&format!("Cannot listen for interrupts: {}", e));
                std::future::pending::<()>().await;
            }
        })
        .await
    }
}
