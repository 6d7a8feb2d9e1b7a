use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use anyhow::Result;

use crate::common::{DomainError, DomainResult};
use crate::domains::path_planning::{RoadmapParams, SchedulerSettings, MAX_ROADMAP_SAMPLES};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub map: MapConfig,
    pub roadmap: RoadmapParams,
    pub scheduler: SchedulerConfig,
    pub endpoints: EndpointConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub replan_interval_ms: u64,
    pub poll_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    /// Well-known address of the upstream position feed.
    pub position_feed: String,
    /// This process's address on the feed side; `{pid}` is replaced by the process id.
    pub feed_client: String,
    /// Address subscribers send REGISTER/UNREGISTER to.
    pub path_server: String,
    /// Remove whatever file occupies an endpoint address before binding.
    /// Dead socket files are removed regardless; a live occupant or a
    /// non-socket file is fatal unless this is set.
    pub reclaim_stale_sockets: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<String>,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::from_file`], but a missing file yields the defaults.
    pub async fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if tokio::fs::try_exists(path.as_ref()).await? {
            Self::from_file(path).await
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        let invalid = |reason: &str| {
            Err(DomainError::InvalidConfiguration {
                reason: reason.to_string(),
            })
        };
        if self.roadmap.samples == 0 {
            return invalid("roadmap.samples must be positive");
        }
        if self.roadmap.samples > MAX_ROADMAP_SAMPLES {
            return Err(DomainError::InvalidConfiguration {
                reason: format!("roadmap.samples must not exceed {}", MAX_ROADMAP_SAMPLES),
            });
        }
        if self.roadmap.neighbors == 0 {
            return invalid("roadmap.neighbors must be positive");
        }
        if !(self.roadmap.max_edge_length.is_finite() && self.roadmap.max_edge_length > 0.0) {
            return invalid("roadmap.max_edge_length must be positive");
        }
        if self.scheduler.replan_interval_ms == 0 {
            return invalid("scheduler.replan_interval_ms must be positive");
        }
        if self.scheduler.poll_timeout_ms == 0 {
            return invalid("scheduler.poll_timeout_ms must be positive");
        }
        Ok(())
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            replan_interval: Duration::from_millis(self.scheduler.replan_interval_ms),
            max_edge_length: self.roadmap.max_edge_length,
        }
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.scheduler.poll_timeout_ms)
    }
}

impl EndpointConfig {
    pub fn feed_client_address(&self) -> String {
        self.feed_client
            .replace("{pid}", &std::process::id().to_string())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            path: "map.json".to_string(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            replan_interval_ms: 5000,
            poll_timeout_ms: 50,
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            position_feed: "/tmp/car_state_server.sock".to_string(),
            feed_client: "/tmp/pathfinder_client_{pid}.sock".to_string(),
            path_server: "/tmp/path_planner.sock".to_string(),
            reclaim_stale_sockets: false,
        }
    }
}
