//! Wire messages for the position feed, the registration channel and the
//! path broadcast. Everything is decoded into a tagged variant here; anything
//! that does not fit becomes `DomainError::MalformedInput`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::Point2D;
use crate::common::{DomainError, DomainResult};

pub const REGISTER_PREFIX: &str = "REGISTER:";
pub const UNREGISTER_PREFIX: &str = "UNREGISTER:";
pub const UPDATE_PREFIX: &str = "UPDATE:";

const FEED_CHANNEL: &str = "position feed";
const CONTROL_CHANNEL: &str = "registration channel";
const BROADCAST_CHANNEL: &str = "path broadcast";

/// A message arriving from the upstream position feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    Position {
        position: Point2D,
        heading: Option<f64>,
    },
    GoalOverride(Point2D),
}

#[derive(Debug, Deserialize)]
struct PositionPayload {
    x: f64,
    y: f64,
    /// Informational only; a non-numeric value is dropped rather than
    /// rejecting the position.
    #[serde(default, alias = "angle")]
    heading: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GoalPayload {
    goal: Point2D,
}

impl FeedMessage {
    pub fn decode(bytes: &[u8]) -> DomainResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DomainError::malformed(FEED_CHANNEL, format!("not UTF-8: {}", e)))?
            .trim();

        if let Some(body) = text.strip_prefix(UPDATE_PREFIX) {
            let payload: GoalPayload = serde_json::from_str(body).map_err(|e| {
                DomainError::malformed(FEED_CHANNEL, format!("bad goal override: {}", e))
            })?;
            if !payload.goal.is_finite() {
                return Err(DomainError::malformed(FEED_CHANNEL, "goal is not finite"));
            }
            return Ok(FeedMessage::GoalOverride(payload.goal));
        }

        let payload: PositionPayload = serde_json::from_str(text).map_err(|e| {
            DomainError::malformed(FEED_CHANNEL, format!("bad position update: {}", e))
        })?;
        let position = Point2D::new(payload.x, payload.y);
        if !position.is_finite() {
            return Err(DomainError::malformed(FEED_CHANNEL, "position is not finite"));
        }
        Ok(FeedMessage::Position {
            position,
            heading: payload.heading.as_ref().and_then(serde_json::Value::as_f64),
        })
    }
}

/// `REGISTER:<address>` / `UNREGISTER:<address>`, shared by both endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    Register(String),
    Unregister(String),
}

impl ControlMessage {
    pub fn decode(bytes: &[u8]) -> DomainResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| DomainError::malformed(CONTROL_CHANNEL, format!("not UTF-8: {}", e)))?
            .trim();

        let (address, register) = if let Some(rest) = text.strip_prefix(REGISTER_PREFIX) {
            (rest, true)
        } else if let Some(rest) = text.strip_prefix(UNREGISTER_PREFIX) {
            (rest, false)
        } else {
            return Err(DomainError::malformed(
                CONTROL_CHANNEL,
                format!("unknown command {:?}", text),
            ));
        };

        let address = address.trim();
        if address.is_empty() {
            return Err(DomainError::malformed(CONTROL_CHANNEL, "empty address"));
        }
        Ok(if register {
            ControlMessage::Register(address.to_string())
        } else {
            ControlMessage::Unregister(address.to_string())
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            ControlMessage::Register(a) => format!("{}{}", REGISTER_PREFIX, a).into_bytes(),
            ControlMessage::Unregister(a) => format!("{}{}", UNREGISTER_PREFIX, a).into_bytes(),
        }
    }
}

/// A computed route. An empty waypoint list means no path was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub waypoints: Vec<Point2D>,
    pub timestamp: DateTime<Utc>,
}

impl Path {
    pub fn new(waypoints: Vec<Point2D>, timestamp: DateTime<Utc>) -> Self {
        Self {
            waypoints,
            timestamp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

/// Broadcast payload: `{"path": [[x, y], ...], "timestamp": <seconds since epoch>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathBroadcast {
    pub path: Vec<Point2D>,
    pub timestamp: f64,
}

impl PathBroadcast {
    pub fn from_path(path: &Path) -> Self {
        Self {
            path: path.waypoints.clone(),
            timestamp: path.timestamp.timestamp_micros() as f64 / 1_000_000.0,
        }
    }

    pub fn encode(&self) -> DomainResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> DomainResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::malformed(BROADCAST_CHANNEL, e.to_string()))
    }
}
