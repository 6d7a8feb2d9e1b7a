use std::time::Instant;

use super::geometry::Point2D;
use super::messages::FeedMessage;
use crate::common::DomainResult;

/// What the scheduler knows about the agent. Mutated only by the scheduler loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentState {
    pub position: Option<Point2D>,
    pub heading: Option<f64>,
    pub goal: Option<Point2D>,
    /// When the last plan was computed; `None` until the first one.
    pub last_plan: Option<Instant>,
}

/// What an accepted feed message changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IngestUpdate {
    Position(Point2D),
    Goal(Point2D),
}

impl AgentState {
    /// Apply one raw feed datagram. Last message wins; nothing is buffered.
    /// A malformed message leaves the state untouched and is returned as an error
    /// for the caller to report.
    pub fn ingest(&mut self, bytes: &[u8]) -> DomainResult<IngestUpdate> {
        Ok(self.apply(FeedMessage::decode(bytes)?))
    }

    pub fn apply(&mut self, message: FeedMessage) -> IngestUpdate {
        match message {
            FeedMessage::Position { position, heading } => {
                self.position = Some(position);
                self.heading = heading;
                IngestUpdate::Position(position)
            }
            FeedMessage::GoalOverride(goal) => {
                self.set_goal(goal);
                IngestUpdate::Goal(goal)
            }
        }
    }

    /// Replace the active goal. The next tick plans immediately.
    pub fn set_goal(&mut self, goal: Point2D) {
        self.goal = Some(goal);
        self.last_plan = None;
    }

    /// Where planning starts: the last known position, or `fallback` before any arrived.
    pub fn start_or(&self, fallback: Point2D) -> Point2D {
        self.position.unwrap_or(fallback)
    }
}
