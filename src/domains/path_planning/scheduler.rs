//! The replanning control loop state machine.
//!
//! The scheduler owns every piece of mutable planning state: the agent state,
//! the subscriber registry (through its publisher) and the current path. The
//! surrounding service feeds it one [`LoopEvent`] and one [`tick`] per loop
//! iteration; nothing else mutates it.
//!
//! [`tick`]: ReplanScheduler::tick

use std::time::{Duration, Instant};

use chrono::Utc;

use super::agent_state::{AgentState, IngestUpdate};
use super::geometry::Point2D;
use super::map::FieldMap;
use super::messages::{ControlMessage, Path};
use super::planner::{AStarPlanner, PlanOutcome, PlanRequest};
use super::ports::PathSink;
use super::registry::{PathPublisher, SubscriberRegistry};
use super::roadmap::Roadmap;
use crate::domains::DynLogger;

/// Result of one multiplexing step over the inbound endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopEvent {
    PositionFeed(Vec<u8>),
    Registration(Vec<u8>),
    /// Nothing was ready before the poll timeout.
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// No goal set.
    Idle,
    /// A plan exists and the interval has not elapsed yet.
    Planned,
    /// Goal set and the interval has elapsed (or no plan was made yet).
    Due,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerSettings {
    pub replan_interval: Duration,
    pub max_edge_length: f64,
}

pub struct ReplanScheduler<S: PathSink> {
    map: FieldMap,
    roadmap: Roadmap,
    settings: SchedulerSettings,
    state: AgentState,
    publisher: PathPublisher<S>,
    current_path: Option<Path>,
    logger: DynLogger,
}

impl<S: PathSink> ReplanScheduler<S> {
    pub fn new(
        map: FieldMap,
        roadmap: Roadmap,
        settings: SchedulerSettings,
        sink: S,
        logger: DynLogger,
    ) -> Self {
        Self {
            map,
            roadmap,
            settings,
            state: AgentState::default(),
            publisher: PathPublisher::new(sink),
            current_path: None,
            logger,
        }
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn registry(&self) -> &SubscriberRegistry {
        self.publisher.registry()
    }

    pub fn sink(&self) -> &S {
        self.publisher.sink()
    }

    pub fn roadmap(&self) -> &Roadmap {
        &self.roadmap
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_ref()
    }

    pub fn set_goal(&mut self, goal: Point2D) {
        self.state.set_goal(goal);
        self.logger
            .info(&format!("Goal set to ({:.2}, {:.2})", goal.x, goal.y));
    }

    pub fn handle_event(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::PositionFeed(bytes) => self.handle_feed(&bytes),
            LoopEvent::Registration(bytes) => self.handle_registration(&bytes),
            LoopEvent::Idle => {}
        }
    }

    pub fn handle_feed(&mut self, bytes: &[u8]) {
        match self.state.ingest(bytes) {
            Ok(IngestUpdate::Goal(goal)) => {
                self.logger.info(&format!(
                    "Goal updated via feed override to ({:.2}, {:.2})",
                    goal.x, goal.y
                ));
            }
            Ok(IngestUpdate::Position(_)) => {}
            Err(e) => self.logger.warn(&format!("Discarding feed message: {}", e)),
        }
    }

    pub fn handle_registration(&mut self, bytes: &[u8]) {
        let message = match ControlMessage::decode(bytes) {
            Ok(m) => m,
            Err(e) => {
                self.logger
                    .warn(&format!("Discarding registration message: {}", e));
                return;
            }
        };
        let description = match &message {
            ControlMessage::Register(a) => format!("Registered subscriber {}", a),
            ControlMessage::Unregister(a) => format!("Unregistered subscriber {}", a),
        };
        if self.publisher.handle_control(message) {
            self.logger.info(&description);
        }
    }

    pub fn phase(&self, now: Instant) -> SchedulerPhase {
        if self.state.goal.is_none() {
            return SchedulerPhase::Idle;
        }
        match self.state.last_plan {
            Some(last) if now.saturating_duration_since(last) < self.settings.replan_interval => {
                SchedulerPhase::Planned
            }
            _ => SchedulerPhase::Due,
        }
    }

    /// Plan and publish if a replan is due. Returns the new path when one was made.
    pub fn tick(&mut self, now: Instant) -> Option<&Path> {
        if self.phase(now) != SchedulerPhase::Due {
            return None;
        }
        self.replan(now)
    }

    fn replan(&mut self, now: Instant) -> Option<&Path> {
        let goal = self.state.goal?;
        let start = self.state.start_or(self.map.center());

        let planner = AStarPlanner::new(
            &self.roadmap,
            &self.map.obstacles,
            self.settings.max_edge_length,
        );
        let outcome = planner.plan(PlanRequest { start, goal });
        match &outcome {
            PlanOutcome::Direct(_) => self.logger.info("Direct path OK"),
            PlanOutcome::Searched { waypoints, expanded } => self.logger.info(&format!(
                "Path found, len={} (expanded {} nodes)",
                waypoints.len(),
                expanded
            )),
            PlanOutcome::NoPath { expanded } => self
                .logger
                .warn(&format!("No path found (expanded {} nodes)", expanded)),
        }

        self.state.last_plan = Some(now);
        let path = Path::new(outcome.into_waypoints(), Utc::now());

        if !self.publisher.registry().is_empty() {
            match self.publisher.publish(&path) {
                Ok(report) => {
                    for address in &report.pruned {
                        self.logger
                            .warn(&format!("Dropped unreachable subscriber {}", address));
                    }
                }
                Err(e) => self.logger.error(&format!("Failed to encode path: {}", e)),
            }
        }

        self.current_path = Some(path);
        self.current_path.as_ref()
    }
}
