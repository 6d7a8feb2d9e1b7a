//! A* over the roadmap with transient start and goal nodes.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

use super::geometry::{ObstacleSet, Point2D};
use super::roadmap::Roadmap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanRequest {
    pub start: Point2D,
    pub goal: Point2D,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// The straight segment was clear; search was skipped.
    Direct(Vec<Point2D>),
    Searched { waypoints: Vec<Point2D>, expanded: usize },
    NoPath { expanded: usize },
}

impl PlanOutcome {
    pub fn waypoints(&self) -> &[Point2D] {
        match self {
            PlanOutcome::Direct(w) | PlanOutcome::Searched { waypoints: w, .. } => w,
            PlanOutcome::NoPath { .. } => &[],
        }
    }

    /// Waypoints from start to goal; empty means no path.
    pub fn into_waypoints(self) -> Vec<Point2D> {
        match self {
            PlanOutcome::Direct(w) | PlanOutcome::Searched { waypoints: w, .. } => w,
            PlanOutcome::NoPath { .. } => Vec::new(),
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, PlanOutcome::NoPath { .. })
    }
}

/// Open-set entry. Ordered by `f`, then by insertion sequence so equal `f`
/// values pop first-in first-out. The heap is a max-heap, hence the reversal.
#[derive(Debug)]
struct OpenEntry {
    f: OrderedFloat<f64>,
    seq: u64,
    g: f64,
    node: NodeIndex,
    parent: Option<NodeIndex>,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stateless planner over a shared roadmap.
pub struct AStarPlanner<'a> {
    roadmap: &'a Roadmap,
    obstacles: &'a ObstacleSet,
    max_edge_length: f64,
}

impl<'a> AStarPlanner<'a> {
    pub fn new(roadmap: &'a Roadmap, obstacles: &'a ObstacleSet, max_edge_length: f64) -> Self {
        Self {
            roadmap,
            obstacles,
            max_edge_length,
        }
    }

    pub fn plan(&self, request: PlanRequest) -> PlanOutcome {
        let PlanRequest { start, goal } = request;
        if !self.obstacles.blocks(&start, &goal) {
            return PlanOutcome::Direct(vec![start, goal]);
        }

        let (graph, start_idx, goal_idx) = self.extended_graph(start, goal);
        let outcome = search(&graph, start_idx, goal_idx);
        debug!(
            found = outcome.is_found(),
            waypoints = outcome.waypoints().len(),
            "roadmap search finished"
        );
        outcome
    }

    /// Copy of the roadmap with `start` and `goal` appended and wired to every
    /// visible roadmap node in range.
    fn extended_graph(
        &self,
        start: Point2D,
        goal: Point2D,
    ) -> (UnGraph<Point2D, f64>, NodeIndex, NodeIndex) {
        let mut graph = self.roadmap.graph().clone();
        let base: Vec<(NodeIndex, Point2D)> = graph
            .node_indices()
            .map(|i| (i, graph[i]))
            .collect();
        let start_idx = graph.add_node(start);
        let goal_idx = graph.add_node(goal);

        for (idx, p) in base {
            for (endpoint_idx, endpoint) in [(start_idx, start), (goal_idx, goal)] {
                let d = endpoint.distance(&p);
                if d <= self.max_edge_length && !self.obstacles.blocks(&endpoint, &p) {
                    graph.add_edge(endpoint_idx, idx, d);
                }
            }
        }
        if !self.obstacles.blocks(&start, &goal) {
            graph.add_edge(start_idx, goal_idx, start.distance(&goal));
        }
        (graph, start_idx, goal_idx)
    }
}

fn search(graph: &UnGraph<Point2D, f64>, start: NodeIndex, goal: NodeIndex) -> PlanOutcome {
    let goal_pt = graph[goal];
    let mut open = BinaryHeap::new();
    let mut came_from: HashMap<NodeIndex, Option<NodeIndex>> = HashMap::new();
    let mut g_score: HashMap<NodeIndex, f64> = HashMap::new();
    let mut seq = 0u64;

    g_score.insert(start, 0.0);
    open.push(OpenEntry {
        f: OrderedFloat(graph[start].distance(&goal_pt)),
        seq,
        g: 0.0,
        node: start,
        parent: None,
    });

    while let Some(OpenEntry { g, node, parent, .. }) = open.pop() {
        if came_from.contains_key(&node) {
            continue;
        }
        came_from.insert(node, parent);

        if node == goal {
            let mut waypoints = Vec::new();
            let mut cur = Some(node);
            while let Some(n) = cur {
                waypoints.push(graph[n]);
                cur = came_from.get(&n).copied().flatten();
            }
            waypoints.reverse();
            return PlanOutcome::Searched {
                waypoints,
                expanded: came_from.len(),
            };
        }

        for next in graph.neighbors(node) {
            let tentative = g + graph[node].distance(&graph[next]);
            if tentative < g_score.get(&next).copied().unwrap_or(f64::INFINITY) {
                g_score.insert(next, tentative);
                seq += 1;
                open.push(OpenEntry {
                    f: OrderedFloat(tentative + graph[next].distance(&goal_pt)),
                    seq,
                    g: tentative,
                    node: next,
                    parent: Some(node),
                });
            }
        }
    }

    PlanOutcome::NoPath {
        expanded: came_from.len(),
    }
}
