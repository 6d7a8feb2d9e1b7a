//! Probabilistic roadmap over the free space of a [`FieldMap`].

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::geometry::{ObstacleSet, Point2D};
use super::map::FieldMap;

/// Rejection sampling gives up after this many attempts per requested sample.
pub const SAMPLE_ATTEMPT_FACTOR: usize = 20;
/// Largest accepted `samples` setting. Connection is quadratic in the node count.
pub const MAX_ROADMAP_SAMPLES: usize = 50_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoadmapParams {
    /// Number of free-space points to sample.
    pub samples: usize,
    /// Nearest neighbors considered for each point.
    pub neighbors: usize,
    pub max_edge_length: f64,
    pub seed: u64,
}

impl Default for RoadmapParams {
    fn default() -> Self {
        Self {
            samples: 600,
            neighbors: 12,
            max_edge_length: 200.0,
            seed: 0,
        }
    }
}

/// Undirected roadmap. Node weights are positions, edge weights are lengths.
///
/// Built once per map. Planning clones the graph and never mutates this one.
#[derive(Debug, Clone)]
pub struct Roadmap {
    graph: UnGraph<Point2D, f64>,
}

impl Roadmap {
    pub fn build(map: &FieldMap, params: &RoadmapParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let samples = sample_free(map, params.samples, &mut rng);
        let roadmap = Self::connect(samples, params, &map.obstacles);
        info!(
            nodes = roadmap.node_count(),
            edges = roadmap.edge_count(),
            requested = params.samples,
            "roadmap built"
        );
        roadmap
    }

    /// Connect every point to those of its `k` nearest neighbors that are within
    /// range and visible.
    pub fn connect(points: Vec<Point2D>, params: &RoadmapParams, obstacles: &ObstacleSet) -> Self {
        let per_node = params.neighbors.min(points.len().saturating_sub(1));
        let mut graph = UnGraph::with_capacity(points.len(), points.len().saturating_mul(per_node));
        let indices: Vec<NodeIndex> = points.iter().map(|p| graph.add_node(*p)).collect();

        for (i, a) in points.iter().enumerate() {
            let mut ranked: Vec<(usize, f64)> = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(j, b)| (j, a.distance(b)))
                .collect();
            ranked.sort_by(|x, y| x.1.total_cmp(&y.1));

            for (j, d) in ranked.into_iter().take(params.neighbors) {
                if d > params.max_edge_length {
                    continue;
                }
                if graph.contains_edge(indices[i], indices[j]) {
                    continue;
                }
                if !obstacles.blocks(a, &points[j]) {
                    graph.add_edge(indices[i], indices[j], d);
                }
            }
        }
        debug!(nodes = graph.node_count(), edges = graph.edge_count(), "roadmap connected");
        Self { graph }
    }

    pub fn graph(&self) -> &UnGraph<Point2D, f64> {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn point(&self, index: usize) -> Option<Point2D> {
        self.graph.node_weight(NodeIndex::new(index)).copied()
    }

    pub fn points(&self) -> Vec<Point2D> {
        self.graph.node_weights().copied().collect()
    }

    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(index))
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Edges as `(low, high, length)`, sorted by endpoints.
    pub fn edges(&self) -> Vec<(usize, usize, f64)> {
        let mut out: Vec<(usize, usize, f64)> = self
            .graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                (a.min(b), a.max(b), *e.weight())
            })
            .collect();
        out.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        out
    }
}

/// Uniform rejection sampling inside the field. May return fewer than `count`
/// points when the attempt budget runs out.
fn sample_free(map: &FieldMap, count: usize, rng: &mut StdRng) -> Vec<Point2D> {
    let mut points = Vec::with_capacity(count.min(MAX_ROADMAP_SAMPLES));
    let budget = count.saturating_mul(SAMPLE_ATTEMPT_FACTOR);
    let mut attempts = 0;
    while points.len() < count && attempts < budget {
        let p = Point2D::new(rng.gen_range(0.0..=map.width), rng.gen_range(0.0..=map.height));
        if !map.obstacles.contains(&p) {
            points.push(p);
        }
        attempts += 1;
    }
    if points.len() < count {
        debug!(sampled = points.len(), requested = count, attempts, "sampling budget exhausted");
    }
    points
}
