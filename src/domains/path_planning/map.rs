use serde::Deserialize;

use super::geometry::{ObstacleSet, Point2D, Polygon};
use crate::common::{DomainError, DomainResult};

/// Field size assumed when the map document omits `width` or `height`.
pub const DEFAULT_FIELD_EXTENT: f64 = 700.0;

/// A loaded map: field bounds, the obstacles used for every collision query,
/// and road outlines that are carried along for consumers but never planned on.
#[derive(Debug, Clone)]
pub struct FieldMap {
    pub width: f64,
    pub height: f64,
    pub obstacles: ObstacleSet,
    pub roads: Vec<Polygon>,
}

#[derive(Debug, Deserialize)]
struct MapDocument {
    #[serde(default = "default_extent")]
    width: f64,
    #[serde(default = "default_extent")]
    height: f64,
    #[serde(default)]
    obstacles: Vec<Vec<Point2D>>,
    #[serde(default)]
    roads: Vec<Vec<Point2D>>,
}

fn default_extent() -> f64 {
    DEFAULT_FIELD_EXTENT
}

impl FieldMap {
    pub fn new(width: f64, height: f64, obstacles: ObstacleSet) -> DomainResult<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(DomainError::invalid_map(format!(
                "field bounds must be positive, got {} x {}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            obstacles,
            roads: Vec::new(),
        })
    }

    /// Parse a map document: `{"width", "height", "obstacles": [[[x,y],..],..], "roads": ..}`.
    pub fn from_json(source: &str) -> DomainResult<Self> {
        let doc: MapDocument = serde_json::from_str(source)
            .map_err(|e| DomainError::invalid_map(format!("unreadable map document: {}", e)))?;

        let obstacles = doc
            .obstacles
            .into_iter()
            .enumerate()
            .map(|(i, vertices)| {
                Polygon::new(vertices)
                    .map_err(|e| DomainError::invalid_map(format!("obstacle {}: {}", i, e)))
            })
            .collect::<DomainResult<Vec<_>>>()?;
        let roads = doc
            .roads
            .into_iter()
            .enumerate()
            .map(|(i, vertices)| {
                Polygon::new(vertices)
                    .map_err(|e| DomainError::invalid_map(format!("road {}: {}", i, e)))
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let mut map = FieldMap::new(doc.width, doc.height, ObstacleSet::new(obstacles))?;
        map.roads = roads;
        Ok(map)
    }

    /// Planning start used before any position has been received.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.width / 2.0, self.height / 2.0)
    }
}
