use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Surface type of an exported layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Wall,
    Floor,
    Segment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisDimensions {
    pub min: i64,
    pub max: i64,
    pub mid: i64,
}

/// Extent of a layer as of its last bounds computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDimensions {
    pub x: AxisDimensions,
    pub y: AxisDimensions,
    pub pixel_count: usize,
}

/// One exported layer. `pixels` is flattened as x0, y0, x1, y1, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayer {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub pixels: Vec<i64>,
    /// Absent until bounds have been computed over at least one pixel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<LayerDimensions>,
    pub meta_data: LayerMetaData,
}

impl MapLayer {
    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointEntityKind {
    ChargerLocation,
    RobotPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathEntityKind {
    Path,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityMetaData {
    /// Robot heading in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointMapEntity {
    #[serde(rename = "type")]
    pub kind: PointEntityKind,
    pub points: Vec<f64>,
    #[serde(default)]
    pub meta_data: EntityMetaData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMapEntity {
    #[serde(rename = "type")]
    pub kind: PathEntityKind,
    /// Flattened x0, y0, x1, y1, ...
    pub points: Vec<f64>,
    #[serde(default)]
    pub meta_data: EntityMetaData,
}

/// Point or path entity, tagged by class name the way the dashboard expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__class")]
pub enum MapEntity {
    PointMapEntity(PointMapEntity),
    PathMapEntity(PathMapEntity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSize {
    pub x: u32,
    pub y: u32,
}

/// A fully assembled map. Built fresh per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSnapshot {
    pub size: MapSize,
    pub pixel_size: u32,
    /// Shared with the layer cache that produced this snapshot.
    pub layers: Arc<[MapLayer]>,
    pub entities: Vec<MapEntity>,
}

impl MapSnapshot {
    pub fn point(&self, kind: PointEntityKind) -> Option<&PointMapEntity> {
        self.entities.iter().find_map(|e| match e {
            MapEntity::PointMapEntity(p) if p.kind == kind => Some(p),
            _ => None,
        })
    }

    pub fn path(&self) -> Option<&PathMapEntity> {
        self.entities.iter().find_map(|e| match e {
            MapEntity::PathMapEntity(p) => Some(p),
            _ => None,
        })
    }
}
