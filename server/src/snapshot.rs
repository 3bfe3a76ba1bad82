use common::map::{
    EntityMetaData, MapSize, PathEntityKind, PathMapEntity, PointEntityKind, PointMapEntity,
};
use common::{MapEntity, MapLayer, MapSnapshot};
use std::sync::Arc;

use crate::robot::RobotState;

/// Builds map snapshots from cached layers and the current robot state.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    map_size: u32,
    pixel_size: u32,
    charger_location: (f64, f64),
}

impl SnapshotBuilder {
    pub fn new(map_size: u32, pixel_size: u32, charger_location: (f64, f64)) -> Self {
        Self {
            map_size,
            pixel_size,
            charger_location,
        }
    }

    /// Always yields the charger, the robot pose and the accumulated path, in that order.
    pub fn build(&self, layers: &Arc<[MapLayer]>, robot: &RobotState) -> MapSnapshot {
        let (rx, ry) = robot.position();

        MapSnapshot {
            size: MapSize {
                x: self.map_size,
                y: self.map_size,
            },
            pixel_size: self.pixel_size,
            layers: Arc::clone(layers),
            entities: vec![
                MapEntity::PointMapEntity(PointMapEntity {
                    kind: PointEntityKind::ChargerLocation,
                    points: vec![self.charger_location.0, self.charger_location.1],
                    meta_data: EntityMetaData::default(),
                }),
                MapEntity::PointMapEntity(PointMapEntity {
                    kind: PointEntityKind::RobotPosition,
                    points: vec![rx, ry],
                    meta_data: EntityMetaData {
                        angle: Some(robot.heading_degrees()),
                    },
                }),
                MapEntity::PathMapEntity(PathMapEntity {
                    kind: PathEntityKind::Path,
                    points: robot.path().to_vec(),
                    meta_data: EntityMetaData::default(),
                }),
            ],
        }
    }
}
