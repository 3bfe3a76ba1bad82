use common::{MapLayer, MapSnapshot, StatusValue};
use std::sync::Arc;

use crate::assembler::MapAssembler;
use crate::config::MapConfig;
use crate::robot::RobotState;
use crate::snapshot::SnapshotBuilder;

/// The mock robot's map: a static room plus the simulated robot pose.
pub struct MockMap {
    assembler: MapAssembler,
    snapshots: SnapshotBuilder,
    robot: RobotState,
}

impl MockMap {
    pub fn new(config: &MapConfig) -> Self {
        let px = f64::from(config.pixel_size);
        let assembler =
            MapAssembler::enclosed_room(config.width, config.height, config.render_floor);

        tracing::info!(
            "Generated {}x{} mock map ({} layers, pixel size {})",
            config.width,
            config.height,
            assembler.layers().len(),
            config.pixel_size
        );

        Self {
            assembler,
            snapshots: SnapshotBuilder::new(config.map_size, config.pixel_size, (5.0 * px, 3.0 * px)),
            robot: RobotState::new((5.0 * px, 6.0 * px), 0.0, StatusValue::Docked),
        }
    }

    /// A freshly built snapshot of the current map.
    pub fn get_map(&self) -> MapSnapshot {
        self.snapshots.build(&self.assembler.layers(), &self.robot)
    }

    pub fn get_map_layers(&self) -> Arc<[MapLayer]> {
        self.assembler.layers()
    }

    pub fn assembler(&self) -> &MapAssembler {
        &self.assembler
    }

    pub fn robot(&self) -> &RobotState {
        &self.robot
    }

    pub(crate) fn robot_mut(&mut self) -> &mut RobotState {
        &mut self.robot
    }
}
