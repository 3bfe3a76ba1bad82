pub mod layer;
pub mod map;
pub mod state;

pub use layer::{AxisBounds, Pixel, PixelLayer};
pub use map::{LayerKind, MapEntity, MapLayer, MapSnapshot};
pub use state::{AttributeClass, RobotStateStore, StateAttribute, StatusStateAttribute, StatusValue};
