use crate::map::{AxisDimensions, LayerDimensions, LayerKind, LayerMetaData, MapLayer};

/// A pixel coordinate in map-pixel space.
pub type Pixel = (i64, i64);

/// Min/max extent along one axis.
///
/// Starts out as the sentinel `(+inf, 0)`; a layer without pixels keeps it.
/// Stored as `f64` to carry the infinite sentinel, which is exact for
/// coordinates up to 2^53 in magnitude; canvases stay far below that.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    pub const SENTINEL: AxisBounds = AxisBounds {
        min: f64::INFINITY,
        max: 0.0,
    };

    /// Whether these bounds still hold the sentinel, i.e. the layer has no extent.
    pub fn is_unset(&self) -> bool {
        self.min.is_infinite()
    }

    /// Integer extent, or `None` while unset.
    pub fn to_dimensions(&self) -> Option<AxisDimensions> {
        if self.is_unset() {
            return None;
        }
        let (min, max) = (self.min as i64, self.max as i64);
        Some(AxisDimensions {
            min,
            max,
            mid: min + (max - min) / 2,
        })
    }

    fn include(&mut self, v: i64) {
        let v = v as f64;
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self::SENTINEL
    }
}

/// Accumulates pixels for one logical surface (walls, floor or a segment).
#[derive(Debug, Clone)]
pub struct PixelLayer {
    kind: LayerKind,
    segment_id: Option<u32>,
    name: String,
    pixels: Vec<Pixel>,
    active: bool,
    x_bounds: AxisBounds,
    y_bounds: AxisBounds,
}

impl PixelLayer {
    pub fn new(kind: LayerKind, segment_id: Option<u32>, name: impl Into<String>) -> Self {
        Self {
            kind,
            segment_id,
            name: name.into(),
            pixels: Vec::new(),
            active: false,
            x_bounds: AxisBounds::SENTINEL,
            y_bounds: AxisBounds::SENTINEL,
        }
    }

    pub fn wall() -> Self {
        Self::new(LayerKind::Wall, None, "")
    }

    pub fn floor() -> Self {
        Self::new(LayerKind::Floor, None, "")
    }

    pub fn segment(segment_id: u32) -> Self {
        Self::new(LayerKind::Segment, Some(segment_id), "")
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn segment_id(&self) -> Option<u32> {
        self.segment_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn x_bounds(&self) -> AxisBounds {
        self.x_bounds
    }

    pub fn y_bounds(&self) -> AxisBounds {
        self.y_bounds
    }

    /// Append a pixel. Duplicates are kept and nothing is checked against the canvas.
    pub fn add_pixel(&mut self, x: i64, y: i64) {
        self.pixels.push((x, y));
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Recompute both axes from scratch over every pixel.
    pub fn recompute_bounds(&mut self) {
        self.x_bounds = AxisBounds::SENTINEL;
        self.y_bounds = AxisBounds::SENTINEL;

        for &(x, y) in &self.pixels {
            self.x_bounds.include(x);
            self.y_bounds.include(y);
        }
    }

    /// Project into the exported layer value. Segment metadata is attached
    /// only when the layer belongs to a segment.
    pub fn to_layer_record(&self) -> MapLayer {
        let pixels = self.pixels.iter().flat_map(|&(x, y)| [x, y]).collect();

        let mut meta_data = LayerMetaData::default();
        if let Some(id) = self.segment_id {
            meta_data.segment_id = Some(id);
            meta_data.active = Some(self.active);
        }
        if !self.name.is_empty() {
            meta_data.name = Some(self.name.clone());
        }

        let dimensions = match (self.x_bounds.to_dimensions(), self.y_bounds.to_dimensions()) {
            (Some(x), Some(y)) => Some(LayerDimensions {
                x,
                y,
                pixel_count: self.pixels.len(),
            }),
            _ => None,
        };

        MapLayer {
            kind: self.kind,
            pixels,
            dimensions,
            meta_data,
        }
    }
}
