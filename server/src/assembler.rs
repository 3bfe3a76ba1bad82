use common::{MapLayer, PixelLayer};
use std::sync::Arc;

/// Segment layers keyed by id, iterated in first-creation order.
#[derive(Debug, Default)]
pub struct SegmentTable {
    layers: Vec<PixelLayer>,
}

impl SegmentTable {
    pub fn get(&self, segment_id: u32) -> Option<&PixelLayer> {
        self.layers.iter().find(|l| l.segment_id() == Some(segment_id))
    }

    /// The segment layer for `segment_id`, created on first use.
    pub fn get_or_insert(&mut self, segment_id: u32) -> &mut PixelLayer {
        let index = match self
            .layers
            .iter()
            .position(|l| l.segment_id() == Some(segment_id))
        {
            Some(index) => index,
            None => {
                self.layers.push(PixelLayer::segment(segment_id));
                self.layers.len() - 1
            }
        };
        &mut self.layers[index]
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.layers.iter().filter_map(|l| l.segment_id())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    fn iter(&self) -> impl Iterator<Item = &PixelLayer> {
        self.layers.iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut PixelLayer> {
        self.layers.iter_mut()
    }
}

/// Procedural room builder holding the wall, floor and segment layers.
pub struct MapAssembler {
    walls: PixelLayer,
    floor: PixelLayer,
    segments: SegmentTable,
    render_floor: bool,
    /// Exported layers, rebuilt only when the segment set changes.
    layers: Arc<[MapLayer]>,
}

impl MapAssembler {
    pub fn new(render_floor: bool) -> Self {
        Self {
            walls: PixelLayer::wall(),
            floor: PixelLayer::floor(),
            segments: SegmentTable::default(),
            render_floor,
            layers: Arc::from(Vec::new()),
        }
    }

    /// A fully enclosed `width` x `height` room with a one pixel wall border,
    /// its interior assigned to segment 0.
    pub fn enclosed_room(width: u32, height: u32, render_floor: bool) -> Self {
        let (w, h) = (i64::from(width), i64::from(height));
        let mut assembler = Self::new(render_floor);

        assembler.draw_horizontal_wall(0, 0, w + 2);
        assembler.draw_horizontal_wall(0, h + 2, w + 2);
        assembler.draw_vertical_wall(0, 1, h);
        assembler.draw_vertical_wall(w + 2, 1, h);
        assembler.fill_floor(1, 1, w, h, 0);

        assembler.rebuild_layer_cache();

        tracing::debug!(
            "Assembled {}x{} room: {} wall pixels, {} segment(s)",
            width,
            height,
            assembler.walls.pixels().len(),
            assembler.segments.len()
        );

        assembler
    }

    pub fn walls(&self) -> &PixelLayer {
        &self.walls
    }

    pub fn floor(&self) -> &PixelLayer {
        &self.floor
    }

    pub fn segments(&self) -> &SegmentTable {
        &self.segments
    }

    /// Writes `length + 1` pixels along row `y`, both endpoints included.
    pub fn draw_horizontal_wall(&mut self, x: i64, y: i64, length: i64) {
        for i in 0..=length {
            self.walls.add_pixel(x + i, y);
        }
    }

    /// Writes `length + 1` pixels along column `x`, both endpoints included.
    pub fn draw_vertical_wall(&mut self, x: i64, y: i64, length: i64) {
        for i in 0..=length {
            self.walls.add_pixel(x, y + i);
        }
    }

    /// Fills the inclusive rectangle `[x, x+w] x [y, y+h]` into the floor
    /// and into the given segment.
    pub fn fill_floor(&mut self, x: i64, y: i64, w: i64, h: i64, segment_id: u32) {
        let segment = self.segments.get_or_insert(segment_id);

        for ix in 0..=w {
            for iy in 0..=h {
                self.floor.add_pixel(x + ix, y + iy);
                segment.add_pixel(x + ix, y + iy);
            }
        }
    }

    /// Recompute bounds and re-export `[walls, segments..., floor?]`.
    pub fn rebuild_layer_cache(&mut self) -> Arc<[MapLayer]> {
        self.walls.recompute_bounds();
        self.floor.recompute_bounds();
        for layer in self.segments.iter_mut() {
            layer.recompute_bounds();
        }

        let mut layers = Vec::with_capacity(self.segments.len() + 2);
        layers.push(self.walls.to_layer_record());
        layers.extend(self.segments.iter().map(PixelLayer::to_layer_record));
        if self.render_floor {
            layers.push(self.floor.to_layer_record());
        }

        self.layers = Arc::from(layers);
        self.layers.clone()
    }

    /// The cached layer list as of the last rebuild.
    pub fn layers(&self) -> Arc<[MapLayer]> {
        self.layers.clone()
    }
}
