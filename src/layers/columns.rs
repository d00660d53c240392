// Column and row groups: split the bounds into equal cells separated by a
// gutter and draw every child once per cell.

use std::any::Any;
use std::sync::Arc;

use crate::arguments::ArgumentBundle;
use crate::diagnostics::{missing_or_not_positive, RhythmError};
use crate::registry::LayerConfig;

use super::{draw_all, Canvas, LayerGroup, LayerNode, Rect, SpecLayer};

pub const COLUMNS_TOKEN: &str = "columns";
pub const ROWS_TOKEN: &str = "rows";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Cells side by side, split along the width.
    Columns,
    /// Cells stacked, split along the height.
    Rows,
}

impl Orientation {
    fn token(self) -> &'static str {
        match self {
            Orientation::Columns => COLUMNS_TOKEN,
            Orientation::Rows => ROWS_TOKEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Columns {
    orientation: Orientation,
    count: u32,
    gutter: i32,
    children: Vec<Arc<dyn SpecLayer>>,
}

impl Columns {
    pub fn from_arguments(
        orientation: Orientation,
        args: &ArgumentBundle,
    ) -> Result<Self, RhythmError> {
        let token = orientation.token();
        let count = args.get_int("count", 0)?;
        if count <= 0 {
            return Err(missing_or_not_positive(token, "count", "4"));
        }
        let gutter = args.get_dimension_pixel_size("gutter", 0)?;
        if gutter < 0 {
            return Err(missing_or_not_positive(token, "gutter", "16dp"));
        }
        Ok(Self {
            orientation,
            count: count as u32,
            gutter,
            children: Vec::new(),
        })
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn gutter(&self) -> i32 {
        self.gutter
    }

    /// Cell rectangles for `bounds`, first to last.
    pub fn cells(&self, bounds: Rect) -> Vec<Rect> {
        let count = self.count as f32;
        let gutter = self.gutter as f32;
        let total = match self.orientation {
            Orientation::Columns => bounds.width(),
            Orientation::Rows => bounds.height(),
        };
        let cell = ((total - gutter * (count - 1.0)) / count).max(0.0);
        (0..self.count)
            .map(|index| {
                let start = index as f32 * (cell + gutter);
                match self.orientation {
                    Orientation::Columns => Rect::from_ltrb(
                        bounds.left + start,
                        bounds.top,
                        bounds.left + start + cell,
                        bounds.bottom,
                    ),
                    Orientation::Rows => Rect::from_ltrb(
                        bounds.left,
                        bounds.top + start,
                        bounds.right,
                        bounds.top + start + cell,
                    ),
                }
            })
            .collect()
    }
}

impl SpecLayer for Columns {
    fn draw(&self, canvas: &mut Canvas, bounds: Rect) {
        for cell in self.cells(bounds) {
            canvas.save();
            canvas.clip_rect(cell);
            draw_all(&self.children, canvas, cell);
            canvas.restore();
        }
    }

    fn layer_type(&self) -> &'static str {
        match self.orientation {
            Orientation::Columns => "Columns",
            Orientation::Rows => "Rows",
        }
    }

    fn children(&self) -> &[Arc<dyn SpecLayer>] {
        &self.children
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl LayerGroup for Columns {
    fn add_layer(&mut self, layer: Arc<dyn SpecLayer>) {
        self.children.push(layer);
    }

    fn into_layer(self: Box<Self>) -> Arc<dyn SpecLayer> {
        Arc::new(*self)
    }
}

pub fn inflate_columns(config: &LayerConfig) -> anyhow::Result<LayerNode> {
    let columns = Columns::from_arguments(Orientation::Columns, &config.arguments)?;
    Ok(LayerNode::group(columns))
}

pub fn inflate_rows(config: &LayerConfig) -> anyhow::Result<LayerNode> {
    let rows = Columns::from_arguments(Orientation::Rows, &config.arguments)?;
    Ok(LayerNode::group(rows))
}
