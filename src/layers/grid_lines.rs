// Repeating lines at a fixed step, anchored to one edge of the bounds.

use std::any::Any;

use crate::arguments::ArgumentBundle;
use crate::diagnostics::{missing_or_not_one_of, missing_or_not_positive, RhythmError};
use crate::dimension::{Length, Rounding};
use crate::gravity::EdgeAffinity;
use crate::registry::LayerConfig;

use super::{Canvas, Color, LayerNode, Paint, Rect, SpecLayer};

pub const TOKEN: &str = "grid-lines";

pub const DEFAULT_COLOR: Color = Color::from_argb(0x60F4_4336);

#[derive(Debug, Clone, PartialEq)]
pub struct GridLines {
    edge: EdgeAffinity,
    step: i32,
    thickness: i32,
    offset: Length,
    limit: Option<u32>,
    color: Color,
}

impl GridLines {
    /// Arguments: `from` and a positive `step` are required; `thickness`,
    /// `offset`, `limit` and `color` are optional.
    pub fn from_arguments(args: &ArgumentBundle) -> Result<Self, RhythmError> {
        let edge = args
            .get_edge_affinity("from", None)
            .ok_or_else(|| missing_or_not_one_of(TOKEN, "from", EdgeAffinity::TOKENS))?;
        let step = args.get_dimension_pixel_size("step", 0)?;
        if step <= 0 {
            return Err(missing_or_not_positive(TOKEN, "step", "8dp"));
        }
        let thickness = args.get_dimension_pixel_size("thickness", 1)?;
        if thickness <= 0 {
            return Err(missing_or_not_positive(TOKEN, "thickness", "1px"));
        }
        let limit = match args.get_int("limit", -1)? {
            -1 => None,
            limit if limit > 0 => Some(limit as u32),
            _ => return Err(missing_or_not_positive(TOKEN, "limit", "4")),
        };
        Ok(Self {
            edge,
            step,
            thickness,
            offset: args
                .get_length("offset", Rounding::Offset)?
                .unwrap_or(Length::Pixels(0.0)),
            limit,
            color: args.get_color("color", DEFAULT_COLOR)?,
        })
    }

    pub fn edge(&self) -> EdgeAffinity {
        self.edge
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    pub fn thickness(&self) -> i32 {
        self.thickness
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }
}

impl SpecLayer for GridLines {
    fn draw(&self, canvas: &mut Canvas, bounds: Rect) {
        let extent = if self.edge.is_vertical() {
            bounds.height()
        } else {
            bounds.width()
        };
        let offset = self.offset.resolve(extent);
        let step = self.step as f32;
        let thickness = self.thickness as f32;
        let max_lines = self.limit.unwrap_or(u32::MAX);
        let mut drawn = 0;
        // The edge itself is not a grid line; the first line sits one step in.
        let mut distance = offset + step;
        while distance < extent && drawn < max_lines {
            let rect = match self.edge {
                EdgeAffinity::Top => Rect::from_ltrb(
                    bounds.left,
                    bounds.top + distance,
                    bounds.right,
                    bounds.top + distance + thickness,
                ),
                EdgeAffinity::Bottom => Rect::from_ltrb(
                    bounds.left,
                    bounds.bottom - distance - thickness,
                    bounds.right,
                    bounds.bottom - distance,
                ),
                EdgeAffinity::Left => Rect::from_ltrb(
                    bounds.left + distance,
                    bounds.top,
                    bounds.left + distance + thickness,
                    bounds.bottom,
                ),
                EdgeAffinity::Right => Rect::from_ltrb(
                    bounds.right - distance - thickness,
                    bounds.top,
                    bounds.right - distance,
                    bounds.bottom,
                ),
            };
            canvas.draw_rect(rect, Paint::from_color(self.color));
            drawn += 1;
            distance += step;
        }
    }

    fn layer_type(&self) -> &'static str {
        "GridLines"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn inflate(config: &LayerConfig) -> anyhow::Result<LayerNode> {
    Ok(LayerNode::leaf(GridLines::from_arguments(&config.arguments)?))
}
