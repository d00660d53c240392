// Keyline placed where a box of a given aspect ratio, spanning the bounds
// and anchored to one edge, would end.

use std::any::Any;

use crate::arguments::ArgumentBundle;
use crate::diagnostics::{missing_or_not_one_of, missing_or_not_positive, missing_or_wrong_type, RhythmError};
use crate::gravity::EdgeAffinity;
use crate::registry::LayerConfig;

use super::keyline::line_rect;
use super::{Canvas, Color, LayerNode, Paint, Rect, SpecLayer};

pub const TOKEN: &str = "ratio-keyline";

pub const DEFAULT_COLOR: Color = Color::from_argb(0x8000_91EA);

#[derive(Debug, Clone, PartialEq)]
pub struct RatioKeyline {
    width_ratio: f32,
    height_ratio: f32,
    edge: EdgeAffinity,
    thickness: i32,
    color: Color,
}

fn parse_ratio(raw: &str) -> Option<(f32, f32)> {
    let (width, height) = raw.split_once(':')?;
    let width: f32 = width.trim().parse().ok()?;
    let height: f32 = height.trim().parse().ok()?;
    (width > 0.0 && height > 0.0).then_some((width, height))
}

impl RatioKeyline {
    pub fn from_arguments(args: &ArgumentBundle) -> Result<Self, RhythmError> {
        let (width_ratio, height_ratio) = args
            .get_string("ratio")
            .and_then(parse_ratio)
            .ok_or_else(|| missing_or_wrong_type(TOKEN, "ratio", "16:9"))?;
        let edge = args
            .get_edge_affinity("from", None)
            .ok_or_else(|| missing_or_not_one_of(TOKEN, "from", EdgeAffinity::TOKENS))?;
        let thickness = args.get_dimension_pixel_size("thickness", 1)?;
        if thickness <= 0 {
            return Err(missing_or_not_positive(TOKEN, "thickness", "1dp"));
        }
        Ok(Self {
            width_ratio,
            height_ratio,
            edge,
            thickness,
            color: args.get_color("color", DEFAULT_COLOR)?,
        })
    }

    pub fn ratio(&self) -> (f32, f32) {
        (self.width_ratio, self.height_ratio)
    }

    pub fn edge(&self) -> EdgeAffinity {
        self.edge
    }

    /// Distance of the line from its edge when drawn in `bounds`.
    pub fn distance(&self, bounds: Rect) -> f32 {
        if self.edge.is_vertical() {
            bounds.width() * self.height_ratio / self.width_ratio
        } else {
            bounds.height() * self.width_ratio / self.height_ratio
        }
    }
}

impl SpecLayer for RatioKeyline {
    fn draw(&self, canvas: &mut Canvas, bounds: Rect) {
        let rect = line_rect(
            bounds,
            self.edge,
            self.distance(bounds).trunc(),
            self.thickness as f32,
            false,
        );
        canvas.draw_rect(rect, Paint::from_color(self.color));
    }

    fn layer_type(&self) -> &'static str {
        "RatioKeyline"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn inflate(config: &LayerConfig) -> anyhow::Result<LayerNode> {
    Ok(LayerNode::leaf(RatioKeyline::from_arguments(&config.arguments)?))
}
