use std::any::Any;

use crate::arguments::ArgumentBundle;
use crate::diagnostics::RhythmError;
use crate::registry::LayerConfig;

use super::{Canvas, Color, LayerNode, Paint, Rect, SpecLayer};

pub const TOKEN: &str = "fill";

pub const DEFAULT_COLOR: Color = Color::from_argb(0x4000_91EA);

/// Paints the whole of its bounds with one color.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    color: Color,
}

impl Fill {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn from_arguments(args: &ArgumentBundle) -> Result<Self, RhythmError> {
        Ok(Self::new(args.get_color("color", DEFAULT_COLOR)?))
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl SpecLayer for Fill {
    fn draw(&self, canvas: &mut Canvas, bounds: Rect) {
        canvas.draw_rect(bounds, Paint::from_color(self.color));
    }

    fn layer_type(&self) -> &'static str {
        "Fill"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn inflate(config: &LayerConfig) -> anyhow::Result<LayerNode> {
    Ok(LayerNode::leaf(Fill::from_arguments(&config.arguments)?))
}
