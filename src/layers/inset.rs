// Inset group: shrinks the bounds handed to its children and clips them.

use std::any::Any;
use std::sync::Arc;

use crate::arguments::ArgumentBundle;
use crate::diagnostics::RhythmError;
use crate::dimension::{Length, Rounding};
use crate::gravity::{AxisGravity, Gravity};
use crate::registry::LayerConfig;

use super::{draw_all, Canvas, LayerGroup, LayerNode, Rect, SpecLayer};

pub const TOKEN: &str = "inset";

/// Insets along one axis: the near and far margins and an optional extent.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisInset {
    near: Option<Length>,
    far: Option<Length>,
    extent: Option<Length>,
}

impl AxisInset {
    /// Default placement when an explicit extent is given: hug whichever side
    /// has a margin, preferring the near one.
    fn implied_gravity(&self) -> AxisGravity {
        if self.near.is_none() && self.far.is_some() {
            AxisGravity::End
        } else {
            AxisGravity::Start
        }
    }

    fn apply(&self, start: f32, end: f32, gravity: AxisGravity) -> (f32, f32) {
        let total = end - start;
        let near = self.near.map_or(0.0, |len| len.resolve(total));
        let far = self.far.map_or(0.0, |len| len.resolve(total));
        let Some(extent) = self.extent.map(|len| len.resolve(total)) else {
            return (start + near, end - far);
        };
        match gravity {
            AxisGravity::Start | AxisGravity::Fill => (start + near, start + near + extent),
            AxisGravity::End => (end - far - extent, end - far),
            AxisGravity::Center => {
                let center = (start + near + end - far) / 2.0;
                (center - extent / 2.0, center + extent / 2.0)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Inset {
    horizontal: AxisInset,
    vertical: AxisInset,
    gravity: Gravity,
    clip: bool,
    children: Vec<Arc<dyn SpecLayer>>,
}

impl Inset {
    /// Percent margins and sizes are taken of the bounds this inset is drawn in.
    pub fn from_arguments(args: &ArgumentBundle) -> Result<Self, RhythmError> {
        let horizontal = AxisInset {
            near: args.get_length("left", Rounding::Offset)?,
            far: args.get_length("right", Rounding::Offset)?,
            extent: args.get_length("width", Rounding::Size)?,
        };
        let vertical = AxisInset {
            near: args.get_length("top", Rounding::Offset)?,
            far: args.get_length("bottom", Rounding::Offset)?,
            extent: args.get_length("height", Rounding::Size)?,
        };
        let implied = Gravity::new(horizontal.implied_gravity(), vertical.implied_gravity());
        Ok(Self {
            horizontal,
            vertical,
            gravity: args.get_gravity("gravity", implied),
            clip: !args.get_bool("no-clip", false, true)?,
            children: Vec::new(),
        })
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn clips(&self) -> bool {
        self.clip
    }

    /// Bounds handed to the children when drawn inside `bounds`.
    pub fn inner_bounds(&self, bounds: Rect) -> Rect {
        let (left, right) = self
            .horizontal
            .apply(bounds.left, bounds.right, self.gravity.horizontal);
        let (top, bottom) = self
            .vertical
            .apply(bounds.top, bounds.bottom, self.gravity.vertical);
        Rect::from_ltrb(left, top, right, bottom)
    }
}

impl SpecLayer for Inset {
    fn draw(&self, canvas: &mut Canvas, bounds: Rect) {
        let inner = self.inner_bounds(bounds);
        canvas.save();
        if self.clip {
            canvas.clip_rect(inner);
        }
        draw_all(&self.children, canvas, inner);
        canvas.restore();
    }

    fn layer_type(&self) -> &'static str {
        "Inset"
    }

    fn children(&self) -> &[Arc<dyn SpecLayer>] {
        &self.children
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl LayerGroup for Inset {
    fn add_layer(&mut self, layer: Arc<dyn SpecLayer>) {
        self.children.push(layer);
    }

    fn into_layer(self: Box<Self>) -> Arc<dyn SpecLayer> {
        Arc::new(*self)
    }
}

pub fn inflate(config: &LayerConfig) -> anyhow::Result<LayerNode> {
    Ok(LayerNode::group(Inset::from_arguments(&config.arguments)?))
}
