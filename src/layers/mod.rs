// Spec layers: the immutable, self-drawing units an overlay is made of.
//
// Leaf layers are shared behind `Arc` once built. Groups (inset, columns)
// are only mutable while the inflater still has them open; popping them off
// the indentation stack freezes them into an `Arc` like any other layer.

pub mod canvas;
pub mod columns;
pub mod dimensions_label;
pub mod fill;
pub mod geometry;
pub mod grid_lines;
pub mod inset;
pub mod keyline;
pub mod ratio_keyline;

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

pub use canvas::{Canvas, Color, DrawCommand, Paint, TextStyle};
pub use columns::{Columns, Orientation};
pub use dimensions_label::DimensionsLabel;
pub use fill::Fill;
pub use geometry::{Offset, Rect};
pub use grid_lines::GridLines;
pub use inset::Inset;
pub use keyline::Keyline;
pub use ratio_keyline::RatioKeyline;

/// A configured overlay element that knows how to draw itself.
pub trait SpecLayer: Debug + Send + Sync + Any {
    /// Draw into `bounds`, the area the enclosing group hands down.
    fn draw(&self, canvas: &mut Canvas, bounds: Rect);

    /// Type name for debugging and tree dumps
    fn layer_type(&self) -> &'static str;

    /// Nested layers of a group, empty for leaves.
    fn children(&self) -> &[Arc<dyn SpecLayer>] {
        &[]
    }

    fn as_any(&self) -> &dyn Any;
}

/// A spec layer that owns nested layers while it is being inflated.
pub trait LayerGroup: SpecLayer {
    fn add_layer(&mut self, layer: Arc<dyn SpecLayer>);

    /// Freeze the group once all of its children are attached.
    fn into_layer(self: Box<Self>) -> Arc<dyn SpecLayer>;
}

/// What a factory hands back to the inflater.
#[derive(Debug)]
pub enum LayerNode {
    Leaf(Arc<dyn SpecLayer>),
    Group(Box<dyn LayerGroup>),
}

impl LayerNode {
    pub fn leaf(layer: impl SpecLayer) -> Self {
        LayerNode::Leaf(Arc::new(layer))
    }

    pub fn group(group: impl LayerGroup) -> Self {
        LayerNode::Group(Box::new(group))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, LayerNode::Group(_))
    }
}

/// Draw `children` in order, later ones over earlier ones.
pub(crate) fn draw_all(children: &[Arc<dyn SpecLayer>], canvas: &mut Canvas, bounds: Rect) {
    for child in children {
        child.draw(canvas, bounds);
    }
}

/// Downcast a shared layer to its concrete type.
pub fn downcast<T: SpecLayer>(layer: &Arc<dyn SpecLayer>) -> Option<&T> {
    layer.as_any().downcast_ref::<T>()
}
