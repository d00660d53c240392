// Indentation stack that turns a flat run of layer lines into a tree.
//
// The bottom frame is the overlay at indent -1 and is never popped. Every
// other frame is an open group. A group is frozen and attached to the frame
// below it when it is popped, which keeps sibling order intact because a
// later sibling always pops it first.

use std::sync::Arc;

use tracing::trace;

use crate::layers::{LayerGroup, LayerNode, SpecLayer};
use crate::overlay::Overlay;

enum Parent {
    Overlay(Overlay),
    Group(Box<dyn LayerGroup>),
}

impl Parent {
    fn add_layer(&mut self, layer: Arc<dyn SpecLayer>) {
        match self {
            Parent::Overlay(overlay) => overlay.add_layer(layer),
            Parent::Group(group) => group.add_layer(layer),
        }
    }
}

struct Frame {
    indent: isize,
    parent: Parent,
}

pub(crate) struct IndentStack {
    frames: Vec<Frame>,
}

impl IndentStack {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![Frame {
                indent: -1,
                parent: Parent::Overlay(Overlay::new(None)),
            }],
        }
    }

    /// Open groups, not counting the overlay.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Attach a layer declared at `indent` to the nearest open parent with a
    /// strictly smaller indent. Groups stay open for deeper lines.
    pub(crate) fn attach(&mut self, indent: usize, node: LayerNode) {
        let indent = indent as isize;
        self.pop_frames(indent);
        match node {
            LayerNode::Leaf(layer) => self.top_mut().add_layer(layer),
            LayerNode::Group(group) => {
                trace!(layer_type = group.layer_type(), indent, "opening group");
                self.frames.push(Frame {
                    indent,
                    parent: Parent::Group(group),
                });
            }
        }
    }

    /// Close every open group and hand back the finished overlay.
    pub(crate) fn finish(mut self, title: Option<String>) -> Overlay {
        self.pop_frames(isize::MIN);
        let mut overlay = match self.frames.pop() {
            Some(Frame {
                parent: Parent::Overlay(overlay),
                ..
            }) => overlay,
            _ => Overlay::default(),
        };
        overlay.set_title(title);
        overlay
    }

    fn pop_frames(&mut self, indent: isize) {
        while self.frames.len() > 1 {
            let top = self.frames.len() - 1;
            if indent > self.frames[top].indent {
                break;
            }
            if let Some(Frame {
                parent: Parent::Group(group),
                ..
            }) = self.frames.pop()
            {
                let layer = group.into_layer();
                self.top_mut().add_layer(layer);
            }
        }
    }

    fn top_mut(&mut self) -> &mut Parent {
        let top = self.frames.len() - 1;
        &mut self.frames[top].parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::ArgumentBundle;
    use crate::dimension::ScaleContext;
    use crate::layers::{Color, Fill, Inset};

    fn inset() -> LayerNode {
        let args = ArgumentBundle::new(ScaleContext::default());
        LayerNode::group(Inset::from_arguments(&args).unwrap())
    }

    fn fill() -> LayerNode {
        LayerNode::leaf(Fill::new(Color::BLACK))
    }

    #[test]
    fn deeper_lines_nest_and_equal_lines_are_siblings() {
        let mut stack = IndentStack::new();
        stack.attach(0, inset());
        stack.attach(1, fill());
        stack.attach(1, inset());
        stack.attach(3, fill());
        assert_eq!(stack.depth(), 2);
        stack.attach(0, fill());
        assert_eq!(stack.depth(), 0);
        let overlay = stack.finish(None);

        let layers = overlay.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].layer_type(), "Inset");
        assert_eq!(layers[1].layer_type(), "Fill");
        let children = layers[0].children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].layer_type(), "Fill");
        assert_eq!(children[1].children().len(), 1);
    }

    #[test]
    fn leaf_never_takes_children() {
        let mut stack = IndentStack::new();
        stack.attach(0, fill());
        stack.attach(2, fill());
        let overlay = stack.finish(Some("Flat".to_string()));
        assert_eq!(overlay.layers().len(), 2);
        assert_eq!(overlay.title(), Some("Flat"));
    }

    #[test]
    fn open_groups_close_on_finish() {
        let mut stack = IndentStack::new();
        stack.attach(4, inset());
        stack.attach(8, inset());
        stack.attach(12, fill());
        let overlay = stack.finish(None);
        assert_eq!(overlay.layers().len(), 1);
        assert_eq!(overlay.layers()[0].children()[0].children().len(), 1);
    }
}
