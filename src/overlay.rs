use std::sync::Arc;

use serde::Serialize;

use crate::layers::{Canvas, Rect, SpecLayer};

/// Root of one inflated block: an optional title and its top-level layers.
///
/// Layers are drawn in declaration order, so later ones paint over earlier
/// ones. An overlay is never mutated after the inflater hands it out.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    title: Option<String>,
    layers: Vec<Arc<dyn SpecLayer>>,
}

impl Overlay {
    pub(crate) fn new(title: Option<String>) -> Self {
        Self {
            title,
            layers: Vec::new(),
        }
    }

    pub(crate) fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    pub(crate) fn add_layer(&mut self, layer: Arc<dyn SpecLayer>) {
        self.layers.push(layer);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn layers(&self) -> &[Arc<dyn SpecLayer>] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn draw(&self, canvas: &mut Canvas, bounds: Rect) {
        for layer in &self.layers {
            layer.draw(canvas, bounds);
        }
    }

    /// Serializable outline of the layer tree.
    pub fn summary(&self) -> OverlaySummary {
        OverlaySummary {
            title: self.title.clone(),
            layers: self.layers.iter().map(|layer| LayerSummary::of(layer.as_ref())).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlaySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub layers: Vec<LayerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub layer_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayerSummary>,
}

impl LayerSummary {
    fn of(layer: &dyn SpecLayer) -> Self {
        Self {
            layer_type: layer.layer_type().to_string(),
            children: layer
                .children()
                .iter()
                .map(|child| LayerSummary::of(child.as_ref()))
                .collect(),
        }
    }

    /// Write this layer and its children as an indented outline.
    pub fn write_outline(&self, out: &mut String, depth: usize) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.layer_type);
        out.push('\n');
        for child in &self.children {
            child.write_outline(out, depth + 1);
        }
    }
}

impl OverlaySummary {
    pub fn outline(&self) -> String {
        let mut out = String::new();
        match &self.title {
            Some(title) => out.push_str(&format!("# {title}\n")),
            None => out.push_str("# (untitled)\n"),
        }
        for layer in &self.layers {
            layer.write_outline(&mut out, 1);
        }
        out
    }
}
