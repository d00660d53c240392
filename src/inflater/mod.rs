// Compiles Rhythm documents into overlays.

pub mod lines;

mod hierarchy;

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::diagnostics::{ErrorKind, RhythmError};
use crate::dimension::ScaleContext;
use crate::layers::LayerNode;
use crate::overlay::Overlay;
use crate::registry::{FactoryRegistry, LayerConfig};
use crate::variables::VariableScope;

use hierarchy::IndentStack;
use lines::LineKind;

/// Where a block stands in its title, variables, layers sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Start,
    Title,
    Variables,
    Layers,
}

/// Turns document text into overlays using one factory registry.
///
/// Every inflate call borrows the inflater mutably because cached factories
/// write to the registry's cache.
#[derive(Debug)]
pub struct Inflater {
    registry: FactoryRegistry,
    scale: ScaleContext,
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new(ScaleContext::default())
    }
}

impl Inflater {
    /// Inflater with every built-in layer type registered.
    pub fn new(scale: ScaleContext) -> Self {
        Self::with_registry(FactoryRegistry::with_builtins(), scale)
    }

    pub fn with_registry(registry: FactoryRegistry, scale: ScaleContext) -> Self {
        Self { registry, scale }
    }

    pub fn scale(&self) -> &ScaleContext {
        &self.scale
    }

    pub fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FactoryRegistry {
        &mut self.registry
    }

    pub fn inflate_str(&mut self, text: &str) -> Result<Vec<Overlay>, RhythmError> {
        let lines: Vec<&str> = text.lines().collect();
        self.inflate_document(&lines)
    }

    /// Inflate every block of a document, one overlay per block.
    ///
    /// Nothing is returned unless every block inflates.
    pub fn inflate_document<S: AsRef<str>>(
        &mut self,
        lines: &[S],
    ) -> Result<Vec<Overlay>, RhythmError> {
        let document = lines::split_document(lines)?;
        debug!(
            globals = document.globals.len(),
            blocks = document.blocks.len(),
            "inflating document"
        );
        document
            .blocks
            .iter()
            .map(|block| self.inflate_block(&block.lines, block.start, &document.globals))
            .collect()
    }

    /// Inflate `lines` as a single block starting at document line 1.
    pub fn inflate_overlay<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        vars: &VariableScope,
    ) -> Result<Overlay, RhythmError> {
        self.inflate_block(lines, 1, vars)
    }

    /// Parse one layer line without building it.
    pub fn parse_layer_line(
        &self,
        line: &str,
        line_no: usize,
        vars: &VariableScope,
    ) -> Result<LayerConfig, RhythmError> {
        lines::parse_layer_line(line, line_no, vars, &self.scale)
    }

    fn inflate_block<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        start: usize,
        globals: &VariableScope,
    ) -> Result<Overlay, RhythmError> {
        // Local declarations clone the globals on first write only.
        let mut scope = Cow::Borrowed(globals);
        let mut stack = IndentStack::new();
        let mut title = None;
        let mut section = Section::Start;
        let mut has_title = false;

        for (offset, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let line_no = start + offset;
            match lines::classify(line) {
                LineKind::Blank | LineKind::Comment => {}
                LineKind::Title => {
                    if section != Section::Start {
                        return Err(
                            RhythmError::new(ErrorKind::UnexpectedTitleDeclaration).at_line(line_no)
                        );
                    }
                    title = lines::parse_title(line);
                    has_title = true;
                    section = Section::Title;
                }
                LineKind::Variable => {
                    if section == Section::Layers {
                        return Err(RhythmError::new(ErrorKind::UnexpectedVariableDeclaration)
                            .at_line(line_no));
                    }
                    scope.to_mut().declare_line(line, line_no)?;
                    section = Section::Variables;
                }
                LineKind::Layer => {
                    let config = self.parse_layer_line(line, line_no, &scope)?;
                    let node = self.create_layer(&config, line_no)?;
                    stack.attach(config.indent, node);
                    trace!(line = line_no, depth = stack.depth(), "attached layer");
                    section = Section::Layers;
                }
            }
        }

        if section == Section::Variables && !has_title {
            return Err(RhythmError::new(ErrorKind::UnexpectedVariableDeclaration).at_line(start));
        }
        let overlay = stack.finish(title);
        debug!(
            start,
            title = overlay.title().unwrap_or(""),
            layers = overlay.layers().len(),
            "inflated overlay"
        );
        Ok(overlay)
    }

    fn create_layer(&mut self, config: &LayerConfig, line_no: usize) -> Result<LayerNode, RhythmError> {
        let built = self
            .registry
            .create(config)
            .map_err(|err| err.at_line(line_no))?;
        built.map_err(|err| match err.downcast::<RhythmError>() {
            Ok(typed) => typed.with_line(line_no),
            Err(other) => RhythmError::new(ErrorKind::InflatingLayerGeneric {
                layer_type: config.layer_type.clone(),
                message: format!("{other:#}"),
            })
            .at_line(line_no),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Length;
    use crate::layers::{downcast, Keyline};

    #[test]
    fn title_then_locals_then_layers() {
        let mut inflater = Inflater::default();
        let overlay = inflater
            .inflate_overlay(&["#Local", "@d=12px", "keyline from=left distance=@d"], &VariableScope::new())
            .unwrap();
        assert_eq!(overlay.title(), Some("Local"));
        let keyline = downcast::<Keyline>(&overlay.layers()[0]).unwrap();
        assert_eq!(keyline.distance(), Length::Pixels(12.0));
    }

    #[test]
    fn ordering_violations() {
        let mut inflater = Inflater::default();
        let vars = VariableScope::new();

        let err = inflater.inflate_overlay(&["fill", "@late=1"], &vars).unwrap_err();
        assert_eq!((err.code(), err.line()), (110, Some(2)));

        let err = inflater.inflate_overlay(&["@a=1", "#Title", "fill"], &vars).unwrap_err();
        assert_eq!((err.code(), err.line()), (111, Some(2)));

        let err = inflater.inflate_overlay(&["#One", "#Two"], &vars).unwrap_err();
        assert_eq!((err.code(), err.line()), (111, Some(2)));

        let err = inflater.inflate_overlay(&["fill", "#Late"], &vars).unwrap_err();
        assert_eq!(err.code(), 111);
    }

    #[test]
    fn variables_only_block() {
        let mut inflater = Inflater::default();
        let err = inflater
            .inflate_str("fill\n\n// stray\n@a=1\n@b=2\n")
            .unwrap_err();
        assert_eq!((err.code(), err.line()), (110, Some(3)));

        let overlays = inflater.inflate_str("#Named\n@a=1\n").unwrap();
        assert_eq!(overlays[0].title(), Some("Named"));
        assert!(overlays[0].is_empty());
    }

    #[test]
    fn locals_do_not_leak_between_blocks() {
        let mut inflater = Inflater::default();
        let err = inflater
            .inflate_str("@c=#FF0000\n\nfill color=@c\n\n@c2=#00FF00\nfill color=@c2\n\nfill color=@c2\n")
            .unwrap_err();
        assert_eq!((err.code(), err.line()), (120, Some(8)));
    }

    #[test]
    fn foreign_factory_errors_are_wrapped() {
        let mut inflater = Inflater::default();
        inflater.registry_mut().register(
            "broken",
            |_: &LayerConfig| -> anyhow::Result<LayerNode> { anyhow::bail!("no surface") },
        );
        let err = inflater.inflate_str("fill\nbroken\n").unwrap_err();
        assert_eq!(err.code(), 140);
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.args(), vec!["broken", "no surface"]);
    }

    #[test]
    fn typed_factory_errors_keep_their_code() {
        let mut inflater = Inflater::default();
        let err = inflater.inflate_str("\n\nkeyline from=top\n").unwrap_err();
        assert_eq!((err.code(), err.line()), (150, Some(3)));
    }
}
