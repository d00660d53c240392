use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use strsim::levenshtein;
use tracing::trace;

use crate::arguments::ArgumentBundle;
use crate::diagnostics::{ErrorKind, RhythmError};
use crate::layers::{self, LayerNode, SpecLayer};

/// Maximum edit distance, as a percentage of the requested token's length,
/// for a known type to be suggested.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Resolved description of one layer line, handed to its factory.
///
/// Two configs are equal when their type and resolved arguments are equal;
/// the indent only matters to the inflater.
#[derive(Debug, Clone)]
pub struct LayerConfig {
    pub layer_type: String,
    pub indent: usize,
    pub arguments: ArgumentBundle,
}

impl LayerConfig {
    pub fn new(layer_type: impl Into<String>, indent: usize, arguments: ArgumentBundle) -> Self {
        Self {
            layer_type: layer_type.into(),
            indent,
            arguments,
        }
    }
}

impl PartialEq for LayerConfig {
    fn eq(&self, other: &Self) -> bool {
        self.layer_type == other.layer_type && self.arguments == other.arguments
    }
}

impl Eq for LayerConfig {}

impl Hash for LayerConfig {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.layer_type.hash(state);
        self.arguments.hash(state);
    }
}

/// Builds a layer from its config.
///
/// Factories report their own failures without a line number; the inflater
/// attaches it. Returning a [`RhythmError`] keeps its code, anything else is
/// reported as a generic inflation failure.
pub trait LayerFactory: Send + Sync {
    fn create(&self, config: &LayerConfig) -> anyhow::Result<LayerNode>;
}

impl<F> LayerFactory for F
where
    F: Fn(&LayerConfig) -> anyhow::Result<LayerNode> + Send + Sync,
{
    fn create(&self, config: &LayerConfig) -> anyhow::Result<LayerNode> {
        self(config)
    }
}

#[derive(Clone)]
enum Registration {
    Plain(Arc<dyn LayerFactory>),
    /// Leaf instances are memoized in the registry's [`LayerCache`].
    Cached(Arc<dyn LayerFactory>),
}

/// Instances built by cached factories, keyed by structural config equality.
#[derive(Debug, Default)]
pub struct LayerCache {
    layers: HashMap<LayerConfig, Arc<dyn SpecLayer>>,
}

impl LayerCache {
    /// Return the instance built for an equal config, or build and remember it.
    /// Groups pass through uncached.
    pub fn get_or_create(
        &mut self,
        factory: &dyn LayerFactory,
        config: &LayerConfig,
    ) -> anyhow::Result<LayerNode> {
        if let Some(layer) = self.layers.get(config) {
            trace!(layer_type = %config.layer_type, "reusing cached layer");
            return Ok(LayerNode::Leaf(Arc::clone(layer)));
        }
        let node = factory.create(config)?;
        if let LayerNode::Leaf(layer) = &node {
            self.layers.insert(config.clone(), Arc::clone(layer));
        }
        Ok(node)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }
}

/// Layer type tokens and the factories behind them.
///
/// The cache is owned per registry, so independent registries never share
/// instances. Creating layers needs `&mut self`; share one registry between
/// threads only behind your own lock.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: BTreeMap<String, Registration>,
    cache: LayerCache,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in layer type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_cached(layers::grid_lines::TOKEN, layers::grid_lines::inflate);
        registry.register_cached(layers::keyline::TOKEN, layers::keyline::inflate);
        registry.register_cached(layers::fill::TOKEN, layers::fill::inflate);
        registry.register(layers::inset::TOKEN, layers::inset::inflate);
        registry.register(layers::columns::COLUMNS_TOKEN, layers::columns::inflate_columns);
        registry.register(layers::columns::ROWS_TOKEN, layers::columns::inflate_rows);
        registry.register(
            layers::dimensions_label::TOKEN,
            layers::dimensions_label::inflate,
        );
        registry.register(layers::ratio_keyline::TOKEN, layers::ratio_keyline::inflate);
        let _ = registry.alias(layers::keyline::TOKEN, layers::keyline::GUIDE_TOKEN);
        registry
    }

    pub fn register(&mut self, token: impl Into<String>, factory: impl LayerFactory + 'static) {
        self.factories
            .insert(token.into(), Registration::Plain(Arc::new(factory)));
    }

    /// Register a factory whose leaf layers are safe to share between overlays.
    pub fn register_cached(
        &mut self,
        token: impl Into<String>,
        factory: impl LayerFactory + 'static,
    ) {
        self.factories
            .insert(token.into(), Registration::Cached(Arc::new(factory)));
    }

    /// Make `new_token` inflate exactly like `existing`.
    pub fn alias(&mut self, existing: &str, new_token: impl Into<String>) -> Result<(), RhythmError> {
        let registration = self
            .factories
            .get(existing)
            .cloned()
            .ok_or_else(|| self.unknown_type(existing))?;
        self.factories.insert(new_token.into(), registration);
        Ok(())
    }

    pub fn resolve(&self, token: &str) -> Result<Arc<dyn LayerFactory>, RhythmError> {
        match self.factories.get(token) {
            Some(Registration::Plain(factory) | Registration::Cached(factory)) => {
                Ok(Arc::clone(factory))
            }
            None => Err(self.unknown_type(token)),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.factories.contains_key(token)
    }

    pub fn is_cached(&self, token: &str) -> bool {
        matches!(self.factories.get(token), Some(Registration::Cached(_)))
    }

    /// Registered tokens in sorted order.
    pub fn known_types(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Build the layer `config` describes through its registered factory.
    ///
    /// The outer error is a lookup failure; the inner one is whatever the
    /// factory raised.
    pub fn create(
        &mut self,
        config: &LayerConfig,
    ) -> Result<anyhow::Result<LayerNode>, RhythmError> {
        match self.factories.get(&config.layer_type) {
            Some(Registration::Plain(factory)) => Ok(factory.create(config)),
            Some(Registration::Cached(factory)) => {
                let factory = Arc::clone(factory);
                Ok(self.cache.get_or_create(factory.as_ref(), config))
            }
            None => Err(self.unknown_type(&config.layer_type)),
        }
    }

    pub fn cache(&self) -> &LayerCache {
        &self.cache
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    fn unknown_type(&self, token: &str) -> RhythmError {
        RhythmError::new(ErrorKind::UnknownLayerType {
            layer_type: token.to_string(),
            known: self.known_types(),
            suggestions: self.similar_types(token),
        })
    }

    fn similar_types(&self, target: &str) -> Vec<String> {
        let mut scored: Vec<_> = self
            .factories
            .keys()
            .map(|known| (known.clone(), levenshtein(target, known)))
            .collect();
        scored.sort_by_key(|(_, dist)| *dist);
        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(known, _)| known)
            .collect()
    }
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("known_types", &self.known_types())
            .field("cached_layers", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::ScaleContext;
    use crate::layers::{Canvas, Fill, Rect};

    fn fill_config(color: &str) -> LayerConfig {
        let args = ArgumentBundle::from_pairs(ScaleContext::default(), [("color", Some(color))]);
        LayerConfig::new("fill", 0, args)
    }

    fn leaf(node: LayerNode) -> Arc<dyn SpecLayer> {
        match node {
            LayerNode::Leaf(layer) => layer,
            LayerNode::Group(_) => panic!("expected a leaf"),
        }
    }

    #[test]
    fn equal_configs_share_one_instance() {
        let mut registry = FactoryRegistry::with_builtins();
        let a = leaf(registry.create(&fill_config("#FF0000")).unwrap().unwrap());
        let b = leaf(registry.create(&fill_config("#FF0000")).unwrap().unwrap());
        let c = leaf(registry.create(&fill_config("#00FF00")).unwrap().unwrap());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.cache().len(), 2);
    }

    #[test]
    fn config_equality_ignores_indent() {
        let mut a = fill_config("#FF0000");
        let b = fill_config("#FF0000");
        a.indent = 4;
        assert_eq!(a, b);
    }

    #[test]
    fn registries_do_not_share_caches() {
        let mut first = FactoryRegistry::with_builtins();
        let mut second = FactoryRegistry::with_builtins();
        let a = leaf(first.create(&fill_config("#FF0000")).unwrap().unwrap());
        let b = leaf(second.create(&fill_config("#FF0000")).unwrap().unwrap());
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn plain_factories_build_fresh_instances() {
        let mut registry = FactoryRegistry::new();
        registry.register("fill", crate::layers::fill::inflate);
        let a = leaf(registry.create(&fill_config("#FF0000")).unwrap().unwrap());
        let b = leaf(registry.create(&fill_config("#FF0000")).unwrap().unwrap());
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(registry.cache().is_empty());
    }

    #[test]
    fn groups_are_never_cached() {
        let mut registry = FactoryRegistry::new();
        registry.register_cached("inset", crate::layers::inset::inflate);
        let config = LayerConfig::new("inset", 0, ArgumentBundle::new(ScaleContext::default()));
        assert!(registry.create(&config).unwrap().unwrap().is_group());
        assert!(registry.cache().is_empty());
    }

    #[test]
    fn alias_requires_existing_token() {
        let mut registry = FactoryRegistry::with_builtins();
        assert!(registry.contains("guide"));
        assert!(registry.is_cached("guide"));
        let err = registry.alias("nope", "other").unwrap_err();
        assert_eq!(err.code(), 130);
        registry.alias("fill", "paint").unwrap();
        assert!(registry.resolve("paint").is_ok());
    }

    #[test]
    fn unknown_type_lists_known_and_similar() {
        let registry = FactoryRegistry::with_builtins();
        let err = registry.resolve("gird-lines").err().unwrap();
        match err.kind() {
            ErrorKind::UnknownLayerType {
                known, suggestions, ..
            } => {
                assert_eq!(known, &registry.known_types());
                assert_eq!(suggestions.first().map(String::as_str), Some("grid-lines"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn closures_are_factories() {
        let mut registry = FactoryRegistry::new();
        registry.register("solid", |_config: &LayerConfig| -> anyhow::Result<LayerNode> {
            Ok(LayerNode::leaf(Fill::new(crate::layers::Color::WHITE)))
        });
        let config = LayerConfig::new("solid", 0, ArgumentBundle::new(ScaleContext::default()));
        let layer = leaf(registry.create(&config).unwrap().unwrap());
        let mut canvas = Canvas::new();
        layer.draw(&mut canvas, Rect::from_size(4.0, 4.0));
        assert_eq!(canvas.rects(), vec![Rect::from_size(4.0, 4.0)]);
    }
}
