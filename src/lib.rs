// Rhythm library entry point
// Compiles the Rhythm overlay language into trees of spec layers.

pub mod arguments;
pub mod diagnostics;
pub mod dimension;
pub mod gravity;
pub mod inflater;
pub mod layers;
pub mod overlay;
pub mod registry;
pub mod settings;
pub mod variables;

// Re-export commonly used types
pub use arguments::ArgumentBundle;
pub use diagnostics::{format_error, ErrorKind, RhythmError};
pub use dimension::{DimensionUnit, Length, Rounding, ScaleContext};
pub use gravity::{AxisGravity, EdgeAffinity, Gravity};
pub use inflater::Inflater;
pub use layers::{Canvas, Color, LayerGroup, LayerNode, Rect, SpecLayer};
pub use overlay::Overlay;
pub use registry::{FactoryRegistry, LayerConfig, LayerFactory};
pub use settings::RhythmConfig;
pub use variables::VariableScope;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> String {
    format!("rhythm v{}", VERSION)
}
