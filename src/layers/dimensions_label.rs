use std::any::Any;

use crate::arguments::ArgumentBundle;
use crate::diagnostics::{missing_or_not_one_of, missing_or_not_positive, RhythmError};
use crate::dimension::{self, DimensionUnit};
use crate::gravity::{AxisGravity, Gravity};
use crate::registry::LayerConfig;

use super::{Canvas, Color, LayerNode, Offset, Rect, SpecLayer, TextStyle};

pub const TOKEN: &str = "dimensions-label";

pub const DEFAULT_COLOR: Color = Color::from_argb(0xFF00_0000);

const UNIT_TOKENS: &[&str] = &["dp", "px"];

/// Prints the size of its bounds, e.g. `360×640 dp`, anchored by gravity.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionsLabel {
    color: Color,
    text_size: f32,
    gravity: Gravity,
    units: DimensionUnit,
    density: f32,
}

impl DimensionsLabel {
    pub fn from_arguments(args: &ArgumentBundle) -> Result<Self, RhythmError> {
        let units = match args.get_string("units") {
            None | Some("dp") => DimensionUnit::Dp,
            Some("px") => DimensionUnit::Px,
            Some(_) => return Err(missing_or_not_one_of(TOKEN, "units", UNIT_TOKENS)),
        };
        let default_size = DimensionUnit::Sp.apply(12.0, args.scale());
        let text_size = args.get_dimension_pixel_exact("text-size", default_size)?;
        if text_size <= 0.0 {
            return Err(missing_or_not_positive(TOKEN, "text-size", "12sp"));
        }
        Ok(Self {
            color: args.get_color("color", DEFAULT_COLOR)?,
            text_size,
            gravity: args.get_gravity("gravity", Gravity::BOTTOM_RIGHT),
            units,
            density: args.scale().density,
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    pub fn gravity(&self) -> Gravity {
        self.gravity
    }

    pub fn units(&self) -> DimensionUnit {
        self.units
    }

    /// Label text for bounds of the given pixel size.
    pub fn label(&self, bounds: Rect) -> String {
        let (width, height, suffix) = match self.units {
            DimensionUnit::Px => (bounds.width(), bounds.height(), "px"),
            _ => (bounds.width() / self.density, bounds.height() / self.density, "dp"),
        };
        format!(
            "{}\u{d7}{} {suffix}",
            dimension::to_offset(width.round()),
            dimension::to_offset(height.round())
        )
    }

    fn anchor(&self, bounds: Rect) -> Offset {
        let x = match self.gravity.horizontal {
            AxisGravity::Start | AxisGravity::Fill => bounds.left,
            AxisGravity::End => bounds.right,
            AxisGravity::Center => (bounds.left + bounds.right) / 2.0,
        };
        let y = match self.gravity.vertical {
            AxisGravity::Start | AxisGravity::Fill => bounds.top + self.text_size,
            AxisGravity::End => bounds.bottom,
            AxisGravity::Center => (bounds.top + bounds.bottom + self.text_size) / 2.0,
        };
        Offset::new(x, y)
    }
}

impl SpecLayer for DimensionsLabel {
    fn draw(&self, canvas: &mut Canvas, bounds: Rect) {
        let style = TextStyle {
            color: self.color,
            font_size: self.text_size,
        };
        canvas.draw_text(self.anchor(bounds), self.label(bounds), style);
    }

    fn layer_type(&self) -> &'static str {
        "DimensionsLabel"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn inflate(config: &LayerConfig) -> anyhow::Result<LayerNode> {
    Ok(LayerNode::leaf(DimensionsLabel::from_arguments(&config.arguments)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::ScaleContext;
    use crate::layers::DrawCommand;

    fn label(pairs: &[(&str, Option<&str>)]) -> Result<DimensionsLabel, RhythmError> {
        let args = ArgumentBundle::from_pairs(ScaleContext::with_density(2.0), pairs.iter().copied());
        DimensionsLabel::from_arguments(&args)
    }

    #[test]
    fn defaults() {
        let label = label(&[]).unwrap();
        assert_eq!(label.text_size(), 24.0);
        assert_eq!(label.gravity(), Gravity::BOTTOM_RIGHT);
        assert_eq!(label.units(), DimensionUnit::Dp);
    }

    #[test]
    fn units_must_be_known() {
        let err = label(&[("units", Some("mm"))]).unwrap_err();
        assert_eq!(err.code(), 151);
        assert_eq!(err.args(), vec!["dimensions-label", "units", "dp, px"]);
    }

    #[test]
    fn text_in_dp_and_px() {
        let bounds = Rect::from_size(720.0, 1280.0);
        assert_eq!(label(&[]).unwrap().label(bounds), "360\u{d7}640 dp");
        assert_eq!(
            label(&[("units", Some("px"))]).unwrap().label(bounds),
            "720\u{d7}1280 px"
        );
    }

    #[test]
    fn draws_at_gravity_anchor() {
        let label = label(&[("gravity", Some("top|left")), ("text-size", Some("10px"))]).unwrap();
        let mut canvas = Canvas::new();
        label.draw(&mut canvas, Rect::from_ltrb(4.0, 6.0, 24.0, 26.0));
        match &canvas.commands()[0] {
            DrawCommand::DrawText(offset, text, style) => {
                assert_eq!(*offset, Offset::new(4.0, 16.0));
                assert_eq!(text, "10\u{d7}10 dp");
                assert_eq!(style.font_size, 10.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
