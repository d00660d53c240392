// A single line at a fixed distance from one edge.

use std::any::Any;

use crate::arguments::ArgumentBundle;
use crate::diagnostics::{missing, missing_or_not_one_of, missing_or_not_positive, RhythmError};
use crate::dimension::{Length, Rounding};
use crate::gravity::EdgeAffinity;
use crate::registry::LayerConfig;

use super::{Canvas, Color, LayerNode, Paint, Rect, SpecLayer};

pub const TOKEN: &str = "keyline";
pub const GUIDE_TOKEN: &str = "guide";

pub const DEFAULT_COLOR: Color = Color::from_argb(0x8000_91EA);

#[derive(Debug, Clone, PartialEq)]
pub struct Keyline {
    edge: EdgeAffinity,
    distance: Length,
    thickness: i32,
    outside: bool,
    color: Color,
}

impl Keyline {
    pub fn from_arguments(args: &ArgumentBundle) -> Result<Self, RhythmError> {
        let edge = args
            .get_edge_affinity("from", None)
            .ok_or_else(|| missing_or_not_one_of(TOKEN, "from", EdgeAffinity::TOKENS))?;
        let distance = args
            .get_length("distance", Rounding::Offset)?
            .ok_or_else(|| missing(TOKEN, "distance"))?;
        let thickness = args.get_dimension_pixel_size("thickness", 1)?;
        if thickness <= 0 {
            return Err(missing_or_not_positive(TOKEN, "thickness", "1dp"));
        }
        Ok(Self {
            edge,
            distance,
            thickness,
            outside: args.get_bool("outside", false, true)?,
            color: args.get_color("color", DEFAULT_COLOR)?,
        })
    }

    pub fn edge(&self) -> EdgeAffinity {
        self.edge
    }

    pub fn distance(&self) -> Length {
        self.distance
    }

    pub fn thickness(&self) -> i32 {
        self.thickness
    }

    /// Whether the line sits between the edge and the keyline position.
    pub fn is_outside(&self) -> bool {
        self.outside
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Rectangle of `thickness` pixels at `distance` from `edge`.
///
/// Inside lines extend away from the edge, outside lines toward it.
pub(crate) fn line_rect(
    bounds: Rect,
    edge: EdgeAffinity,
    distance: f32,
    thickness: f32,
    outside: bool,
) -> Rect {
    let (near, far) = if outside {
        (distance - thickness, distance)
    } else {
        (distance, distance + thickness)
    };
    match edge {
        EdgeAffinity::Top => {
            Rect::from_ltrb(bounds.left, bounds.top + near, bounds.right, bounds.top + far)
        }
        EdgeAffinity::Bottom => {
            Rect::from_ltrb(bounds.left, bounds.bottom - far, bounds.right, bounds.bottom - near)
        }
        EdgeAffinity::Left => {
            Rect::from_ltrb(bounds.left + near, bounds.top, bounds.left + far, bounds.bottom)
        }
        EdgeAffinity::Right => {
            Rect::from_ltrb(bounds.right - far, bounds.top, bounds.right - near, bounds.bottom)
        }
    }
}

impl SpecLayer for Keyline {
    fn draw(&self, canvas: &mut Canvas, bounds: Rect) {
        let extent = if self.edge.is_vertical() {
            bounds.height()
        } else {
            bounds.width()
        };
        let rect = line_rect(
            bounds,
            self.edge,
            self.distance.resolve(extent),
            self.thickness as f32,
            self.outside,
        );
        canvas.draw_rect(rect, Paint::from_color(self.color));
    }

    fn layer_type(&self) -> &'static str {
        "Keyline"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn inflate(config: &LayerConfig) -> anyhow::Result<LayerNode> {
    Ok(LayerNode::leaf(Keyline::from_arguments(&config.arguments)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::ScaleContext;

    fn keyline(pairs: &[(&str, Option<&str>)]) -> Result<Keyline, RhythmError> {
        let args = ArgumentBundle::from_pairs(ScaleContext::with_density(2.0), pairs.iter().copied());
        Keyline::from_arguments(&args)
    }

    #[test]
    fn outside_flag_and_distance() {
        let line = keyline(&[
            ("from", Some("left")),
            ("distance", Some("8dp")),
            ("outside", None),
        ])
        .unwrap();
        assert!(line.is_outside());
        assert_eq!(line.distance(), Length::Pixels(16.0));
    }

    #[test]
    fn distance_is_required() {
        let err = keyline(&[("from", Some("top"))]).unwrap_err();
        assert_eq!(err.code(), 150);
        assert_eq!(err.args(), vec!["keyline", "distance"]);
    }

    #[test]
    fn inside_and_outside_rects() {
        let bounds = Rect::from_size(100.0, 50.0);
        let mut canvas = Canvas::new();
        keyline(&[("from", Some("left")), ("distance", Some("8px")), ("thickness", Some("2px"))])
            .unwrap()
            .draw(&mut canvas, bounds);
        keyline(&[("from", Some("bottom")), ("distance", Some("8px")), ("outside", None)])
            .unwrap()
            .draw(&mut canvas, bounds);
        assert_eq!(
            canvas.rects(),
            vec![
                Rect::from_ltrb(8.0, 0.0, 10.0, 50.0),
                Rect::from_ltrb(0.0, 42.0, 100.0, 43.0),
            ]
        );
    }

    #[test]
    fn percent_distance() {
        let mut canvas = Canvas::new();
        keyline(&[("from", Some("right")), ("distance", Some("25%"))])
            .unwrap()
            .draw(&mut canvas, Rect::from_size(200.0, 10.0));
        assert_eq!(canvas.rects(), vec![Rect::from_ltrb(149.0, 0.0, 150.0, 10.0)]);
    }
}
