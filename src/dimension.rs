// Dimension resolution for argument values such as `16dp`, `1.5mm` or `50%`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{ErrorKind, RhythmError};

lazy_static! {
    static ref NUMERIC_PREFIX: Regex = Regex::new(r"^-?(?:\d+(?:\.\d*)?|\.\d+)").unwrap();
}

/// Density factors of the surface an overlay is inflated for.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScaleContext {
    /// Pixels per density-independent pixel.
    pub density: f32,
    /// Pixels per scale-independent pixel.
    pub scaled_density: f32,
    /// Physical pixels per inch along the horizontal axis.
    pub xdpi: f32,
}

impl ScaleContext {
    pub fn new(density: f32, scaled_density: f32, xdpi: f32) -> Self {
        Self {
            density,
            scaled_density,
            xdpi,
        }
    }

    /// A context where one dp equals `density` pixels and sp tracks dp.
    pub fn with_density(density: f32) -> Self {
        Self::new(density, density, 160.0 * density)
    }
}

impl Default for ScaleContext {
    fn default() -> Self {
        Self::with_density(1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimensionUnit {
    Px,
    Dp,
    Sp,
    Pt,
    In,
    Mm,
    Percent,
    /// No recognised suffix, the value is a bare number.
    None,
}

// `dip` is listed before `dp` and `in`.
const SUFFIXES: &[(&str, DimensionUnit)] = &[
    ("dip", DimensionUnit::Dp),
    ("dp", DimensionUnit::Dp),
    ("px", DimensionUnit::Px),
    ("sp", DimensionUnit::Sp),
    ("pt", DimensionUnit::Pt),
    ("in", DimensionUnit::In),
    ("mm", DimensionUnit::Mm),
    ("%", DimensionUnit::Percent),
];

impl DimensionUnit {
    pub fn of(raw: &str) -> Self {
        let raw = raw.trim();
        SUFFIXES
            .iter()
            .find(|(suffix, _)| raw.ends_with(suffix))
            .map(|(_, unit)| *unit)
            .unwrap_or(DimensionUnit::None)
    }

    pub fn apply(self, value: f32, scale: &ScaleContext) -> f32 {
        match self {
            DimensionUnit::Px | DimensionUnit::Percent | DimensionUnit::None => value,
            DimensionUnit::Dp => value * scale.density,
            DimensionUnit::Sp => value * scale.scaled_density,
            DimensionUnit::Pt => value * scale.xdpi / 72.0,
            DimensionUnit::In => value * scale.xdpi,
            DimensionUnit::Mm => value * scale.xdpi / 25.4,
        }
    }
}

/// How a resolved pixel value is turned into what the caller stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Exact,
    Offset,
    Size,
}

/// Convert `raw` into pixels. Percent values come back unscaled; the
/// consuming layer resolves them against its bounds when drawing.
pub fn resolve_pixels(raw: &str, scale: &ScaleContext) -> Result<f32, RhythmError> {
    let malformed = || {
        RhythmError::new(ErrorKind::MalformedArgumentValue {
            argument: String::new(),
            value: raw.to_string(),
            expected: "a dimension",
        })
    };
    let trimmed = raw.trim();
    let number = NUMERIC_PREFIX.find(trimmed).ok_or_else(malformed)?;
    let value: f32 = number.as_str().parse().map_err(|_| malformed())?;
    Ok(DimensionUnit::of(trimmed).apply(value, scale))
}

pub fn to_offset(value: f32) -> i32 {
    value.trunc() as i32
}

/// Round to the nearest pixel, never collapsing a non-zero value to zero.
pub fn to_size(value: f32) -> i32 {
    let rounded = value.round() as i32;
    if rounded != 0 || value == 0.0 {
        rounded
    } else if value > 0.0 {
        1
    } else {
        -1
    }
}

/// A dimension whose percent form is resolved by the consumer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Pixels(f32),
    /// Percent of the enclosing extent, `50.0` meaning half.
    Percent(f32),
}

impl Length {
    pub fn resolve(&self, extent: f32) -> f32 {
        match self {
            Length::Pixels(px) => *px,
            Length::Percent(percent) => extent * percent / 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(density: f32) -> ScaleContext {
        ScaleContext::with_density(density)
    }

    #[test]
    fn dp_scales_with_density() {
        assert_eq!(resolve_pixels("16dp", &ctx(2.0)).unwrap(), 32.0);
        assert_eq!(resolve_pixels("16dip", &ctx(2.0)).unwrap(), 32.0);
        assert_eq!(resolve_pixels("-4dp", &ctx(1.5)).unwrap(), -6.0);
    }

    #[test]
    fn pass_through_units() {
        let scale = ctx(3.0);
        assert_eq!(resolve_pixels("7px", &scale).unwrap(), 7.0);
        assert_eq!(resolve_pixels("50%", &scale).unwrap(), 50.0);
        assert_eq!(resolve_pixels("12", &scale).unwrap(), 12.0);
        assert_eq!(resolve_pixels(".5", &scale).unwrap(), 0.5);
    }

    #[test]
    fn physical_units_use_xdpi() {
        let scale = ScaleContext::new(1.0, 1.0, 144.0);
        assert_eq!(resolve_pixels("1in", &scale).unwrap(), 144.0);
        assert_eq!(resolve_pixels("72pt", &scale).unwrap(), 144.0);
        assert!((resolve_pixels("25.4mm", &scale).unwrap() - 144.0).abs() < 1e-3);
    }

    #[test]
    fn sp_uses_scaled_density() {
        let scale = ScaleContext::new(2.0, 2.5, 320.0);
        assert_eq!(resolve_pixels("10sp", &scale).unwrap(), 25.0);
    }

    #[test]
    fn no_number_is_rejected() {
        let err = resolve_pixels("dp", &ctx(1.0)).unwrap_err();
        assert_eq!(err.code(), 154);
    }

    #[test]
    fn unit_detection() {
        assert_eq!(DimensionUnit::of("3mm"), DimensionUnit::Mm);
        assert_eq!(DimensionUnit::of("25%"), DimensionUnit::Percent);
        assert_eq!(DimensionUnit::of("4"), DimensionUnit::None);
    }

    #[test]
    fn size_keeps_tiny_values_visible() {
        assert_eq!(to_size(0.2), 1);
        assert_eq!(to_size(-0.2), -1);
        assert_eq!(to_size(0.0), 0);
        assert_eq!(to_size(2.5), 3);
        assert_eq!(to_size(2.4), 2);
    }

    #[test]
    fn percent_length_tracks_extent() {
        assert_eq!(Length::Percent(25.0).resolve(200.0), 50.0);
        assert_eq!(Length::Pixels(12.0).resolve(200.0), 12.0);
    }

    #[test]
    fn offset_truncates_toward_zero() {
        assert_eq!(to_offset(2.9), 2);
        assert_eq!(to_offset(-2.9), -2);
        assert_eq!(to_offset(0.4), 0);
    }
}
