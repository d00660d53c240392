use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::diagnostics::{ErrorKind, RhythmError};
use crate::dimension::{self, DimensionUnit, Length, Rounding, ScaleContext};
use crate::gravity::{EdgeAffinity, Gravity};
use crate::layers::Color;

/// Typed read access to the `key[=value]` arguments of one layer line.
///
/// A key present without a value (`outside`) is a flag, which is distinct
/// from the key being absent. Equality and hashing only look at the
/// arguments; the scale context rides along for dimension getters.
#[derive(Debug, Clone)]
pub struct ArgumentBundle {
    values: BTreeMap<String, Option<String>>,
    scale: ScaleContext,
}

impl ArgumentBundle {
    pub fn new(scale: ScaleContext) -> Self {
        Self {
            values: BTreeMap::new(),
            scale,
        }
    }

    /// Build a bundle from `(key, value)` pairs, mostly useful in tests.
    pub fn from_pairs<'a>(
        scale: ScaleContext,
        pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
    ) -> Self {
        let mut bundle = Self::new(scale);
        for (key, value) in pairs {
            bundle.insert(key.to_string(), value.map(str::to_string));
        }
        bundle
    }

    /// Insert an argument, returning the previous value of a repeated key.
    pub fn insert(&mut self, key: String, value: Option<String>) -> Option<Option<String>> {
        self.values.insert(key, value)
    }

    pub fn scale(&self) -> &ScaleContext {
        &self.scale
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|value| value.as_deref())
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.value(key)
    }

    pub fn get_string_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.value(key).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i32) -> Result<i32, RhythmError> {
        match self.value(key) {
            Some(raw) => raw
                .parse()
                .map_err(|_| malformed(key, raw, "an integer")),
            None => Ok(default),
        }
    }

    pub fn get_float(&self, key: &str, default: f32) -> Result<f32, RhythmError> {
        match self.value(key) {
            Some(raw) => raw.parse().map_err(|_| malformed(key, raw, "a number")),
            None => Ok(default),
        }
    }

    /// `absent` is returned when the key is missing, `bare` when it is a flag.
    pub fn get_bool(&self, key: &str, absent: bool, bare: bool) -> Result<bool, RhythmError> {
        match self.values.get(key) {
            None => Ok(absent),
            Some(None) => Ok(bare),
            Some(Some(raw)) => match raw.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(malformed(key, raw, "`true` or `false`")),
            },
        }
    }

    pub fn get_color(&self, key: &str, default: Color) -> Result<Color, RhythmError> {
        match self.value(key) {
            Some(raw) => raw.parse().map_err(|_| malformed(key, raw, "a color")),
            None => Ok(default),
        }
    }

    /// Unknown tokens fall back to `default` like an absent key.
    pub fn get_edge_affinity(
        &self,
        key: &str,
        default: Option<EdgeAffinity>,
    ) -> Option<EdgeAffinity> {
        self.value(key).and_then(EdgeAffinity::parse).or(default)
    }

    pub fn get_gravity(&self, key: &str, default: Gravity) -> Gravity {
        self.value(key)
            .and_then(|raw| Gravity::parse(raw, default))
            .unwrap_or(default)
    }

    pub fn get_dimension_units(&self, key: &str) -> Option<DimensionUnit> {
        self.value(key).map(DimensionUnit::of)
    }

    fn resolve(&self, key: &str) -> Result<Option<f32>, RhythmError> {
        match self.value(key) {
            Some(raw) => dimension::resolve_pixels(raw, &self.scale)
                .map(Some)
                .map_err(|_| malformed(key, raw, "a dimension")),
            None => Ok(None),
        }
    }

    pub fn get_dimension_pixel_exact(&self, key: &str, default: f32) -> Result<f32, RhythmError> {
        Ok(self.resolve(key)?.unwrap_or(default))
    }

    pub fn get_dimension_pixel_offset(&self, key: &str, default: i32) -> Result<i32, RhythmError> {
        Ok(self.resolve(key)?.map(dimension::to_offset).unwrap_or(default))
    }

    pub fn get_dimension_pixel_size(&self, key: &str, default: i32) -> Result<i32, RhythmError> {
        Ok(self.resolve(key)?.map(dimension::to_size).unwrap_or(default))
    }

    /// Read a dimension that may be given in percent of the enclosing bounds.
    /// Pixel values are rounded with `rounding`; percent values stay raw.
    pub fn get_length(&self, key: &str, rounding: Rounding) -> Result<Option<Length>, RhythmError> {
        let Some(px) = self.resolve(key)? else {
            return Ok(None);
        };
        if self.get_dimension_units(key) == Some(DimensionUnit::Percent) {
            return Ok(Some(Length::Percent(px)));
        }
        let px = match rounding {
            Rounding::Exact => px,
            Rounding::Offset => dimension::to_offset(px) as f32,
            Rounding::Size => dimension::to_size(px) as f32,
        };
        Ok(Some(Length::Pixels(px)))
    }
}

impl PartialEq for ArgumentBundle {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for ArgumentBundle {}

impl Hash for ArgumentBundle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.values.hash(state);
    }
}

fn malformed(key: &str, raw: &str, expected: &'static str) -> RhythmError {
    RhythmError::new(ErrorKind::MalformedArgumentValue {
        argument: key.to_string(),
        value: raw.to_string(),
        expected,
    })
}
