// Recording canvas that spec layers draw onto.
// Hosts replay the recorded commands on their real surface.

use std::fmt;
use std::str::FromStr;

use super::geometry::{Offset, Rect};

/// Color packed as `0xAARRGGBB`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const TRANSPARENT: Color = Color(0x0000_0000);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([a, r, g, b]))
    }

    pub fn to_argb(&self) -> u32 {
        self.0
    }

    pub fn alpha(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn with_alpha(&self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color `{}`", self.0)
    }
}

impl std::error::Error for ParseColorError {}

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0xFF00_0000),
    ("white", 0xFFFF_FFFF),
    ("red", 0xFFFF_0000),
    ("green", 0xFF00_FF00),
    ("blue", 0xFF00_00FF),
    ("yellow", 0xFFFF_FF00),
    ("cyan", 0xFF00_FFFF),
    ("magenta", 0xFFFF_00FF),
    ("gray", 0xFF88_8888),
    ("grey", 0xFF88_8888),
    ("lightgray", 0xFFCC_CCCC),
    ("lightgrey", 0xFFCC_CCCC),
    ("darkgray", 0xFF44_4444),
    ("darkgrey", 0xFF44_4444),
    ("aqua", 0xFF00_FFFF),
    ("fuchsia", 0xFFFF_00FF),
    ("lime", 0xFF00_FF00),
    ("maroon", 0xFF80_0000),
    ("navy", 0xFF00_0080),
    ("olive", 0xFF80_8000),
    ("purple", 0xFF80_0080),
    ("silver", 0xFFC0_C0C0),
    ("teal", 0xFF00_8080),
    ("transparent", 0x0000_0000),
];

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts `#RRGGBB`, `#AARRGGBB` and a fixed set of color names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex) = s.strip_prefix('#') {
            let parsed = if hex.chars().all(|c| c.is_ascii_hexdigit()) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                None
            };
            return match (hex.len(), parsed) {
                (6, Some(rgb)) => Ok(Color(0xFF00_0000 | rgb)),
                (8, Some(argb)) => Ok(Color(argb)),
                _ => Err(ParseColorError(s.to_string())),
            };
        }
        let lower = s.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, argb)| Color(*argb))
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub color: Color,
}

impl Paint {
    pub fn from_color(color: Color) -> Self {
        Self { color }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    ClipRect(Rect),
    DrawRect(Rect, Paint),
    DrawText(Offset, String, TextStyle),
}

/// Canvas for drawing operations
#[derive(Debug, Default)]
pub struct Canvas {
    commands: Vec<DrawCommand>,
    clip_stack: Vec<Option<Rect>>,
    clip: Option<Rect>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self) {
        self.clip_stack.push(self.clip);
        self.commands.push(DrawCommand::Save);
    }

    pub fn restore(&mut self) {
        if let Some(clip) = self.clip_stack.pop() {
            self.clip = clip;
            self.commands.push(DrawCommand::Restore);
        }
    }

    pub fn clip_rect(&mut self, rect: Rect) {
        self.clip = Some(match self.clip {
            Some(current) => current.intersection(&rect).unwrap_or_default(),
            None => rect,
        });
        self.commands.push(DrawCommand::ClipRect(rect));
    }

    /// Current effective clip, if any clip is active.
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    pub fn draw_rect(&mut self, rect: Rect, paint: Paint) {
        self.commands.push(DrawCommand::DrawRect(rect, paint));
    }

    pub fn draw_text(&mut self, offset: Offset, text: String, style: TextStyle) {
        self.commands.push(DrawCommand::DrawText(offset, text, style));
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Rectangles drawn so far, in drawing order.
    pub fn rects(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::DrawRect(rect, _) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.clip_stack.clear();
        self.clip = None;
    }
}
