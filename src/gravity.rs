// Edge affinity and gravity tokens accepted by layer arguments.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeAffinity {
    Top,
    Bottom,
    Left,
    Right,
}

impl EdgeAffinity {
    pub const TOKENS: &'static [&'static str] = &["top", "bottom", "left", "right"];

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "top" => Some(EdgeAffinity::Top),
            "bottom" => Some(EdgeAffinity::Bottom),
            "left" => Some(EdgeAffinity::Left),
            "right" => Some(EdgeAffinity::Right),
            _ => None,
        }
    }

    /// Top and bottom anchored layers run horizontally.
    pub fn is_vertical(&self) -> bool {
        matches!(self, EdgeAffinity::Top | EdgeAffinity::Bottom)
    }
}

/// Placement along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisGravity {
    Start,
    End,
    Center,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gravity {
    pub horizontal: AxisGravity,
    pub vertical: AxisGravity,
}

impl Gravity {
    pub const fn new(horizontal: AxisGravity, vertical: AxisGravity) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub const TOP_LEFT: Gravity = Gravity::new(AxisGravity::Start, AxisGravity::Start);
    pub const BOTTOM_RIGHT: Gravity = Gravity::new(AxisGravity::End, AxisGravity::End);
    pub const FILL: Gravity = Gravity::new(AxisGravity::Fill, AxisGravity::Fill);

    /// Parse `|`-joined tokens such as `top|right` or `center_vertical|left`.
    ///
    /// Returns `None` when any token is unknown. Axes no token mentions keep
    /// the value from `base`.
    pub fn parse(raw: &str, base: Gravity) -> Option<Self> {
        let mut horizontal = None;
        let mut vertical = None;
        for token in raw.split('|').map(str::trim) {
            match token {
                "top" => vertical = Some(AxisGravity::Start),
                "bottom" => vertical = Some(AxisGravity::End),
                "left" => horizontal = Some(AxisGravity::Start),
                "right" => horizontal = Some(AxisGravity::End),
                "center_vertical" => vertical = Some(AxisGravity::Center),
                "center_horizontal" => horizontal = Some(AxisGravity::Center),
                "fill_vertical" => vertical = Some(AxisGravity::Fill),
                "fill_horizontal" => horizontal = Some(AxisGravity::Fill),
                "center" => {
                    horizontal.get_or_insert(AxisGravity::Center);
                    vertical.get_or_insert(AxisGravity::Center);
                }
                "fill" => {
                    horizontal.get_or_insert(AxisGravity::Fill);
                    vertical.get_or_insert(AxisGravity::Fill);
                }
                _ => return None,
            }
        }
        Some(Gravity {
            horizontal: horizontal.unwrap_or(base.horizontal),
            vertical: vertical.unwrap_or(base.vertical),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_axis_tokens() {
        let gravity = Gravity::parse("bottom|left", Gravity::FILL).unwrap();
        assert_eq!(gravity.vertical, AxisGravity::End);
        assert_eq!(gravity.horizontal, AxisGravity::Start);
    }

    #[test]
    fn center_only_fills_unset_axes() {
        let gravity = Gravity::parse("top|center", Gravity::FILL).unwrap();
        assert_eq!(gravity.vertical, AxisGravity::Start);
        assert_eq!(gravity.horizontal, AxisGravity::Center);
    }

    #[test]
    fn untouched_axis_keeps_base() {
        let gravity = Gravity::parse("right", Gravity::TOP_LEFT).unwrap();
        assert_eq!(gravity, Gravity::new(AxisGravity::End, AxisGravity::Start));
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert_eq!(Gravity::parse("top|sideways", Gravity::FILL), None);
        assert_eq!(EdgeAffinity::parse("middle"), None);
        assert!(EdgeAffinity::Bottom.is_vertical());
    }
}
