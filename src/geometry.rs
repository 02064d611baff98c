//! Screen-space geometry for the bubble: anchors, opening directions and the
//! placement table that turns an anchor plus a measured size into pinned and
//! settled window rectangles.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Screen-space point in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Split an `(x, y)` pair into `(along, across)` this axis.
    fn split(self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Axis::Horizontal => (x, y),
            Axis::Vertical => (y, x),
        }
    }

    /// Inverse of [`Axis::split`].
    fn join(self, along: f64, across: f64) -> (f64, f64) {
        match self {
            Axis::Horizontal => (along, across),
            Axis::Vertical => (across, along),
        }
    }
}

/// Side of the anchor the bubble expands toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Right,
    Left,
    Up,
    Down,
}

/// Geometry rules for one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionRule {
    pub grow_axis: Axis,
    /// The window moves against the growth axis while growing so that its far
    /// edge stays pinned at the anchor.
    pub grows_backward: bool,
    /// Transform origin of the content scale, in unit coordinates.
    pub scale_origin: (f64, f64),
}

const RULES: [(Direction, DirectionRule); 4] = [
    (
        Direction::Right,
        DirectionRule {
            grow_axis: Axis::Horizontal,
            grows_backward: false,
            scale_origin: (0.0, 0.5),
        },
    ),
    (
        Direction::Left,
        DirectionRule {
            grow_axis: Axis::Horizontal,
            grows_backward: true,
            scale_origin: (1.0, 0.5),
        },
    ),
    (
        Direction::Up,
        DirectionRule {
            grow_axis: Axis::Vertical,
            grows_backward: true,
            scale_origin: (0.5, 1.0),
        },
    ),
    (
        Direction::Down,
        DirectionRule {
            grow_axis: Axis::Vertical,
            grows_backward: false,
            scale_origin: (0.5, 0.0),
        },
    ),
];

/// Labels written by earlier versions of the stack files.
const LEGACY_LABELS: [(&str, Direction); 4] = [
    ("справа", Direction::Right),
    ("слева", Direction::Left),
    ("сверху", Direction::Up),
    ("снизу", Direction::Down),
];

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Left,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse a stored label. The label is trimmed and matched case-sensitively;
    /// anything unrecognised (or `None`) falls back to [`Direction::Right`].
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label.map(str::trim) else {
            return Direction::default();
        };
        if let Some(dir) = Self::ALL.iter().find(|d| d.label() == label) {
            return *dir;
        }
        LEGACY_LABELS
            .iter()
            .find(|(legacy, _)| *legacy == label)
            .map(|(_, dir)| *dir)
            .unwrap_or_else(|| {
                tracing::debug!(label, "unrecognised direction label; using right");
                Direction::default()
            })
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn rule(self) -> &'static DirectionRule {
        // The table covers every variant.
        RULES
            .iter()
            .find(|(dir, _)| *dir == self)
            .map(|(_, rule)| rule)
            .unwrap_or(&RULES[0].1)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Direction::Right => "Right",
            Direction::Left => "Left",
            Direction::Up => "Up",
            Direction::Down => "Down",
        };
        write!(f, "{text}")
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(Direction::from_label(label.as_deref()))
    }
}

/// Start and end geometry of a reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Degenerate rectangle the bubble grows out of: zero extent on the growth
    /// axis, full extent across it.
    pub pinned: Rect,
    /// Fully open rectangle.
    pub settled: Rect,
    pub grow_axis: Axis,
    pub scale_origin: (f64, f64),
}

/// Compute where the bubble starts and ends for `anchor`, `direction` and the
/// measured `final_size`. The edge nearest the anchor is pinned to it and the
/// perpendicular axis is centred on it.
pub fn placement(anchor: Anchor, direction: Direction, final_size: Size) -> Placement {
    let rule = direction.rule();
    let axis = rule.grow_axis;

    let (anchor_along, anchor_across) = axis.split(anchor.x, anchor.y);
    let (extent_along, extent_across) = axis.split(final_size.width, final_size.height);

    let across = anchor_across - extent_across / 2.0;
    let pinned_along = anchor_along;
    let settled_along = if rule.grows_backward {
        anchor_along - extent_along
    } else {
        anchor_along
    };

    let (pinned_left, pinned_top) = axis.join(pinned_along, across);
    let (settled_left, settled_top) = axis.join(settled_along, across);
    let (pinned_width, pinned_height) = axis.join(0.0, extent_across);

    Placement {
        pinned: Rect {
            left: pinned_left,
            top: pinned_top,
            width: pinned_width,
            height: pinned_height,
        },
        settled: Rect {
            left: settled_left,
            top: settled_top,
            width: final_size.width,
            height: final_size.height,
        },
        grow_axis: axis,
        scale_origin: rule.scale_origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_labels_are_trimmed_and_case_sensitive() {
        assert_eq!(Direction::from_label(Some("  left ")), Direction::Left);
        assert_eq!(Direction::from_label(Some("up")), Direction::Up);
        assert_eq!(Direction::from_label(Some("Up")), Direction::Right);
        assert_eq!(Direction::from_label(Some("sideways")), Direction::Right);
        assert_eq!(Direction::from_label(None), Direction::Right);
    }

    #[test]
    fn legacy_labels_are_understood() {
        assert_eq!(Direction::from_label(Some("слева")), Direction::Left);
        assert_eq!(Direction::from_label(Some("сверху")), Direction::Up);
        assert_eq!(Direction::from_label(Some("снизу")), Direction::Down);
        assert_eq!(Direction::from_label(Some("справа")), Direction::Right);
    }

    #[test]
    fn every_direction_has_a_rule() {
        for dir in Direction::ALL {
            let rule = dir.rule();
            let expected_axis = match dir {
                Direction::Right | Direction::Left => Axis::Horizontal,
                Direction::Up | Direction::Down => Axis::Vertical,
            };
            assert_eq!(rule.grow_axis, expected_axis, "{dir}");
        }
    }

    #[test]
    fn serde_uses_labels_and_tolerates_garbage() {
        let json = serde_json::to_string(&Direction::Down).unwrap();
        assert_eq!(json, "\"down\"");
        let parsed: Direction = serde_json::from_str("\"bogus\"").unwrap();
        assert_eq!(parsed, Direction::Right);
        let parsed: Direction = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Direction::Right);
    }
}
