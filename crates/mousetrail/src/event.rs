//! Core event types for mousetrail.
//!
//! Raw [`InputEvent`]s come from an input monitor. The recorder turns them
//! into the persisted records ([`MouseMove`], [`MouseClick`], [`MouseScroll`],
//! [`HoverCell`]) that sessions are made of.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
    /// Any other button (side buttons and the like).
    Unknown,
}

impl std::fmt::Display for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Session files store buttons in this form
        match self {
            Self::Left => write!(f, "Button.left"),
            Self::Right => write!(f, "Button.right"),
            Self::Middle => write!(f, "Button.middle"),
            Self::Unknown => write!(f, "Button.unknown"),
        }
    }
}

/// What happened in a raw input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    /// The pointer moved to an absolute screen position.
    Move {
        /// Horizontal position in pixels.
        x: f64,
        /// Vertical position in pixels, 0 at the top.
        y: f64,
    },
    /// A button went down.
    Press(Button),
    /// A button went up.
    Release(Button),
    /// The wheel scrolled.
    Scroll {
        /// Horizontal scroll steps.
        dx: i64,
        /// Vertical scroll steps.
        dy: i64,
    },
    /// The stop key (Escape) was pressed.
    StopKey,
}

/// A raw input event with the wall-clock time it occurred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// When the event occurred.
    pub time: SystemTime,
    /// What occurred.
    pub kind: InputKind,
}

impl InputEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn now(kind: InputKind) -> Self {
        Self {
            time: SystemTime::now(),
            kind,
        }
    }
}

/// A recorded pointer movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseMove {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels.
    pub y: f64,
    /// Seconds since the recording started.
    pub timestamp: f64,
    /// Speed since the previous movement, in pixels per second.
    #[serde(default)]
    pub speed: f64,
}

impl MouseMove {
    /// Euclidean distance to another movement.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A recorded button press or release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseClick {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels.
    pub y: f64,
    /// Button name, e.g. `Button.left`.
    pub button: String,
    /// True for a press, false for a release.
    pub pressed: bool,
    /// Seconds since the recording started.
    pub timestamp: f64,
}

/// A recorded scroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MouseScroll {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels.
    pub y: f64,
    /// Horizontal scroll steps.
    pub dx: i64,
    /// Vertical scroll steps.
    pub dy: i64,
    /// Seconds since the recording started.
    pub timestamp: f64,
}

/// Accumulated hover time for one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverCell {
    /// Left edge of the cell in pixels.
    #[serde(deserialize_with = "coordinate")]
    pub x: i64,
    /// Top edge of the cell in pixels.
    #[serde(deserialize_with = "coordinate")]
    pub y: i64,
    /// Total seconds the pointer rested in the cell.
    pub duration: f64,
}

/// Accept `10` as well as `10.0`; some hover files were written with float keys.
fn coordinate<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.floor() as i64)
}

/// Snap a position to the top-left corner of its hover cell.
#[must_use]
pub fn hover_cell(x: f64, y: f64, cell_size: u32) -> (i64, i64) {
    let size = f64::from(cell_size.max(1));
    let snap = |v: f64| ((v / size).floor() * size) as i64;
    (snap(x), snap(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_display() {
        assert_eq!(Button::Left.to_string(), "Button.left");
        assert_eq!(Button::Right.to_string(), "Button.right");
        assert_eq!(Button::Middle.to_string(), "Button.middle");
        assert_eq!(Button::Unknown.to_string(), "Button.unknown");
    }

    #[test]
    fn test_hover_cell_snaps_down() {
        assert_eq!(hover_cell(0.0, 0.0, 10), (0, 0));
        assert_eq!(hover_cell(19.9, 25.0, 10), (10, 20));
        assert_eq!(hover_cell(105.0, 3.0, 50), (100, 0));
    }

    #[test]
    fn test_hover_cell_negative_coordinates() {
        // Multi-monitor setups report positions left of the primary screen
        assert_eq!(hover_cell(-1.0, -15.0, 10), (-10, -20));
    }

    #[test]
    fn test_hover_cell_zero_size_treated_as_one() {
        assert_eq!(hover_cell(3.7, 8.2, 0), (3, 8));
    }

    #[test]
    fn test_distance_to() {
        let a = MouseMove {
            x: 0.0,
            y: 0.0,
            timestamp: 0.0,
            speed: 0.0,
        };
        let b = MouseMove {
            x: 3.0,
            y: 4.0,
            timestamp: 1.0,
            speed: 5.0,
        };
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_mouse_move_speed_defaults_to_zero() {
        let m: MouseMove = serde_json::from_str(r#"{"x": 10, "y": 20, "timestamp": 0.5}"#).unwrap();
        assert!((m.x - 10.0).abs() < f64::EPSILON);
        assert!(m.speed.abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_json_field_names() {
        let click = MouseClick {
            x: 1.0,
            y: 2.0,
            button: Button::Left.to_string(),
            pressed: true,
            timestamp: 0.25,
        };
        let json = serde_json::to_value(&click).unwrap();
        assert_eq!(json["button"], "Button.left");
        assert_eq!(json["pressed"], true);
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_hover_cell_accepts_float_coordinates() {
        let cells: Vec<HoverCell> =
            serde_json::from_str(r#"[{"x": 10, "y": 20, "duration": 1.5}, {"x": 30.0, "y": 40.0, "duration": 0.5}]"#)
                .unwrap();
        assert_eq!((cells[0].x, cells[0].y), (10, 20));
        assert_eq!((cells[1].x, cells[1].y), (30, 40));
    }

    #[test]
    fn test_input_event_now() {
        let before = SystemTime::now();
        let event = InputEvent::now(InputKind::StopKey);
        assert!(event.time >= before);
        assert_eq!(event.kind, InputKind::StopKey);
    }
}
