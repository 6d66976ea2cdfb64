//! Summary statistics for a recording session.

use serde::{Deserialize, Serialize};

use crate::event::{MouseClick, MouseMove, MouseScroll};

/// Summary of a session, persisted as `stats_<id>.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionStats {
    /// Timestamp of the last movement, in seconds.
    pub total_time: f64,
    /// Sum of distances between consecutive movements, in pixels.
    pub total_distance: f64,
    /// Mean of the non-zero movement speeds, in pixels per second.
    pub avg_speed: f64,
    /// Largest movement speed, in pixels per second.
    pub max_speed: f64,
    /// Number of button presses (releases are not counted).
    pub total_clicks: usize,
    /// Number of recorded movements.
    pub total_movements: usize,
    /// Number of scroll events.
    pub scroll_events: usize,
}

impl SessionStats {
    /// Compute statistics from recorded events.
    ///
    /// A session without movements yields all-zero statistics.
    #[must_use]
    pub fn compute(moves: &[MouseMove], clicks: &[MouseClick], scrolls: &[MouseScroll]) -> Self {
        if moves.is_empty() {
            return Self::default();
        }

        let total_time = moves.last().map_or(0.0, |m| m.timestamp);
        let total_distance = moves.windows(2).map(|w| w[0].distance_to(&w[1])).sum();

        let speeds: Vec<f64> = moves
            .iter()
            .map(|m| m.speed)
            .filter(|s| *s > 0.0)
            .collect();
        let avg_speed = if speeds.is_empty() {
            0.0
        } else {
            speeds.iter().sum::<f64>() / speeds.len() as f64
        };
        let max_speed = speeds.iter().copied().fold(0.0, f64::max);

        Self {
            total_time,
            total_distance,
            avg_speed,
            max_speed,
            total_clicks: clicks.iter().filter(|c| c.pressed).count(),
            total_movements: moves.len(),
            scroll_events: scrolls.len(),
        }
    }
}
