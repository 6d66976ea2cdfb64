//! Recorded sessions.
//!
//! A [`Session`] holds everything captured during one recording: movements,
//! button events, scrolls and per-cell hover time, plus the derived
//! [`SessionStats`]. The [`store`] submodule persists sessions as JSON files.

pub mod stats;
pub mod store;

use std::collections::BTreeMap;

use crate::event::{HoverCell, MouseClick, MouseMove, MouseScroll};

pub use stats::SessionStats;
pub use store::{SessionEntry, SessionFiles, SessionStore};

/// Hover time keyed by the top-left corner of each cell.
pub type HoverMap = BTreeMap<(i64, i64), f64>;

/// One recording session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Pointer movements in arrival order.
    pub moves: Vec<MouseMove>,
    /// Button presses and releases.
    pub clicks: Vec<MouseClick>,
    /// Scroll events.
    pub scrolls: Vec<MouseScroll>,
    /// Accumulated hover time per cell.
    pub hover: HoverMap,
    /// Derived statistics.
    pub stats: SessionStats,
}

impl Session {
    /// Assemble a session from its parts and compute its statistics.
    #[must_use]
    pub fn new(
        moves: Vec<MouseMove>,
        clicks: Vec<MouseClick>,
        scrolls: Vec<MouseScroll>,
        hover: HoverMap,
    ) -> Self {
        let stats = SessionStats::compute(&moves, &clicks, &scrolls);
        Self {
            moves,
            clicks,
            scrolls,
            hover,
            stats,
        }
    }

    /// Check whether any movement was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Positions of all button presses.
    #[must_use]
    pub fn press_positions(&self) -> Vec<(f64, f64)> {
        self.clicks
            .iter()
            .filter(|c| c.pressed)
            .map(|c| (c.x, c.y))
            .collect()
    }

    /// Hover cells as a flat list, ordered by position.
    #[must_use]
    pub fn hover_cells(&self) -> Vec<HoverCell> {
        self.hover
            .iter()
            .map(|(&(x, y), &duration)| HoverCell { x, y, duration })
            .collect()
    }

    /// Number of distinct cells the pointer hovered over.
    #[must_use]
    pub fn unique_hover_locations(&self) -> usize {
        self.hover.len()
    }

    /// Multi-line human-readable statistics summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let s = &self.stats;
        format!(
            "Session Statistics:\n\
             Total Time: {:.1} seconds\n\
             Total Distance: {:.0} pixels\n\
             Average Speed: {:.1} pixels/second\n\
             Max Speed: {:.1} pixels/second\n\
             Total Clicks: {}\n\
             Mouse Movements: {}\n\
             Scroll Events: {}\n\
             Unique Hover Locations: {}",
            s.total_time,
            s.total_distance,
            s.avg_speed,
            s.max_speed,
            s.total_clicks,
            group_thousands(s.total_movements),
            s.scroll_events,
            self.unique_hover_locations(),
        )
    }
}

/// Format a count with comma thousands separators.
#[must_use]
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
