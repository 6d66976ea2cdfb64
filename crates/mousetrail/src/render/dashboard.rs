//! Self-contained HTML analytics dashboard.
//!
//! The movement heatmap is embedded as a base64 PNG; every other panel is
//! inline SVG, so the file opens in any browser without extra assets.

use std::fmt::Write;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::info;

use super::colormap::{reds, to_hex};
use super::ensure_parent;
use super::heatmap::{encode_png, movement_heatmap};
use crate::analysis::{hexbin, histogram, sample_path, HexGrid, Histogram};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{group_thousands, Session};

const TEMPLATE: &str = include_str!("../../templates/dashboard.html");

const TITLE: &str = "Mouse Analytics Dashboard";

/// SVG viewport of a regular panel.
const PANEL: (f64, f64) = (420.0, 300.0);

/// SVG viewport of the path panel.
const WIDE_PANEL: (f64, f64) = (1260.0, 420.0);

/// Plot margins: left, top, right, bottom.
const MARGINS: (f64, f64, f64, f64) = (48.0, 12.0, 12.0, 40.0);

/// Inner plotting rectangle of a panel.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl PlotArea {
    fn of(panel: (f64, f64)) -> Self {
        let (left, top, right, bottom) = MARGINS;
        Self {
            x: left,
            y: top,
            w: panel.0 - left - right,
            h: panel.1 - top - bottom,
        }
    }

    /// Map screen coordinates onto the plot, keeping screen orientation.
    fn project(&self, screen: (f64, f64), x: f64, y: f64) -> (f64, f64) {
        (self.x + x / screen.0 * self.w, self.y + y / screen.1 * self.h)
    }
}

fn open_svg(out: &mut String, panel: (f64, f64)) {
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\">",
        panel.0, panel.1
    );
}

fn axes(
    out: &mut String,
    area: PlotArea,
    x_range: (f64, f64),
    y_max: &str,
    labels: (&str, &str),
) {
    let bottom = area.y + area.h;
    let _ = writeln!(
        out,
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"#444\"/>",
        area.x, area.y, area.w, area.h
    );
    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\">{:.1}</text>",
        area.x,
        bottom + 12.0,
        x_range.0
    );
    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\">{:.1}</text>",
        area.x + area.w,
        bottom + 12.0,
        x_range.1
    );
    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\">{y_max}</text>",
        area.x - 4.0,
        area.y + 10.0
    );
    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"end\">0</text>",
        area.x - 4.0,
        bottom
    );
    let _ = writeln!(
        out,
        "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{}</text>",
        area.x + area.w / 2.0,
        bottom + 30.0,
        labels.0
    );
    let _ = writeln!(
        out,
        "<text x=\"12\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\" transform=\"rotate(-90 12 {:.1})\">{}</text>",
        area.y + area.h / 2.0,
        area.y + area.h / 2.0,
        labels.1
    );
}

/// Placeholder shown in panels without data.
#[must_use]
pub fn placeholder(message: &str) -> String {
    format!("<div class=\"placeholder\">{message}</div>")
}

/// Bar chart of a histogram.
#[must_use]
pub fn histogram_svg(hist: &Histogram, fill: &str, x_label: &str, y_label: &str) -> String {
    let area = PlotArea::of(PANEL);
    let mut svg = String::new();
    open_svg(&mut svg, PANEL);

    let max = hist.max_count().max(1) as f64;
    let bar_w = area.w / hist.counts.len().max(1) as f64;
    for (i, &count) in hist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let bar_h = count as f64 / max * area.h;
        let _ = writeln!(
            svg,
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{fill}\" fill-opacity=\"0.7\" stroke=\"#000\" stroke-width=\"0.5\"/>",
            area.x + i as f64 * bar_w,
            area.y + area.h - bar_h,
            bar_w,
            bar_h
        );
    }

    let x_range = (
        hist.edges.first().copied().unwrap_or(0.0),
        hist.edges.last().copied().unwrap_or(0.0),
    );
    axes(
        &mut svg,
        area,
        x_range,
        &hist.max_count().to_string(),
        (x_label, y_label),
    );
    svg.push_str("</svg>");
    svg
}

/// Hexagon map of click positions over the screen.
#[must_use]
pub fn hexbin_svg(grid: &HexGrid, screen: (f64, f64)) -> String {
    let area = PlotArea::of(PANEL);
    let mut svg = String::new();
    open_svg(&mut svg, PANEL);
    let _ = writeln!(
        svg,
        "<defs><clipPath id=\"click-area\"><rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\"/></clipPath></defs>",
        area.x, area.y, area.w, area.h
    );
    svg.push_str("<g clip-path=\"url(#click-area)\">\n");

    let max = grid.max_count().max(1) as f64;
    for bin in &grid.bins {
        let points: Vec<String> = grid
            .vertices(bin.x, bin.y)
            .iter()
            .map(|&(x, y)| {
                let (px, py) = area.project(screen, x, y);
                format!("{px:.2},{py:.2}")
            })
            .collect();
        let color = to_hex(reds(bin.count as f64 / max));
        let _ = writeln!(
            svg,
            "<polygon points=\"{}\" fill=\"{color}\" fill-opacity=\"0.8\"><title>{} clicks</title></polygon>",
            points.join(" "),
            bin.count
        );
    }

    svg.push_str("</g>\n");
    axes(
        &mut svg,
        area,
        (0.0, screen.0),
        &format!("{:.0}", screen.1),
        ("X Position", "Y Position"),
    );
    svg.push_str("</svg>");
    svg
}

/// Polyline of the sampled path with start and end markers.
#[must_use]
pub fn path_svg(path: &[(f64, f64)], screen: (f64, f64)) -> String {
    let area = PlotArea::of(WIDE_PANEL);
    let mut svg = String::new();
    open_svg(&mut svg, WIDE_PANEL);

    let points: Vec<String> = path
        .iter()
        .map(|&(x, y)| {
            let (px, py) = area.project(screen, x, y);
            format!("{px:.1},{py:.1}")
        })
        .collect();
    let _ = writeln!(
        svg,
        "<polyline points=\"{}\" fill=\"none\" stroke=\"blue\" stroke-opacity=\"0.6\" stroke-width=\"0.8\"/>",
        points.join(" ")
    );

    let markers = [(path.first(), "green", "Start"), (path.last(), "red", "End")];
    for (i, (point, color, label)) in markers.into_iter().enumerate() {
        if let Some(&(x, y)) = point {
            let (px, py) = area.project(screen, x, y);
            let _ = writeln!(
                svg,
                "<circle cx=\"{px:.1}\" cy=\"{py:.1}\" r=\"5\" fill=\"{color}\"><title>{label}</title></circle>"
            );
        }
        // Legend
        let ly = area.y + 14.0 + i as f64 * 16.0;
        let lx = area.x + area.w - 70.0;
        let _ = writeln!(
            svg,
            "<circle cx=\"{lx:.1}\" cy=\"{:.1}\" r=\"5\" fill=\"{color}\"/><text x=\"{:.1}\" y=\"{ly:.1}\" font-size=\"11\">{label}</text>",
            ly - 4.0,
            lx + 10.0
        );
    }

    axes(
        &mut svg,
        area,
        (0.0, screen.0),
        &format!("{:.0}", screen.1),
        ("X Position", "Y Position"),
    );
    svg.push_str("</svg>");
    svg
}

/// Statistics block.
#[must_use]
pub fn stats_block(session: &Session) -> String {
    let s = &session.stats;
    format!(
        "<div class=\"stats\">Session Statistics:\n\n\
         Total Time: {:.1}s\n\
         Total Distance: {:.0}px\n\
         Average Speed: {:.1}px/s\n\
         Max Speed: {:.1}px/s\n\
         Total Clicks: {}\n\
         Mouse Movements: {}\n\
         Scroll Events: {}</div>",
        s.total_time,
        s.total_distance,
        s.avg_speed,
        s.max_speed,
        s.total_clicks,
        group_thousands(s.total_movements),
        s.scroll_events,
    )
}

/// Build the dashboard document.
///
/// # Errors
///
/// Returns [`Error::NoData`] if the session has no movements.
pub fn dashboard_html(session: &Session, config: &Config, generated: &str) -> Result<String> {
    if session.is_empty() {
        return Err(Error::NoData { what: "movement" });
    }
    let panels = &config.dashboard;
    let screen = config.screen_extent();

    let heatmap_png = STANDARD.encode(encode_png(&movement_heatmap(session, config)?)?);

    let presses = session.press_positions();
    let (click_title, click_panel) = if presses.is_empty() {
        ("Click Heatmap".to_string(), placeholder("No clicks recorded"))
    } else {
        let grid = hexbin(&presses, panels.click_gridsize, None);
        (
            format!("Click Heatmap ({} clicks)", presses.len()),
            hexbin_svg(&grid, screen),
        )
    };

    let timestamps: Vec<f64> = session.moves.iter().map(|m| m.timestamp).collect();
    let timeline_panel = histogram_svg(
        &histogram(&timestamps, panels.timeline_bins),
        "blue",
        "Time (seconds)",
        "Activity Count",
    );

    let speeds: Vec<f64> = session
        .moves
        .iter()
        .map(|m| m.speed)
        .filter(|s| *s > 0.0)
        .collect();
    let speed_panel = if speeds.is_empty() {
        placeholder("No movement speed recorded")
    } else {
        histogram_svg(
            &histogram(&speeds, panels.speed_bins),
            "green",
            "Speed (pixels/second)",
            "Frequency",
        )
    };

    let durations: Vec<f64> = session.hover.values().copied().collect();
    let hover_panel = if durations.is_empty() {
        placeholder("No hover data")
    } else {
        histogram_svg(
            &histogram(&durations, panels.hover_bins),
            "orange",
            "Duration (seconds)",
            "Frequency",
        )
    };

    let path = sample_path(
        &session.moves,
        panels.path_min_points,
        panels.path_max_points,
    );
    let path_panel = if path.is_empty() {
        placeholder(&format!(
            "Path shown for sessions with more than {} movements",
            panels.path_min_points
        ))
    } else {
        path_svg(&path, screen)
    };

    let mut output = TEMPLATE.to_string();
    output = output.replace("{{title}}", TITLE);
    output = output.replace("{{generated}}", generated);
    output = output.replace("{{move_count}}", &group_thousands(session.moves.len()));
    output = output.replace("{{heatmap_png}}", &heatmap_png);
    output = output.replace("{{click_title}}", &click_title);
    output = output.replace("{{click_panel}}", &click_panel);
    output = output.replace("{{timeline_panel}}", &timeline_panel);
    output = output.replace("{{speed_panel}}", &speed_panel);
    output = output.replace("{{hover_panel}}", &hover_panel);
    output = output.replace("{{stats_panel}}", &stats_block(session));
    output = output.replace("{{path_panel}}", &path_panel);
    Ok(output)
}

/// Render the dashboard for a session to an HTML file.
///
/// # Errors
///
/// Returns [`Error::NoData`] if the session has no movements, or an error if
/// the file cannot be written.
pub fn render_dashboard(session: &Session, config: &Config, path: &Path) -> Result<()> {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let html = dashboard_html(session, config, &generated)?;
    ensure_parent(path)?;
    std::fs::write(path, html)?;
    info!("Dashboard saved as {}", path.display());
    Ok(())
}
