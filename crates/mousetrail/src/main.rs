//! `mousetrail` - CLI for recording mouse activity and rendering heatmaps
//!
//! This binary records sessions from the global input hook and renders
//! heatmaps and dashboards from saved sessions.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use mousetrail::cli::{
    AnalyzeCommand, Cli, Command, ConfigCommand, HeatmapCommand, RecordCommand, StatsCommand,
};
use mousetrail::render::{
    default_dashboard_path, default_heatmap_path, render_dashboard, render_movement_heatmap,
};
use mousetrail::session::group_thousands;
use mousetrail::{init_logging, platform, record_session, Config, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // The config subcommands load (or only locate) the file themselves
    let config_path = cli.config;
    match cli.command {
        Command::Record(cmd) => handle_record(load_config(config_path)?, &cmd).await,
        Command::Analyze(cmd) => handle_analyze(load_config(config_path)?, &cmd),
        Command::Heatmap(cmd) => handle_heatmap(load_config(config_path)?, cmd),
        Command::Stats(cmd) => handle_stats(&load_config(config_path)?, &cmd),
        Command::Sessions(cmd) => handle_sessions(&load_config(config_path)?, cmd.json),
        Command::Status(cmd) => handle_status(load_config(config_path)?, cmd.json),
        Command::Config(cmd) => handle_config(config_path, cmd),
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

/// Replace the configured screen size with the detected one when enabled.
fn resolve_screen(mut config: Config) -> Config {
    let (width, height) = platform::screen_size(&config.screen);
    config.screen.width = width;
    config.screen.height = height;
    config
}

async fn handle_record(config: Config, cmd: &RecordCommand) -> anyhow::Result<()> {
    platform::init()?;
    let config = resolve_screen(config);
    let mut monitor = platform::input_monitor()?;

    println!("Platform: {}", platform::name());
    println!(
        "Screen:   {}x{}",
        config.screen.width, config.screen.height
    );
    println!("Recording... press Escape or Ctrl-C to stop.");

    let session = record_session(monitor.as_mut(), &config.recording).await?;
    if session.is_empty() {
        println!("No mouse movement recorded; nothing saved.");
        return Ok(());
    }

    let store = SessionStore::new(config.data_dir());
    let files = store.save(&session).context("saving session")?;
    println!();
    println!("Session {} saved to {}", files.id, store.dir().display());
    println!();
    println!("{}", session.summary());

    if !cmd.no_dashboard {
        let path = default_dashboard_path(&config.heatmap_dir());
        render_dashboard(&session, &config, &path).context("rendering dashboard")?;
        println!();
        println!("Dashboard saved as {}", path.display());
    }
    Ok(())
}

fn handle_analyze(config: Config, cmd: &AnalyzeCommand) -> anyhow::Result<()> {
    let config = resolve_screen(config);
    let session = SessionStore::new(config.data_dir()).load(&cmd.session)?;

    let path = cmd
        .output
        .clone()
        .unwrap_or_else(|| default_dashboard_path(&config.heatmap_dir()));
    render_dashboard(&session, &config, &path)?;
    println!("Dashboard saved as {}", path.display());
    Ok(())
}

fn handle_heatmap(config: Config, cmd: HeatmapCommand) -> anyhow::Result<()> {
    let mut config = resolve_screen(config);
    if let Some(grid_size) = cmd.grid_size {
        config.heatmap.grid_size = grid_size;
    }
    if let Some(sigma) = cmd.sigma {
        config.heatmap.sigma = sigma;
    }
    config.validate()?;

    let session = SessionStore::new(config.data_dir()).load(&cmd.session)?;
    let path = cmd
        .output
        .unwrap_or_else(|| default_heatmap_path(&config.heatmap_dir()));
    render_movement_heatmap(&session, &config, &path)?;
    println!("Movement heatmap saved as {}", path.display());
    Ok(())
}

fn handle_stats(config: &Config, cmd: &StatsCommand) -> anyhow::Result<()> {
    let session = SessionStore::new(config.data_dir()).load(&cmd.session)?;

    if cmd.json {
        let out = serde_json::json!({
            "session": cmd.session,
            "stats": session.stats,
            "unique_hover_locations": session.unique_hover_locations(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", session.summary());
    }
    Ok(())
}

fn handle_sessions(config: &Config, json: bool) -> anyhow::Result<()> {
    let store = SessionStore::new(config.data_dir());
    let entries = store.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No sessions found in {}", store.dir().display());
        return Ok(());
    }

    println!("{:<17} {:>12}  {}", "SESSION", "SIZE", "FILES");
    for entry in &entries {
        println!(
            "{:<17} {:>12}  {}",
            entry.id,
            format!("{} B", group_thousands(entry.size_bytes as usize)),
            if entry.complete { "complete" } else { "movements only" }
        );
    }
    println!();
    println!("{} session(s) in {}", entries.len(), store.dir().display());
    Ok(())
}

fn handle_status(config: Config, json: bool) -> anyhow::Result<()> {
    let config = resolve_screen(config);
    let capture = platform::capture_status();
    let sessions = SessionStore::new(config.data_dir()).list()?.len();

    if json {
        let status = serde_json::json!({
            "platform": platform::name(),
            "capture": capture,
            "screen": { "width": config.screen.width, "height": config.screen.height },
            "data_dir": config.data_dir(),
            "heatmap_dir": config.heatmap_dir(),
            "sessions": sessions,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("mousetrail status");
        println!("-----------------");
        println!("Platform:      {}", platform::name());
        println!(
            "Input hook:    {}",
            if capture.compiled {
                "compiled in"
            } else {
                "not compiled in (build with --features input-hook)"
            }
        );
        match &capture.error {
            None => println!("Capture:       ready"),
            Some(e) if capture.permission_missing => {
                println!("Capture:       waiting for permission");
                println!("{e}");
            }
            Some(e) => println!("Capture:       unavailable: {e}"),
        }
        println!("Details:       {}", capture.details);
        println!(
            "Screen:        {}x{}",
            config.screen.width, config.screen.height
        );
        println!("Data dir:      {}", config.data_dir().display());
        println!("Heatmap dir:   {}", config.heatmap_dir().display());
        println!("Sessions:      {sessions}");
    }
    Ok(())
}

fn handle_config(config_path: Option<PathBuf>, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = &load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Screen]");
                println!(
                    "  Size:               {}x{}",
                    config.screen.width, config.screen.height
                );
                println!("  Detect:             {}", config.screen.detect);
                println!();
                println!("[Recording]");
                println!(
                    "  Hover cell size:    {} px",
                    config.recording.hover_cell_size
                );
                println!("  Stop on Escape:     {}", config.recording.stop_on_escape);
                println!(
                    "  Channel capacity:   {}",
                    config.recording.channel_capacity
                );
                println!();
                println!("[Heatmap]");
                println!("  Grid size:          {}", config.heatmap.grid_size);
                println!("  Sigma:              {}", config.heatmap.sigma);
                println!(
                    "  Image size:         {}x{}",
                    config.heatmap.image_width, config.heatmap.image_height
                );
                println!("  Alpha:              {}", config.heatmap.alpha);
                println!();
                println!("[Dashboard]");
                println!("  Timeline bins:      {}", config.dashboard.timeline_bins);
                println!("  Speed bins:         {}", config.dashboard.speed_bins);
                println!("  Hover bins:         {}", config.dashboard.hover_bins);
                println!("  Click grid size:    {}", config.dashboard.click_gridsize);
                println!(
                    "  Path points:        {}..{}",
                    config.dashboard.path_min_points, config.dashboard.path_max_points
                );
                println!();
                println!("[Output]");
                println!("  Data dir:           {}", config.data_dir().display());
                println!("  Heatmap dir:        {}", config.heatmap_dir().display());
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
