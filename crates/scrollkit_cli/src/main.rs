//! scrollkit CLI
//!
//! Headless tooling for the scrollkit scrollbar engine:
//!
//! - `scrollkit replay <script.json>`: replay a pointer script against a
//!   scrollbar and print committed positions and presentation changes
//! - `scrollkit geometry`: print the slider geometry for given sizes

mod replay;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use scrollkit_widgets::{ScrollbarOptions, ScrollbarState};

use crate::replay::Replay;
use crate::script::Script;

/// Headless tooling for the scrollkit scrollbar engine
#[derive(Parser, Debug)]
#[command(name = "scrollkit")]
#[command(about = "Replay pointer scripts against a headless scrollbar")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a pointer script
    Replay {
        /// JSON script to replay
        script: PathBuf,

        /// TOML scrollbar options (defaults when omitted)
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Print the slider geometry for the given sizes
    Geometry {
        /// Viewport size
        #[arg(long)]
        visible: f32,

        /// Content size
        #[arg(long)]
        scroll: f32,

        /// Scrollbar length in pixels
        #[arg(long)]
        size: f32,

        /// Scroll position
        #[arg(long, default_value = "0")]
        position: f32,

        /// Pixels reserved by each end arrow
        #[arg(long, default_value = "0")]
        arrow_size: f32,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct GeometryReport {
    is_needed: bool,
    track_size: f32,
    slider_size: f32,
    slider_position: f32,
    slider_ratio: f32,
    max_scroll_position: f32,
}

impl From<&ScrollbarState> for GeometryReport {
    fn from(state: &ScrollbarState) -> Self {
        Self {
            is_needed: state.is_needed(),
            track_size: state.track_size(),
            slider_size: state.slider_size(),
            slider_position: state.slider_position(),
            slider_ratio: state.slider_ratio(),
            max_scroll_position: state.max_scroll_position(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Replay {
            script,
            options,
            json,
        } => cmd_replay(script, options, json),
        Commands::Geometry {
            visible,
            scroll,
            size,
            position,
            arrow_size,
            json,
        } => cmd_geometry(visible, scroll, size, position, arrow_size, json),
    }
}

fn cmd_replay(script_path: PathBuf, options_path: Option<PathBuf>, json: bool) -> Result<()> {
    let options = match &options_path {
        Some(path) => ScrollbarOptions::load_from_file(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ScrollbarOptions::default(),
    };
    let script = Script::load(&script_path)?;

    info!(
        "Replaying {} step(s) from {}",
        script.steps.len(),
        script_path.display()
    );

    let mut replay = Replay::new(options, script.surface.clone());
    let events = replay.run(&script)?;

    for event in &events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!("{}", event);
        }
    }

    info!("Final position: {}", replay.position());
    Ok(())
}

fn cmd_geometry(
    visible: f32,
    scroll: f32,
    size: f32,
    position: f32,
    arrow_size: f32,
    json: bool,
) -> Result<()> {
    let mut state = ScrollbarState::new(arrow_size, size);
    state.set_visible_size(visible);
    state.set_scroll_size(scroll);
    state.set_scroll_position(position);

    let report = GeometryReport::from(&state);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("needed:          {}", report.is_needed);
        println!("track size:      {}", report.track_size);
        println!("slider size:     {}", report.slider_size);
        println!("slider position: {}", report.slider_position);
        println!("slider ratio:    {}", report.slider_ratio);
        println!("max position:    {}", report.max_scroll_position);
    }
    Ok(())
}
