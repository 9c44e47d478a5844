//! Collision Clock Replay Binary
//!
//! Headless host for the engine. Loads a dataset, replays a script of input events (or a
//! single playback loop when no script is given) and prints one JSON snapshot per render
//! on stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin clock-replay -- data/collisions.csv script.txt
//! CLOCK_DATASET=data/collisions.csv cargo run --bin clock-replay
//! ```
//!
//! # Script format
//!
//! One event per line; blank lines and lines starting with `#` are ignored.
//!
//! - `wheel <delta>`, `drag <x>`, `slider <index>`, `hour <hours>`
//! - `filter <vehicle type>` (`filter All` clears it), `next`, `prev`
//! - `render`: render the current state
//! - `play <frames> <interval_ms>`: run playback for a number of frames
//!
//! # Environment Variables
//!
//! - `CLOCK_DATASET`: Dataset path when none is given on the command line
//! - `CLOCK_CONFIG`: Config file (default: `collision_clock.toml` search, then defaults)
//! - `RUST_LOG`: Log level (default: info)

use std::cell::RefCell;
use std::env;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{bail, Context};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use collision_clock::input::InputEvent;
use collision_clock::io::DatasetLoader;
use collision_clock::services::ManualScheduler;
use collision_clock::{Snapshot, VisualizationConfig, VisualizationState};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays one JSON document per line
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let dataset_path = args
        .next()
        .map(PathBuf::from)
        .or_else(|| env::var("CLOCK_DATASET").ok().map(PathBuf::from))
        .context("No dataset given (pass a path or set CLOCK_DATASET)")?;
    let script_path = args.next().map(PathBuf::from);

    let config = load_config()?;
    let dataset = DatasetLoader::load_from_file(&dataset_path)
        .with_context(|| format!("Failed to load dataset {}", dataset_path.display()))?;
    let report = dataset.report();
    info!(
        "Dataset loaded: {} rows, {} skipped, {} unrecognized injuries",
        report.rows_read, report.rows_skipped, report.unrecognized_injuries
    );

    let sink = |snapshot: &Snapshot| match serde_json::to_string(snapshot) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("Failed to serialize snapshot: {}", e),
    };
    let state = Rc::new(RefCell::new(VisualizationState::new(
        config,
        Rc::new(dataset),
        Box::new(sink),
    )?));

    match script_path {
        Some(path) => run_script(&state, &path)?,
        None => {
            state.borrow_mut().render_current();
            let frames = 24;
            let interval = state.borrow().config().loop_duration_ms as f64 / frames as f64;
            play(&state, frames, interval);
        }
    }

    Ok(())
}

fn load_config() -> anyhow::Result<VisualizationConfig> {
    if let Ok(path) = env::var("CLOCK_CONFIG") {
        return VisualizationConfig::from_file(&path)
            .with_context(|| format!("Failed to load config {}", path));
    }
    match VisualizationConfig::from_default_location() {
        Ok(config) => Ok(config),
        Err(e) => {
            info!("Using default configuration ({})", e);
            Ok(VisualizationConfig::default())
        }
    }
}

fn run_script(state: &Rc<RefCell<VisualizationState>>, path: &Path) -> anyhow::Result<()> {
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;

    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut words = line.split_whitespace();
        match words.next() {
            Some("render") => {
                state.borrow_mut().render_current();
            }
            Some("play") => {
                let frames: usize = parse_word(words.next(), "frame count", number)?;
                let interval: f64 = parse_word(words.next(), "interval", number)?;
                play(state, frames, interval);
            }
            _ => match line.parse::<InputEvent>() {
                Ok(event) => {
                    if state.borrow_mut().dispatch(event).is_none() {
                        info!("Line {}: '{}' caused no render", number + 1, line);
                    }
                }
                Err(e) => warn!("Line {}: {}", number + 1, e),
            },
        }
    }

    Ok(())
}

fn parse_word<T: std::str::FromStr>(
    word: Option<&str>,
    what: &str,
    number: usize,
) -> anyhow::Result<T> {
    match word.map(str::parse::<T>) {
        Some(Ok(value)) => Ok(value),
        _ => bail!("Line {}: play expects a {}", number + 1, what),
    }
}

fn play(state: &Rc<RefCell<VisualizationState>>, frames: usize, interval_ms: f64) {
    let mut scheduler = ManualScheduler::new();
    VisualizationState::start_playback(state, &mut scheduler, 0.0);
    for frame in 0..frames {
        scheduler.advance(frame as f64 * interval_ms);
    }
    state.borrow_mut().stop_playback(&mut scheduler);
    info!("Played {} frames at {} ms", frames, interval_ms);
}
