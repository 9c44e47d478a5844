//! # Collision Clock
//!
//! Time-bucket navigation and aggregation engine for a time-of-day collision
//! visualization.
//!
//! The dataset is a flat list of collision records, each tagged with a 12-hour time
//! bucket label ("6:00 PM"). This crate keeps the "current time" of a clock-style
//! visualization, maps scroll, drag, slider and animation input onto the nearest
//! reachable bucket, aggregates the records of that bucket by injury severity, and hands
//! a ready-to-draw [`state::Snapshot`] to a render sink.
//!
//! ## Features
//!
//! - **Time Handling**: Tolerant 12-hour label parsing, formatting and period
//!   classification
//! - **Navigation**: Sorted bucket index with nearest and directional lookup, a wrapping
//!   wall-clock cursor
//! - **Aggregation**: Per-bucket injury breakdown with dominant road class or vehicle
//!   type, optional daily-average scaling
//! - **Playback**: Continuous 24-hour animation through a cancellable frame scheduler
//! - **Data Loading**: CSV and JSON dataset loaders tolerant of missing columns
//!
//! ## Architecture
//!
//! - [`models`]: Records, datasets and clock value types
//! - [`time`]: Label codec and period classification
//! - [`services`]: Bucket index, cursor, aggregation, gradients and playback
//! - [`input`]: Wheel accumulation, drag mapping and scripted input events
//! - [`state`]: `VisualizationState`, the per-instance root object
//! - [`io`]: Dataset loaders
//! - [`config`]: TOML configuration
//!
//! The engine is single-threaded. Shared ownership uses `Rc<RefCell<_>>` and every
//! state transition happens synchronously inside an input handler or frame callback.

pub mod config;
pub mod error;
pub mod input;
pub mod io;
pub mod models;
pub mod services;
pub mod state;
pub mod time;

pub use config::VisualizationConfig;
pub use error::{EngineError, EngineResult, LabelError};
pub use state::{RenderSink, Snapshot, VisualizationState};
