//! Service layer: the navigation and aggregation engine.
//!
//! This module contains the pieces that sit between raw input and the render sink. The
//! bucket index and cursor resolve "where on the clock are we", the aggregator computes
//! what to draw for that bucket, and the gradient and playback services handle
//! time-of-day styling and continuous animation.

pub mod aggregation;
pub mod buckets;
pub mod cursor;
pub mod gradient;
pub mod playback;

pub use aggregation::{
    aggregate, AggregationOptions, AggregationResult, CategoryCount, CategoryFilter,
    DominantAttribute,
};
pub use buckets::{BucketIndex, TimeBucket};
pub use cursor::{TimeCursor, DEFAULT_STEP_MINUTES};
pub use gradient::{contrast_text_color, BackgroundScale, Palette, Rgb};
pub use playback::{
    playback_hours, FrameCallback, FrameHandle, FrameScheduler, ManualScheduler,
    PlaybackDriver, DEFAULT_LOOP_DURATION_MS,
};
