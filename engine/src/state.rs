//! Root state object of one clock visualization.
//!
//! `VisualizationState` owns the cursor, the active filter and the input adapters, and
//! shares the read-only dataset through an `Rc`. Every handler follows the same order:
//! update the clock time, then the bucket index, then render, then return. Hosts embed
//! the state in an `Rc<RefCell<_>>` when playback needs to call back into it.

use log::{debug, info, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::VisualizationConfig;
use crate::error::EngineResult;
use crate::input::{DragTrack, InputEvent, StepDirection, WheelAccumulator};
use crate::models::{Dataset, Period};
use crate::services::aggregation::{
    aggregate, AggregationOptions, AggregationResult, CategoryFilter,
};
use crate::services::buckets::BucketIndex;
use crate::services::cursor::TimeCursor;
use crate::services::gradient::{self, contrast_text_color, BackgroundScale, Palette, Rgb};
use crate::services::playback::{FrameScheduler, PlaybackDriver};
use crate::time::codec::{
    classify_period, format_continuous_hours_to_12h, validate_labels, LabelReport,
};

/// Receives a snapshot after every navigation or filter change.
pub trait RenderSink {
    fn render(&mut self, snapshot: &Snapshot);
}

impl<F> RenderSink for F
where
    F: FnMut(&Snapshot),
{
    fn render(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// `None` only when the dataset has no bucket at all.
    pub bucket_label: Option<String>,
    pub bucket_index: usize,
    pub bucket_count: usize,
    pub continuous_hours: f64,
    /// Drag handle x coordinate on the track for the clock time.
    pub track_position: f64,
    /// Clock time as "H:MM AM/PM".
    pub clock_display: String,
    /// Selected bucket time as "H:MM AM/PM".
    pub bucket_display: Option<String>,
    pub period: Period,
    pub palette: &'static Palette,
    pub background_color: Rgb,
    pub text_color: Rgb,
    pub filter: Option<String>,
    pub aggregation: AggregationResult,
    /// Nothing matched the bucket and filter; the renderer must clear its chart.
    pub no_data: bool,
}

pub struct VisualizationState {
    config: VisualizationConfig,
    options: AggregationOptions,
    dataset: Rc<Dataset>,
    buckets: BucketIndex,
    label_report: LabelReport,
    cursor: TimeCursor,
    filter: Option<CategoryFilter>,
    wheel: WheelAccumulator,
    track: DragTrack,
    background: BackgroundScale,
    playback: PlaybackDriver,
    sink: Box<dyn RenderSink>,
}

impl VisualizationState {
    /// Build the bucket index, validate its labels and place the cursor at the configured
    /// start time. Nothing is rendered until the first input or an explicit
    /// [`render_current`](Self::render_current).
    pub fn new(
        config: VisualizationConfig,
        dataset: Rc<Dataset>,
        sink: Box<dyn RenderSink>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let buckets = BucketIndex::build(dataset.records(), config.hour_convention);
        let label_report = validate_labels(buckets.labels(), config.hour_convention);
        if !label_report.is_clean() {
            warn!(
                "{} of {} time buckets do not follow the {:?} convention",
                label_report.rejected.len(),
                label_report.checked,
                config.hour_convention
            );
        }

        let cursor = TimeCursor::initialize(&buckets, config.start_time)
            .with_step_minutes(config.step_minutes);
        info!(
            "Visualization ready: {} records, {} buckets, start {} (bucket {})",
            dataset.len(),
            buckets.len(),
            config.start_time,
            cursor.current_index()
        );

        Ok(Self {
            options: config.aggregation_options(),
            wheel: WheelAccumulator::new(config.wheel_threshold),
            track: config.track.to_track(),
            playback: PlaybackDriver::new(config.loop_duration_ms),
            background: BackgroundScale::default(),
            filter: None,
            config,
            dataset,
            buckets,
            label_report,
            cursor,
            sink,
        })
    }

    pub fn config(&self) -> &VisualizationConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn buckets(&self) -> &BucketIndex {
        &self.buckets
    }

    pub fn cursor(&self) -> &TimeCursor {
        &self.cursor
    }

    pub fn filter(&self) -> Option<&CategoryFilter> {
        self.filter.as_ref()
    }

    pub fn label_report(&self) -> &LabelReport {
        &self.label_report
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_running()
    }

    /// Derived state for the current cursor position and filter.
    pub fn snapshot(&self) -> Snapshot {
        let hours = self.cursor.continuous_hours();
        let bucket = self.buckets.get(self.cursor.current_index());
        let aggregation = match bucket {
            Some(bucket) => aggregate(
                self.dataset.records(),
                &bucket.label,
                self.filter.as_ref(),
                &self.options,
            ),
            None => AggregationResult::default(),
        };
        let background = self.background.color_at(hours);
        let period = classify_period(hours);

        Snapshot {
            bucket_label: bucket.map(|b| b.label.clone()),
            bucket_index: self.cursor.current_index(),
            bucket_count: self.buckets.len(),
            continuous_hours: hours,
            track_position: self.track.position_of(hours),
            clock_display: format_continuous_hours_to_12h(hours),
            bucket_display: bucket.map(|b| format_continuous_hours_to_12h(b.hours)),
            period,
            palette: gradient::palette_for(period),
            background_color: background,
            text_color: contrast_text_color(background),
            filter: self.filter.as_ref().map(|f| f.as_str().to_string()),
            no_data: aggregation.is_empty(),
            aggregation,
        }
    }

    /// Render the current state unconditionally.
    pub fn render_current(&mut self) -> Snapshot {
        let snapshot = self.snapshot();
        self.sink.render(&snapshot);
        snapshot
    }

    fn render_if(&mut self, changed: bool) -> Option<Snapshot> {
        changed.then(|| self.render_current())
    }

    /// Accumulate a wheel delta; renders only when the threshold is crossed.
    pub fn on_wheel_delta(&mut self, delta: f64) -> Option<Snapshot> {
        let direction = self.wheel.push(delta)?;
        let moved = match direction {
            StepDirection::Forward => self.cursor.step_forward(&self.buckets),
            StepDirection::Backward => self.cursor.step_backward(&self.buckets),
        };
        self.render_if(moved)
    }

    /// Pointer drag at `x` on the horizontal track.
    pub fn on_drag_position(&mut self, x: f64) -> Option<Snapshot> {
        let hours = self.track.hours_at(x);
        debug!("Drag at x={} -> {:.3} h", x, hours);
        let moved = self.cursor.seek_to_continuous(&self.buckets, hours);
        self.render_if(moved)
    }

    /// Discrete slider positioned on a bucket index.
    pub fn on_slider_index(&mut self, index: usize) -> Option<Snapshot> {
        let moved = self.cursor.seek_to_bucket_index(&self.buckets, index);
        self.render_if(moved)
    }

    /// Continuous slider positioned on an hour value in `[0, 24]`.
    pub fn on_slider_continuous(&mut self, hours: f64) -> Option<Snapshot> {
        let moved = self.cursor.seek_to_continuous(&self.buckets, hours);
        self.render_if(moved)
    }

    /// Previous/next buttons: move one bucket, clamped at both ends.
    pub fn on_next_bucket(&mut self) -> Option<Snapshot> {
        let index = self.cursor.current_index().saturating_add(1);
        let moved = self.cursor.seek_to_bucket_index(&self.buckets, index);
        self.render_if(moved)
    }

    pub fn on_previous_bucket(&mut self) -> Option<Snapshot> {
        let index = self.cursor.current_index().saturating_sub(1);
        let moved = self.cursor.seek_to_bucket_index(&self.buckets, index);
        self.render_if(moved)
    }

    /// Change the vehicle-type filter. Always renders, even when nothing matches.
    pub fn on_filter_changed(&mut self, selection: &str) -> Snapshot {
        self.filter = CategoryFilter::from_selection(selection);
        debug!("Filter changed to {:?}", self.filter.as_ref().map(|f| f.as_str()));
        self.render_current()
    }

    /// Playback frame positioned at `hours`.
    pub fn on_frame_tick(&mut self, hours: f64) -> Option<Snapshot> {
        let moved = self.cursor.seek_to_continuous(&self.buckets, hours);
        self.render_if(moved)
    }

    /// Route a host event to its handler.
    pub fn dispatch(&mut self, event: InputEvent) -> Option<Snapshot> {
        match event {
            InputEvent::Wheel(delta) => self.on_wheel_delta(delta),
            InputEvent::Drag(x) => self.on_drag_position(x),
            InputEvent::SliderIndex(index) => self.on_slider_index(index),
            InputEvent::SliderHours(hours) => self.on_slider_continuous(hours),
            InputEvent::Filter(selection) => Some(self.on_filter_changed(&selection)),
            InputEvent::NextBucket => self.on_next_bucket(),
            InputEvent::PreviousBucket => self.on_previous_bucket(),
        }
    }

    /// Frame callback that forwards playback hours to [`on_frame_tick`](Self::on_frame_tick).
    ///
    /// Holds only a weak reference, so a scheduler that outlives the state does not keep
    /// it alive; frames after the state is dropped are ignored.
    pub fn playback_target(this: &Rc<RefCell<Self>>) -> impl FnMut(f64) + 'static {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(this);
        move |hours: f64| {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().on_frame_tick(hours);
            }
        }
    }

    /// Start playback on `scheduler`. Returns `false` if it was already running.
    pub fn start_playback<S>(this: &Rc<RefCell<Self>>, scheduler: &mut S, now_ms: f64) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        let target = Self::playback_target(this);
        this.borrow_mut().playback.start(scheduler, now_ms, target)
    }

    /// Stop playback; no frame callback runs after this returns.
    pub fn stop_playback<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        self.playback.stop(scheduler)
    }

    /// Play/pause button. Returns whether playback is running afterwards.
    pub fn toggle_playback<S>(this: &Rc<RefCell<Self>>, scheduler: &mut S, now_ms: f64) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        let target = Self::playback_target(this);
        let running = this.borrow_mut().playback.toggle(scheduler, now_ms, target);
        info!("Playback {}", if running { "playing" } else { "paused" });
        running
    }
}
