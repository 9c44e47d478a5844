//! Continuous playback across a full day.
//!
//! Playback maps elapsed wall time onto the 24-hour clock and runs through a
//! [`FrameScheduler`]: the host's per-frame callback mechanism in a browser, or the
//! deterministic [`ManualScheduler`] in tests and headless replays. The driver keeps the
//! handle of its periodic callback and cancels it on stop, so no frame runs after
//! `stop` returns.

use log::debug;

/// Default time for one full 24-hour loop.
pub const DEFAULT_LOOP_DURATION_MS: u64 = 30_000;

/// Callback invoked with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnMut(f64)>;

/// Opaque handle of a scheduled periodic callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Host facility that runs a callback once per animation frame until cancelled.
pub trait FrameScheduler {
    fn schedule_periodic(&mut self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a callback. Cancelling an unknown or already cancelled handle is a no-op.
    fn cancel(&mut self, handle: FrameHandle);
}

/// In-process scheduler driven explicitly through [`ManualScheduler::advance`].
#[derive(Default)]
pub struct ManualScheduler {
    next_id: u64,
    callbacks: Vec<(FrameHandle, FrameCallback)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every live callback once with `timestamp_ms`; returns how many ran.
    pub fn advance(&mut self, timestamp_ms: f64) -> usize {
        for (_, callback) in self.callbacks.iter_mut() {
            callback(timestamp_ms);
        }
        self.callbacks.len()
    }

    pub fn active(&self) -> usize {
        self.callbacks.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_periodic(&mut self, callback: FrameCallback) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.callbacks.push((handle, callback));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.callbacks.retain(|(h, _)| *h != handle);
    }
}

/// Continuous-hour position for `elapsed_ms` into a loop of `loop_duration_ms`.
pub fn playback_hours(elapsed_ms: f64, loop_duration_ms: u64) -> f64 {
    if loop_duration_ms == 0 || !elapsed_ms.is_finite() {
        return 0.0;
    }
    let duration = loop_duration_ms as f64;
    let progress = elapsed_ms.max(0.0).rem_euclid(duration) / duration;
    progress * 24.0
}

/// Running/stopped playback state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackDriver {
    loop_duration_ms: u64,
    handle: Option<FrameHandle>,
}

impl Default for PlaybackDriver {
    fn default() -> Self {
        Self::new(DEFAULT_LOOP_DURATION_MS)
    }
}

impl PlaybackDriver {
    pub fn new(loop_duration_ms: u64) -> Self {
        Self {
            loop_duration_ms,
            handle: None,
        }
    }

    pub fn loop_duration_ms(&self) -> u64 {
        self.loop_duration_ms
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start playback at `started_at_ms`. Each frame converts its timestamp to a
    /// continuous hour and hands it to `on_frame`. Returns `false` if already running.
    pub fn start<S, F>(&mut self, scheduler: &mut S, started_at_ms: f64, mut on_frame: F) -> bool
    where
        S: FrameScheduler + ?Sized,
        F: FnMut(f64) + 'static,
    {
        if self.handle.is_some() {
            return false;
        }
        let loop_duration_ms = self.loop_duration_ms;
        let handle = scheduler.schedule_periodic(Box::new(move |timestamp_ms: f64| {
            on_frame(playback_hours(timestamp_ms - started_at_ms, loop_duration_ms));
        }));
        debug!("Playback started ({} ms per day)", loop_duration_ms);
        self.handle = Some(handle);
        true
    }

    /// Stop playback. The next scheduled frame will not run. Returns `false` if the
    /// driver was not running.
    pub fn stop<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        match self.handle.take() {
            Some(handle) => {
                scheduler.cancel(handle);
                debug!("Playback stopped");
                true
            }
            None => false,
        }
    }

    /// Start when stopped, stop when running (play/pause button).
    pub fn toggle<S, F>(&mut self, scheduler: &mut S, now_ms: f64, on_frame: F) -> bool
    where
        S: FrameScheduler + ?Sized,
        F: FnMut(f64) + 'static,
    {
        if self.is_running() {
            self.stop(scheduler);
        } else {
            self.start(scheduler, now_ms, on_frame);
        }
        self.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<f64>>>, impl FnMut(f64) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |hours: f64| sink.borrow_mut().push(hours))
    }

    #[test]
    fn test_playback_hours() {
        assert_eq!(playback_hours(0.0, 30_000), 0.0);
        assert_eq!(playback_hours(15_000.0, 30_000), 12.0);
        assert_eq!(playback_hours(37_500.0, 30_000), 6.0);
        assert_eq!(playback_hours(-5.0, 30_000), 0.0);
        assert_eq!(playback_hours(1_000.0, 0), 0.0);
    }

    #[test]
    fn test_start_runs_frames_until_stopped() {
        let mut scheduler = ManualScheduler::new();
        let mut driver = PlaybackDriver::new(24_000);
        let (seen, on_frame) = recorder();

        assert!(driver.start(&mut scheduler, 1_000.0, on_frame));
        assert!(driver.is_running());
        scheduler.advance(1_000.0);
        scheduler.advance(7_000.0);
        scheduler.advance(13_000.0);

        assert!(driver.stop(&mut scheduler));
        assert_eq!(scheduler.advance(19_000.0), 0);
        assert_eq!(*seen.borrow(), vec![0.0, 6.0, 12.0]);
        assert!(!driver.is_running());
    }

    #[test]
    fn test_start_twice_keeps_single_callback() {
        let mut scheduler = ManualScheduler::new();
        let mut driver = PlaybackDriver::default();
        let (_, first) = recorder();
        let (_, second) = recorder();

        assert!(driver.start(&mut scheduler, 0.0, first));
        assert!(!driver.start(&mut scheduler, 0.0, second));
        assert_eq!(scheduler.active(), 1);
    }

    #[test]
    fn test_stop_when_not_running() {
        let mut scheduler = ManualScheduler::new();
        let mut driver = PlaybackDriver::default();
        assert!(!driver.stop(&mut scheduler));
    }

    #[test]
    fn test_toggle() {
        let mut scheduler = ManualScheduler::new();
        let mut driver = PlaybackDriver::default();
        let (_, first) = recorder();
        let (_, second) = recorder();

        assert!(driver.toggle(&mut scheduler, 0.0, first));
        assert!(!driver.toggle(&mut scheduler, 10.0, second));
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn test_loop_wraps_around() {
        let mut scheduler = ManualScheduler::new();
        let mut driver = PlaybackDriver::new(30_000);
        let (seen, on_frame) = recorder();

        driver.start(&mut scheduler, 0.0, on_frame);
        scheduler.advance(30_000.0);
        scheduler.advance(45_000.0);
        assert_eq!(*seen.borrow(), vec![0.0, 12.0]);
    }
}
