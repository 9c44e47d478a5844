use chrono::{Duration, NaiveTime};
use log::debug;

use super::buckets::BucketIndex;
use crate::time::codec::{continuous_hours_to_time, time_to_continuous_hours, time_to_minutes};

/// Quantum used by wheel-driven stepping.
pub const DEFAULT_STEP_MINUTES: u32 = 30;

/// Latest continuous time a seek can select: 11:59 PM.
const LAST_MINUTE_HOURS: f64 = 23.0 + 59.0 / 60.0;

/// Navigation state of one visualization: the wall-clock time shown on the clock and the
/// dataset bucket currently selected.
///
/// The cursor does not own the bucket index; every operation takes it by reference so the
/// index stays immutable and shareable. While the index is empty every operation is a
/// no-op and returns `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeCursor {
    current_time: NaiveTime,
    current_index: usize,
    step_minutes: u32,
}

impl TimeCursor {
    /// Position the cursor at `start` and select the nearest bucket (index 0 when empty).
    pub fn initialize(buckets: &BucketIndex, start: NaiveTime) -> Self {
        Self {
            current_time: start,
            current_index: buckets.nearest(time_to_continuous_hours(start)),
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }

    pub fn with_step_minutes(mut self, step_minutes: u32) -> Self {
        self.step_minutes = step_minutes.max(1);
        self
    }

    pub fn current_time(&self) -> NaiveTime {
        self.current_time
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    pub fn continuous_hours(&self) -> f64 {
        time_to_continuous_hours(self.current_time)
    }

    pub fn current_label<'a>(&self, buckets: &'a BucketIndex) -> Option<&'a str> {
        buckets.label(self.current_index)
    }

    /// Advance the clock by one step, then move to the next bucket reachable at or after
    /// the new time. The clock keeps moving past the last bucket; the index does not.
    pub fn step_forward(&mut self, buckets: &BucketIndex) -> bool {
        if buckets.is_empty() {
            return false;
        }
        self.advance_clock(self.step_minutes as i64);
        let minutes = time_to_minutes(self.current_time);
        self.current_index = buckets.next_at_or_after(self.current_index, minutes);
        debug!(
            "Stepped forward to {} (bucket {})",
            self.current_time, self.current_index
        );
        true
    }

    /// Move the clock back by one step, then to the previous bucket reachable at or
    /// before the new time.
    pub fn step_backward(&mut self, buckets: &BucketIndex) -> bool {
        if buckets.is_empty() {
            return false;
        }
        self.advance_clock(-(self.step_minutes as i64));
        let minutes = time_to_minutes(self.current_time);
        self.current_index = buckets.prev_at_or_before(self.current_index, minutes);
        debug!(
            "Stepped backward to {} (bucket {})",
            self.current_time, self.current_index
        );
        true
    }

    /// Select a bucket directly (discrete slider, prev/next buttons). The index is clamped
    /// and the clock snaps to the selected bucket's time.
    pub fn seek_to_bucket_index(&mut self, buckets: &BucketIndex, index: usize) -> bool {
        let Some(bucket) = buckets.get(buckets.clamp_index(index)) else {
            return false;
        };
        self.current_index = buckets.clamp_index(index);
        self.current_time = continuous_hours_to_time(bucket.hours);
        true
    }

    /// Set the continuous time (continuous slider, drag, animation frame) and select the
    /// nearest bucket.
    ///
    /// Out-of-range hours clamp to the ends of the day (non-finite input to midnight),
    /// so the clock and the selected bucket always describe the same time.
    pub fn seek_to_continuous(&mut self, buckets: &BucketIndex, hours: f64) -> bool {
        if buckets.is_empty() {
            return false;
        }
        let hours = if hours.is_finite() {
            hours.clamp(0.0, LAST_MINUTE_HOURS)
        } else {
            0.0
        };
        self.current_time = continuous_hours_to_time(hours);
        self.current_index = buckets.nearest(hours);
        true
    }

    // Wraps at midnight like a wall clock.
    fn advance_clock(&mut self, minutes: i64) {
        let (time, _) = self
            .current_time
            .overflowing_add_signed(Duration::minutes(minutes));
        self.current_time = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourConvention;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn quarter_day() -> BucketIndex {
        BucketIndex::from_labels(
            ["12:00 AM", "6:00 AM", "12:00 PM", "6:00 PM"],
            HourConvention::TwelveHourClock,
        )
    }

    #[test]
    fn test_initialize_selects_nearest_bucket() {
        let buckets = quarter_day();
        let cursor = TimeCursor::initialize(&buckets, time(18, 30));
        assert_eq!(cursor.current_index(), 3);
        assert_eq!(cursor.current_label(&buckets), Some("6:00 PM"));
    }

    #[test]
    fn test_initialize_on_empty_index() {
        let buckets = BucketIndex::default();
        let cursor = TimeCursor::initialize(&buckets, time(18, 30));
        assert_eq!(cursor.current_index(), 0);
        assert_eq!(cursor.current_label(&buckets), None);
    }

    #[test]
    fn test_step_forward_past_last_bucket_keeps_index() {
        let buckets = quarter_day();
        let mut cursor = TimeCursor::initialize(&buckets, time(18, 30));
        assert!(cursor.step_forward(&buckets));
        assert_eq!(cursor.current_time(), time(19, 0));
        assert_eq!(cursor.current_index(), 3);
    }

    #[test]
    fn test_step_forward_moves_to_next_distinct_bucket() {
        let buckets = quarter_day();
        let mut cursor = TimeCursor::initialize(&buckets, time(0, 0));
        cursor.step_forward(&buckets);
        assert_eq!(cursor.current_time(), time(0, 30));
        assert_eq!(cursor.current_index(), 1);
    }

    #[test]
    fn test_step_backward() {
        let buckets = quarter_day();
        let mut cursor = TimeCursor::initialize(&buckets, time(18, 0));
        cursor.step_backward(&buckets);
        assert_eq!(cursor.current_time(), time(17, 30));
        assert_eq!(cursor.current_index(), 2);
    }

    #[test]
    fn test_step_backward_wraps_clock_at_midnight() {
        let buckets = quarter_day();
        let mut cursor = TimeCursor::initialize(&buckets, time(0, 0));
        cursor.step_backward(&buckets);
        assert_eq!(cursor.current_time(), time(23, 30));
        assert_eq!(cursor.current_index(), 0);
    }

    #[test]
    fn test_custom_step_quantum() {
        let buckets = quarter_day();
        let mut cursor = TimeCursor::initialize(&buckets, time(6, 0)).with_step_minutes(360);
        cursor.step_forward(&buckets);
        assert_eq!(cursor.current_time(), time(12, 0));
        assert_eq!(cursor.current_index(), 2);
    }

    #[test]
    fn test_seek_to_bucket_index_clamps_and_snaps_clock() {
        let buckets = quarter_day();
        let mut cursor = TimeCursor::initialize(&buckets, time(0, 0));
        assert!(cursor.seek_to_bucket_index(&buckets, 99));
        assert_eq!(cursor.current_index(), 3);
        assert_eq!(cursor.current_time(), time(18, 0));
    }

    #[test]
    fn test_seek_to_continuous() {
        let buckets = quarter_day();
        let mut cursor = TimeCursor::initialize(&buckets, time(0, 0));
        assert!(cursor.seek_to_continuous(&buckets, 10.25));
        assert_eq!(cursor.current_time(), time(10, 15));
        assert_eq!(cursor.current_index(), 2);
    }

    #[test]
    fn test_seek_to_continuous_clamps_out_of_range_hours() {
        let buckets = quarter_day();
        let mut cursor = TimeCursor::initialize(&buckets, time(12, 0));

        cursor.seek_to_continuous(&buckets, 30.0);
        assert_eq!(cursor.current_time(), time(23, 59));
        assert_eq!(cursor.current_index(), 3);

        // Right end of a drag track
        cursor.seek_to_continuous(&buckets, 24.0);
        assert_eq!(cursor.current_time(), time(23, 59));
        assert_eq!(cursor.current_index(), 3);

        cursor.seek_to_continuous(&buckets, -3.0);
        assert_eq!(cursor.current_time(), time(0, 0));
        assert_eq!(cursor.current_index(), 0);

        cursor.seek_to_continuous(&buckets, f64::NAN);
        assert_eq!(cursor.current_time(), time(0, 0));
        assert_eq!(cursor.current_index(), 0);
    }

    #[test]
    fn test_operations_are_noops_without_buckets() {
        let buckets = BucketIndex::default();
        let mut cursor = TimeCursor::initialize(&buckets, time(8, 0));
        let before = cursor.clone();

        assert!(!cursor.step_forward(&buckets));
        assert!(!cursor.step_backward(&buckets));
        assert!(!cursor.seek_to_bucket_index(&buckets, 2));
        assert!(!cursor.seek_to_continuous(&buckets, 14.0));
        assert_eq!(cursor, before);
    }
}
