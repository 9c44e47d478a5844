use log::debug;
use serde::Serialize;
use std::collections::HashSet;

use crate::models::{CollisionRecord, HourConvention};
use crate::time::codec::{parse_label_to_continuous_hours, parse_label_to_minutes};

/// One distinct time bucket of the dataset with its parsed position on the clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    pub label: String,
    pub hours: f64,
    pub minutes: u32,
}

/// Chronologically ordered, deduplicated time buckets.
///
/// Built once per dataset and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct BucketIndex {
    buckets: Vec<TimeBucket>,
    convention: HourConvention,
}

impl BucketIndex {
    /// Derive the index from the time-bucket column of `records`.
    pub fn build(records: &[CollisionRecord], convention: HourConvention) -> Self {
        Self::from_labels(records.iter().map(|r| r.time_bucket.as_str()), convention)
    }

    /// Build from raw labels: blanks are dropped, duplicates collapse to their first
    /// occurrence, and the result is stable-sorted by continuous time.
    pub fn from_labels<'a, I>(labels: I, convention: HourConvention) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut buckets: Vec<TimeBucket> = labels
            .into_iter()
            .filter(|label| !label.trim().is_empty())
            .filter(|label| seen.insert(*label))
            .map(|label| TimeBucket {
                label: label.to_string(),
                hours: parse_label_to_continuous_hours(label, convention),
                minutes: parse_label_to_minutes(label, convention),
            })
            .collect();

        // sort_by is stable: labels with equal times keep encounter order
        buckets.sort_by(|a, b| {
            a.hours
                .partial_cmp(&b.hours)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!("Built bucket index with {} buckets", buckets.len());
        Self {
            buckets,
            convention,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn convention(&self) -> HourConvention {
        self.convention
    }

    pub fn get(&self, index: usize) -> Option<&TimeBucket> {
        self.buckets.get(index)
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.buckets.get(index).map(|b| b.label.as_str())
    }

    pub fn hours(&self, index: usize) -> Option<f64> {
        self.buckets.get(index).map(|b| b.hours)
    }

    pub fn minutes(&self, index: usize) -> Option<u32> {
        self.buckets.get(index).map(|b| b.minutes)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.label.as_str())
    }

    pub fn buckets(&self) -> &[TimeBucket] {
        &self.buckets
    }

    /// Clamp `index` into `[0, len - 1]`; `0` when empty.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.buckets.len().saturating_sub(1))
    }

    /// Index of the bucket closest to `target_hours`.
    ///
    /// Linear scan; on exact ties the first (lowest) index wins. Returns `0` when empty.
    pub fn nearest(&self, target_hours: f64) -> usize {
        let mut closest = 0;
        let mut min_difference = f64::INFINITY;
        for (i, bucket) in self.buckets.iter().enumerate() {
            let difference = (bucket.hours - target_hours).abs();
            if difference < min_difference {
                min_difference = difference;
                closest = i;
            }
        }
        closest
    }

    /// First bucket after `from` whose time is `>= target_minutes`, or `from` unchanged.
    pub fn next_at_or_after(&self, from: usize, target_minutes: u32) -> usize {
        self.buckets
            .iter()
            .enumerate()
            .skip(from.saturating_add(1))
            .find(|(_, b)| b.minutes >= target_minutes)
            .map(|(i, _)| i)
            .unwrap_or(from)
    }

    /// First bucket before `from`, scanning backwards, whose time is `<= target_minutes`,
    /// or `from` unchanged.
    pub fn prev_at_or_before(&self, from: usize, target_minutes: u32) -> usize {
        let end = from.min(self.buckets.len());
        self.buckets[..end]
            .iter()
            .enumerate()
            .rev()
            .find(|(_, b)| b.minutes <= target_minutes)
            .map(|(i, _)| i)
            .unwrap_or(from)
    }
}
