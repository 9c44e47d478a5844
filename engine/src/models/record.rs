use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Placeholder used wherever a free-text field is blank.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Injury severity recorded for a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjuryCategory {
    Major,
    Minor,
    Fatal,
    None,
}

impl InjuryCategory {
    /// Canonical display order.
    pub const ALL: [InjuryCategory; 4] = [
        InjuryCategory::Major,
        InjuryCategory::Minor,
        InjuryCategory::Fatal,
        InjuryCategory::None,
    ];

    /// Parse a raw dataset value. Blank or unrecognized values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InjuryCategory::Major => "Major",
            InjuryCategory::Minor => "Minor",
            InjuryCategory::Fatal => "Fatal",
            InjuryCategory::None => "None",
        }
    }

    /// Position in [`InjuryCategory::ALL`].
    pub fn ordinal(&self) -> usize {
        match self {
            InjuryCategory::Major => 0,
            InjuryCategory::Minor => 1,
            InjuryCategory::Fatal => 2,
            InjuryCategory::None => 3,
        }
    }
}

impl fmt::Display for InjuryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field reported as the "most accidents on" breakdown of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryAttribute {
    #[default]
    RoadClass,
    VehicleType,
}

impl SecondaryAttribute {
    pub fn value_of<'a>(&self, record: &'a CollisionRecord) -> &'a str {
        match self {
            SecondaryAttribute::RoadClass => &record.road_class,
            SecondaryAttribute::VehicleType => &record.vehicle_type,
        }
    }
}

/// One row of the collision dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionRecord {
    /// `None` when the injury column is blank or holds an unrecognized value.
    pub injury: Option<InjuryCategory>,
    pub time_bucket: String,
    pub vehicle_type: String,
    pub road_class: String,
}

impl CollisionRecord {
    pub fn new(
        injury: Option<InjuryCategory>,
        time_bucket: impl Into<String>,
        vehicle_type: impl Into<String>,
        road_class: impl Into<String>,
    ) -> Self {
        Self {
            injury,
            time_bucket: time_bucket.into(),
            vehicle_type: vehicle_type.into(),
            road_class: road_class.into(),
        }
    }
}

/// Counters collected while reading a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: usize,
    /// Rows the reader could not decode at all.
    pub rows_skipped: usize,
    /// Rows whose injury value was non-blank but not a known category.
    pub unrecognized_injuries: usize,
}

/// The full, read-only record set.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<CollisionRecord>,
    report: LoadReport,
}

impl Dataset {
    pub fn new(records: Vec<CollisionRecord>) -> Self {
        let report = LoadReport {
            rows_read: records.len(),
            ..Default::default()
        };
        Self { records, report }
    }

    pub fn with_report(records: Vec<CollisionRecord>, report: LoadReport) -> Self {
        Self { records, report }
    }

    pub fn records(&self) -> &[CollisionRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct non-blank vehicle types, sorted, for populating a filter selector.
    pub fn vehicle_types(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.vehicle_type.trim())
            .filter(|v| !v.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
