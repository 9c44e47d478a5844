use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{CollisionRecord, Dataset, InjuryCategory, LoadReport};

/// Source format of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSourceType {
    Csv,
    Json,
}

impl DatasetSourceType {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| EngineError::dataset_load("File has no extension", path))?;

        match extension.to_lowercase().as_str() {
            "csv" => Ok(DatasetSourceType::Csv),
            "json" => Ok(DatasetSourceType::Json),
            other => Err(EngineError::dataset_load(
                format!("Unsupported file format: {}", other),
                path,
            )),
        }
    }
}

/// One row as it appears in the source export. Every column is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCollisionRow {
    #[serde(rename = "Time of Collision BUCKET", default)]
    pub time_bucket: Option<String>,
    #[serde(rename = "Injury", default)]
    pub injury: Option<String>,
    #[serde(rename = "Vehicle Type", default)]
    pub vehicle_type: Option<String>,
    #[serde(rename = "ROAD_CLASS", default)]
    pub road_class: Option<String>,
}

impl RawCollisionRow {
    /// Convert to a record. The injury is `None` when blank or unrecognized; the second
    /// value tells whether it was unrecognized.
    pub fn into_record(self) -> (CollisionRecord, bool) {
        let raw_injury = self.injury.unwrap_or_default();
        let injury = InjuryCategory::parse(&raw_injury);
        let unrecognized = injury.is_none() && !raw_injury.trim().is_empty();

        let record = CollisionRecord::new(
            injury,
            self.time_bucket.unwrap_or_default().trim(),
            self.vehicle_type.unwrap_or_default().trim(),
            self.road_class.unwrap_or_default().trim(),
        );
        (record, unrecognized)
    }
}

/// Unified interface for loading collision datasets from CSV or JSON.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a dataset from a file (auto-detects CSV or JSON).
    pub fn load_from_file(path: &Path) -> EngineResult<Dataset> {
        match DatasetSourceType::from_path(path)? {
            DatasetSourceType::Csv => Self::load_from_csv(path),
            DatasetSourceType::Json => Self::load_from_json(path),
        }
    }

    /// Load a dataset from a CSV file with a header row.
    pub fn load_from_csv(csv_path: &Path) -> EngineResult<Dataset> {
        let file = std::fs::File::open(csv_path).map_err(|e| {
            EngineError::dataset_load(format!("Failed to open CSV file: {}", e), csv_path)
        })?;
        let dataset = Self::load_from_reader(file)?;
        info!(
            "Loaded {} collision records from {}",
            dataset.len(),
            csv_path.display()
        );
        Ok(dataset)
    }

    /// Load a dataset from CSV content.
    pub fn load_from_csv_str(content: &str) -> EngineResult<Dataset> {
        Self::load_from_reader(content.as_bytes())
    }

    /// Load a dataset from any CSV reader.
    pub fn load_from_reader<R: Read>(reader: R) -> EngineResult<Dataset> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        // Fail early on an unreadable header; row errors are tolerated below.
        csv_reader.headers()?;

        let mut rows = Vec::new();
        let mut skipped = 0;
        for (line, result) in csv_reader.deserialize::<RawCollisionRow>().enumerate() {
            match result {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!("Skipping unreadable CSV row {}: {}", line + 2, e);
                    skipped += 1;
                }
            }
        }

        Ok(Self::build_dataset(rows, skipped))
    }

    /// Load a dataset from a JSON array of row objects keyed by column name.
    pub fn load_from_json(json_path: &Path) -> EngineResult<Dataset> {
        let content = std::fs::read_to_string(json_path).map_err(|e| {
            EngineError::dataset_load(format!("Failed to read JSON file: {}", e), json_path)
        })?;
        Self::load_from_json_str(&content)
            .map_err(|e| EngineError::dataset_load(e.to_string(), json_path))
    }

    /// Load a dataset from a JSON string.
    pub fn load_from_json_str(json_str: &str) -> EngineResult<Dataset> {
        let rows: Vec<RawCollisionRow> = serde_json::from_str(json_str).map_err(|e| {
            EngineError::InvalidInput(format!("Failed to parse JSON dataset: {}", e))
        })?;
        Ok(Self::build_dataset(rows, 0))
    }

    fn build_dataset(rows: Vec<RawCollisionRow>, rows_skipped: usize) -> Dataset {
        let mut report = LoadReport {
            rows_read: rows.len(),
            rows_skipped,
            unrecognized_injuries: 0,
        };

        let records: Vec<CollisionRecord> = rows
            .into_iter()
            .map(|row| {
                let (record, unrecognized) = row.into_record();
                if unrecognized {
                    report.unrecognized_injuries += 1;
                }
                record
            })
            .collect();

        if report.unrecognized_injuries > 0 {
            warn!(
                "{} rows have an unrecognized injury value and are excluded from aggregation",
                report.unrecognized_injuries
            );
        }

        Dataset::with_report(records, report)
    }
}
