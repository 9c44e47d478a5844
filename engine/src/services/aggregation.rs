//! Per-bucket aggregation of collision records.
//!
//! Every navigation or filter change rebuilds the result from the full record set; there
//! is no incremental update.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{CollisionRecord, InjuryCategory, SecondaryAttribute, UNKNOWN_LABEL};

/// Vehicle-type filter with "contains" semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter(String);

impl CategoryFilter {
    /// Build a filter from a selector value. Blank values and "All" mean no filter.
    pub fn from_selection(selection: &str) -> Option<Self> {
        let value = selection.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Records with a blank vehicle type never match an active filter.
    pub fn matches(&self, vehicle_type: &str) -> bool {
        !vehicle_type.trim().is_empty() && vehicle_type.contains(self.0.as_str())
    }
}

/// Deployment-level aggregation settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregationOptions {
    pub secondary: SecondaryAttribute,
    /// Divisor producing a daily-average value (e.g. days covered by the source data).
    pub scaling_constant: Option<f64>,
}

/// Most frequent secondary value within one injury category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantAttribute {
    pub label: String,
    pub count: usize,
}

impl DominantAttribute {
    /// Whether the winner is a real value rather than the blank placeholder.
    pub fn is_known(&self) -> bool {
        self.label != UNKNOWN_LABEL
    }

    /// Percentage of the category's records carrying this value.
    pub fn share_of(&self, category_count: usize) -> f64 {
        percentage(self.count, category_count)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: InjuryCategory,
    pub count: usize,
    /// `count / scaling_constant` when a scaling constant is configured.
    pub scaled: Option<f64>,
    pub dominant: Option<DominantAttribute>,
}

impl CategoryCount {
    /// Percentage of the bucket total.
    pub fn share_of(&self, total: usize) -> f64 {
        percentage(self.count, total)
    }
}

/// Injury breakdown for one bucket. Only categories with records appear, in canonical
/// order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregationResult {
    pub bucket: String,
    pub total: usize,
    pub categories: Vec<CategoryCount>,
}

impl AggregationResult {
    pub fn empty(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            total: 0,
            categories: vec![],
        }
    }

    /// No record matched; renderers must show an explicit no-data state.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, category: InjuryCategory) -> Option<&CategoryCount> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Categories ordered by descending count, for layouts that place the largest first.
    /// Equal counts keep canonical order.
    pub fn sorted_by_count_desc(&self) -> Vec<CategoryCount> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| b.count.cmp(&a.count));
        categories
    }
}

/// Aggregate the records of `bucket_label`, optionally narrowed by a vehicle-type filter.
pub fn aggregate(
    records: &[CollisionRecord],
    bucket_label: &str,
    filter: Option<&CategoryFilter>,
    options: &AggregationOptions,
) -> AggregationResult {
    let mut by_category: [Vec<&CollisionRecord>; 4] = Default::default();

    for record in records
        .iter()
        .filter(|r| r.time_bucket == bucket_label)
        .filter(|r| filter.map_or(true, |f| f.matches(&r.vehicle_type)))
    {
        if let Some(category) = record.injury {
            by_category[category.ordinal()].push(record);
        }
    }

    let scaling = options.scaling_constant.filter(|c| c.is_finite() && *c > 0.0);
    let categories: Vec<CategoryCount> = InjuryCategory::ALL
        .into_iter()
        .zip(by_category.iter())
        .filter(|(_, group)| !group.is_empty())
        .map(|(category, group)| CategoryCount {
            category,
            count: group.len(),
            scaled: scaling.map(|c| group.len() as f64 / c),
            dominant: dominant_attribute(group, options.secondary),
        })
        .collect();

    let total = categories.iter().map(|c| c.count).sum();
    debug!(
        "Aggregated bucket '{}' (filter={:?}): total={} categories={}",
        bucket_label,
        filter.map(|f| f.as_str()),
        total,
        categories.len()
    );

    AggregationResult {
        bucket: bucket_label.to_string(),
        total,
        categories,
    }
}

/// Most frequent secondary value; ties go to the first value encountered, and the blank
/// placeholder only wins when nothing else is present.
fn dominant_attribute(
    records: &[&CollisionRecord],
    secondary: SecondaryAttribute,
) -> Option<DominantAttribute> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for record in records {
        let value = secondary.value_of(record).trim();
        let key = if value.is_empty() { UNKNOWN_LABEL } else { value };
        *counts.entry(key).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (&label, &count) in counts.iter().filter(|(label, _)| **label != UNKNOWN_LABEL) {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }

    best.or_else(|| counts.get(UNKNOWN_LABEL).map(|&count| (UNKNOWN_LABEL, count)))
        .map(|(label, count)| DominantAttribute {
            label: label.to_string(),
            count,
        })
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        bucket: &str,
        injury: Option<InjuryCategory>,
        vehicle: &str,
        road: &str,
    ) -> CollisionRecord {
        CollisionRecord::new(injury, bucket, vehicle, road)
    }

    fn evening_records() -> Vec<CollisionRecord> {
        vec![
            record("6:00 PM", Some(InjuryCategory::Major), "Automobile", "Highway"),
            record("6:00 PM", Some(InjuryCategory::Major), "Truck", "Highway"),
            record("6:00 PM", Some(InjuryCategory::Minor), "Automobile", "Local"),
        ]
    }

    #[test]
    fn test_aggregate_counts_and_dominant_road() {
        let result = aggregate(&evening_records(), "6:00 PM", None, &AggregationOptions::default());

        assert_eq!(result.total, 3);
        assert_eq!(result.categories.len(), 2);
        let major = &result.categories[0];
        assert_eq!(major.category, InjuryCategory::Major);
        assert_eq!(major.count, 2);
        assert_eq!(
            major.dominant,
            Some(DominantAttribute {
                label: "Highway".to_string(),
                count: 2
            })
        );
        let minor = &result.categories[1];
        assert_eq!(minor.category, InjuryCategory::Minor);
        assert_eq!(minor.count, 1);
        assert_eq!(minor.dominant.as_ref().unwrap().label, "Local");
    }

    #[test]
    fn test_aggregate_other_bucket_is_excluded() {
        let mut records = evening_records();
        records.push(record("6:30 PM", Some(InjuryCategory::Fatal), "Truck", "Highway"));
        let result = aggregate(&records, "6:30 PM", None, &AggregationOptions::default());
        assert_eq!(result.total, 1);
        assert_eq!(result.categories[0].category, InjuryCategory::Fatal);
    }

    #[test]
    fn test_aggregate_filter_uses_contains() {
        let records = vec![
            record("6:00 PM", Some(InjuryCategory::Minor), "Pick Up Truck", "Local"),
            record("6:00 PM", Some(InjuryCategory::Minor), "Truck - Open", "Local"),
            record("6:00 PM", Some(InjuryCategory::Minor), "Automobile", "Local"),
            record("6:00 PM", Some(InjuryCategory::Minor), "", "Local"),
        ];
        let filter = CategoryFilter::from_selection("Truck");
        let options = AggregationOptions::default();
        let result = aggregate(&records, "6:00 PM", filter.as_ref(), &options);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_aggregate_filter_without_matches_is_empty() {
        let filter = CategoryFilter::from_selection("Bicycle");
        let result = aggregate(
            &evening_records(),
            "6:00 PM",
            filter.as_ref(),
            &AggregationOptions::default(),
        );
        assert_eq!(result.total, 0);
        assert!(result.categories.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_selection_all_means_no_filter() {
        assert_eq!(CategoryFilter::from_selection("All"), None);
        assert_eq!(CategoryFilter::from_selection("  "), None);
        assert_eq!(
            CategoryFilter::from_selection(" Bicycle ").map(|f| f.as_str().to_string()),
            Some("Bicycle".to_string())
        );
    }

    #[test]
    fn test_blank_injuries_are_dropped() {
        let records = vec![
            record("6:00 PM", None, "Automobile", "Local"),
            record("6:00 PM", Some(InjuryCategory::None), "Automobile", "Local"),
        ];
        let result = aggregate(&records, "6:00 PM", None, &AggregationOptions::default());
        assert_eq!(result.total, 1);
        assert_eq!(result.categories[0].category, InjuryCategory::None);
    }

    #[test]
    fn test_categories_follow_canonical_order() {
        let records = vec![
            record("1:00 AM", Some(InjuryCategory::None), "", ""),
            record("1:00 AM", Some(InjuryCategory::Fatal), "", ""),
            record("1:00 AM", Some(InjuryCategory::Major), "", ""),
            record("1:00 AM", Some(InjuryCategory::None), "", ""),
        ];
        let result = aggregate(&records, "1:00 AM", None, &AggregationOptions::default());
        let order: Vec<InjuryCategory> = result.categories.iter().map(|c| c.category).collect();
        assert_eq!(
            order,
            vec![InjuryCategory::Major, InjuryCategory::Fatal, InjuryCategory::None]
        );

        let sorted: Vec<InjuryCategory> = result
            .sorted_by_count_desc()
            .iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(
            sorted,
            vec![InjuryCategory::None, InjuryCategory::Major, InjuryCategory::Fatal]
        );
    }

    #[test]
    fn test_dominant_tie_goes_to_first_encountered() {
        let records = vec![
            record("6:00 PM", Some(InjuryCategory::Minor), "", "Local"),
            record("6:00 PM", Some(InjuryCategory::Minor), "", "Collector"),
            record("6:00 PM", Some(InjuryCategory::Minor), "", "Collector"),
            record("6:00 PM", Some(InjuryCategory::Minor), "", "Local"),
        ];
        let result = aggregate(&records, "6:00 PM", None, &AggregationOptions::default());
        assert_eq!(result.categories[0].dominant.as_ref().unwrap().label, "Local");
    }

    #[test]
    fn test_unknown_only_wins_when_alone() {
        let records = vec![
            record("6:00 PM", Some(InjuryCategory::Major), "", ""),
            record("6:00 PM", Some(InjuryCategory::Major), "", " "),
            record("6:00 PM", Some(InjuryCategory::Major), "", "Expressway"),
            record("6:00 PM", Some(InjuryCategory::Fatal), "", ""),
        ];
        let result = aggregate(&records, "6:00 PM", None, &AggregationOptions::default());

        let major = result.get(InjuryCategory::Major).unwrap();
        let dominant = major.dominant.as_ref().unwrap();
        assert_eq!(dominant.label, "Expressway");
        assert_eq!(dominant.count, 1);
        assert!(dominant.is_known());

        let fatal = result.get(InjuryCategory::Fatal).unwrap();
        let dominant = fatal.dominant.as_ref().unwrap();
        assert_eq!(dominant.label, UNKNOWN_LABEL);
        assert!(!dominant.is_known());
    }

    #[test]
    fn test_dominant_by_vehicle_type() {
        let options = AggregationOptions {
            secondary: SecondaryAttribute::VehicleType,
            scaling_constant: None,
        };
        let result = aggregate(&evening_records(), "6:00 PM", None, &options);
        assert_eq!(
            result.get(InjuryCategory::Major).unwrap().dominant.as_ref().unwrap().label,
            "Automobile"
        );
    }

    #[test]
    fn test_scaling_constant_keeps_raw_count() {
        let options = AggregationOptions {
            secondary: SecondaryAttribute::RoadClass,
            scaling_constant: Some(6205.0),
        };
        let result = aggregate(&evening_records(), "6:00 PM", None, &options);
        let major = result.get(InjuryCategory::Major).unwrap();
        assert_eq!(major.count, 2);
        assert!((major.scaled.unwrap() - 2.0 / 6205.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_positive_scaling_constant_is_ignored() {
        let options = AggregationOptions {
            secondary: SecondaryAttribute::RoadClass,
            scaling_constant: Some(0.0),
        };
        let result = aggregate(&evening_records(), "6:00 PM", None, &options);
        assert!(result.categories.iter().all(|c| c.scaled.is_none()));
    }

    #[test]
    fn test_shares() {
        let result = aggregate(&evening_records(), "6:00 PM", None, &AggregationOptions::default());
        let major = result.get(InjuryCategory::Major).unwrap();
        assert!((major.share_of(result.total) - 66.666).abs() < 0.01);
        assert_eq!(major.dominant.as_ref().unwrap().share_of(major.count), 100.0);
        assert_eq!(major.share_of(0), 0.0);
    }
}
