//! Time-of-day handling: label parsing, 12-hour formatting and period classification.

pub mod codec;

pub use codec::{
    classify_period, continuous_hours_to_time, format_continuous_hours_to_12h,
    parse_label_to_continuous_hours, parse_label_to_minutes, time_to_continuous_hours,
    time_to_minutes, try_parse_label, validate_labels, LabelReport,
};
