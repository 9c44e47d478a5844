#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use collision_clock::models::{CollisionRecord, Dataset, InjuryCategory};
use collision_clock::{RenderSink, Snapshot, VisualizationConfig, VisualizationState};

pub type Rendered = Rc<RefCell<Vec<Snapshot>>>;

/// Sink that keeps every rendered snapshot for later assertions.
pub fn recording_sink() -> (Rendered, Box<dyn RenderSink>) {
    let rendered: Rendered = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&rendered);
    (
        rendered,
        Box::new(move |snapshot: &Snapshot| log.borrow_mut().push(snapshot.clone())),
    )
}

pub fn record(bucket: &str, injury: &str, vehicle: &str, road: &str) -> CollisionRecord {
    CollisionRecord::new(InjuryCategory::parse(injury), bucket, vehicle, road)
}

/// Four buckets six hours apart, busiest at 6:00 PM.
pub fn four_bucket_dataset() -> Dataset {
    Dataset::new(vec![
        record("12:00 AM", "Minor", "Automobile", "Local"),
        record("6:00 AM", "None", "Truck", "Expressway"),
        record("12:00 PM", "Minor", "Automobile", "Collector"),
        record("6:00 PM", "Major", "Automobile", "Highway"),
        record("6:00 PM", "Major", "Motorcycle", "Highway"),
        record("6:00 PM", "Minor", "Automobile", "Local"),
    ])
}

/// Dataset CSV in the column layout of the source export.
pub const COLLISIONS_CSV: &str = "\
Time of Collision BUCKET,Injury,Vehicle Type,ROAD_CLASS
6:00 PM,Major,Automobile,Highway
6:00 PM,Major,Pick Up Truck,Highway
6:00 PM,Minor,Automobile,Local
6:00 PM,,Automobile,Local
6:00 PM,Fatal,Bicycle,
7:30 AM,Minor,Bicycle,Collector
7:30 AM,Minor,Truck,Collector
12:00 AM,None,Automobile,Major Arterial
";

/// State over `dataset` with `config`, recording every render.
pub fn recording_state(
    config: VisualizationConfig,
    dataset: Dataset,
) -> (Rendered, Rc<RefCell<VisualizationState>>) {
    let (rendered, sink) = recording_sink();
    let state = VisualizationState::new(config, Rc::new(dataset), sink)
        .expect("valid test configuration");
    (rendered, Rc::new(RefCell::new(state)))
}

/// 12-hour label ("6:05 PM") for minutes since midnight.
pub fn label_for_minutes(minutes: u32) -> String {
    let hour = minutes / 60 % 24;
    let minute = minutes % 60;
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    let marker = if hour < 12 { "AM" } else { "PM" };
    format!("{}:{:02} {}", display, minute, marker)
}
