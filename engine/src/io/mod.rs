//! Dataset loading.
//!
//! Loaders turn a CSV export (or an equivalent JSON array of rows) into a read-only
//! [`Dataset`](crate::models::Dataset). Missing columns and blank cells are tolerated;
//! rows that cannot be decoded are skipped and counted in the load report.
//!
//! # Example
//!
//! ```no_run
//! use collision_clock::io::DatasetLoader;
//! use std::path::Path;
//!
//! let dataset = DatasetLoader::load_from_file(Path::new("collisions.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} records", dataset.len());
//! ```

pub mod loaders;


pub use loaders::{DatasetLoader, DatasetSourceType, RawCollisionRow};
