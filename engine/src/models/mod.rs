pub mod record;
pub mod time;

pub use record::*;
pub use time::*;
