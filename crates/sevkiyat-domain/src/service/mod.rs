//! Domain services

pub mod aggregate;
pub mod dedupe;
pub mod identity;
pub mod vehicle;
pub mod weeks;

pub use aggregate::{aggregate, DateShiftFilter};
pub use dedupe::dedupe;
pub use identity::{match_personnel, normalize_name};
pub use vehicle::{base_plate, classify_vehicle, double_trip_count};
pub use weeks::{bucket_into_weeks, week_index, WeekBucket};
