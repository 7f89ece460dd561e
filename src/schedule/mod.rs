//! Route & schedule extraction for presentation layers.

mod extractor;

pub use extractor::{
    extract_schedule, format_clock, trip_paths, PlanReport, ScheduleRow, TripPath, NO_VALUE,
};
