//! Domain model types for multi-trip vehicle routing.
//!
//! Provides stops with demands and time windows, the trip-slot expansion of
//! a physical fleet, the validated problem instance, and solved plans.

mod fleet;
mod instance;
mod solution;
mod stop;

pub use fleet::{expand_trip_slots, slot_index, TripSlot};
pub use instance::{ProblemInput, RoutingInstance};
pub use solution::{Solution, TripPlan};
pub use stop::{Stop, StopRecord, TimeWindow};
