//! Travel-time matrices.
//!
//! Provides a dense whole-minute matrix with an unreachable sentinel and a
//! great-circle fallback for when no routing provider is available.

mod matrix;

pub use matrix::{haversine_km, TravelTimeMatrix, UNREACHABLE};
