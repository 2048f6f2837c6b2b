//! Feature engineering: the fixed-order model input derived from a vehicle.

pub mod transform;

pub use transform::*;
