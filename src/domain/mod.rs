//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the raw request (`VehicleSpec`) and its enums (`Cylinders`, `Origin`)
//! - input bounds shared by the form and the CLI (`bounds`)
//! - the clamped model output (`Prediction`)

pub mod prediction;
pub mod vehicle;

pub use prediction::*;
pub use vehicle::*;
