//! Input collection: bounded controls and the vehicle form built from them.

pub mod control;
pub mod vehicle;

pub use control::*;
pub use vehicle::*;
