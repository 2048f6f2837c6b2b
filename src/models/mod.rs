//! Pretrained regression model: artifact loading and evaluation.
//!
//! The rest of the crate only sees the [`Regressor`] trait, so the prediction
//! path takes the model as an explicit dependency and tests can swap in fixed
//! outputs.

pub mod artifact;
pub mod model;

pub use artifact::*;
pub use model::*;
