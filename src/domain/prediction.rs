//! Clamped fuel-efficiency estimate.

use serde::Serialize;

/// Lowest MPG value ever reported.
pub const MPG_MIN: f64 = 5.0;
/// Highest MPG value ever reported.
pub const MPG_MAX: f64 = 60.0;
/// Full-scale value of the progress indicator.
pub const MPG_REFERENCE_SCALE: f64 = 50.0;

/// A model output after clamping to `[MPG_MIN, MPG_MAX]`.
///
/// The raw value is kept alongside for diagnostics; everything user-facing
/// reads `mpg()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    raw: f64,
    mpg: f64,
}

impl Prediction {
    /// Clamp a raw model output. Infinities land on the nearest bound; NaN
    /// never gets here (the model reports it as an error).
    pub fn from_raw(raw: f64) -> Self {
        Self {
            raw,
            mpg: raw.clamp(MPG_MIN, MPG_MAX),
        }
    }

    pub fn mpg(&self) -> f64 {
        self.mpg
    }

    pub fn raw(&self) -> f64 {
        self.raw
    }

    pub fn was_clamped(&self) -> bool {
        self.raw != self.mpg
    }
}
