//! Shared prediction pipeline used by both the CLI and the TUI front-ends.
//!
//! VehicleSpec -> FeatureVector -> model -> clamp
//!
//! The model is passed in by the caller; it is loaded once at startup and
//! never reloaded.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{MPG_MAX, MPG_MIN, Prediction, VehicleSpec};
use crate::features::{FeatureVector, transform};
use crate::models::{PredictionError, Regressor};

/// All computed outputs of a single "Calculate MPG" action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRun {
    pub spec: VehicleSpec,
    pub features: FeatureVector,
    pub prediction: Prediction,
}

/// Run the full pipeline for one vehicle.
pub fn run_prediction<M>(model: &M, spec: &VehicleSpec) -> Result<PredictionRun, PredictionError>
where
    M: Regressor + ?Sized,
{
    let features = transform(spec);
    let raw = model.predict(&features)?;
    let prediction = Prediction::from_raw(raw);

    debug!(raw, mpg = prediction.mpg(), "prediction");
    if prediction.was_clamped() {
        warn!(raw, min = MPG_MIN, max = MPG_MAX, "model output outside plausible range, clamped");
    }

    Ok(PredictionRun {
        spec: *spec,
        features,
        prediction,
    })
}
