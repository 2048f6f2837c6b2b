//! `VehicleSpec` → `FeatureVector`.
//!
//! The field order of [`FeatureVector`] is a contract with the trained model:
//! the artifact stores split feature indices, not names. Reordering the struct
//! fields, [`FEATURE_NAMES`] or [`FeatureVector::values`] requires retraining.

use serde::{Deserialize, Serialize};

use crate::domain::VehicleSpec;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 10;

/// Feature names in model order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "cylinders",
    "displacement",
    "horsepower",
    "weight",
    "acceleration",
    "model_year",
    "origin",
    "power_to_weight",
    "disp_per_cyl",
    "acc_per_hp",
];

/// Whether a model input is read as a number or as a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Numeric,
    Categorical,
}

/// Kinds in model order (parallel to [`FEATURE_NAMES`]).
pub const FEATURE_KINDS: [FeatureKind; FEATURE_COUNT] = [
    FeatureKind::Categorical,
    FeatureKind::Numeric,
    FeatureKind::Numeric,
    FeatureKind::Numeric,
    FeatureKind::Numeric,
    FeatureKind::Numeric,
    FeatureKind::Categorical,
    FeatureKind::Numeric,
    FeatureKind::Numeric,
    FeatureKind::Numeric,
];

/// A single model input, borrowed from a [`FeatureVector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Numeric(f64),
    Categorical(&'a str),
}

impl FeatureValue<'_> {
    pub fn kind(&self) -> FeatureKind {
        match self {
            FeatureValue::Numeric(_) => FeatureKind::Numeric,
            FeatureValue::Categorical(_) => FeatureKind::Categorical,
        }
    }
}

impl std::fmt::Display for FeatureValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureValue::Numeric(v) => write!(f, "{v}"),
            FeatureValue::Categorical(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Model input record. Field declaration order is the model order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub cylinders: String,
    pub displacement: f64,
    pub horsepower: f64,
    pub weight: f64,
    pub acceleration: f64,
    pub model_year: f64,
    pub origin: String,
    pub power_to_weight: f64,
    pub disp_per_cyl: f64,
    pub acc_per_hp: f64,
}

impl FeatureVector {
    /// Values in model order.
    pub fn values(&self) -> [FeatureValue<'_>; FEATURE_COUNT] {
        [
            FeatureValue::Categorical(&self.cylinders),
            FeatureValue::Numeric(self.displacement),
            FeatureValue::Numeric(self.horsepower),
            FeatureValue::Numeric(self.weight),
            FeatureValue::Numeric(self.acceleration),
            FeatureValue::Numeric(self.model_year),
            FeatureValue::Categorical(&self.origin),
            FeatureValue::Numeric(self.power_to_weight),
            FeatureValue::Numeric(self.disp_per_cyl),
            FeatureValue::Numeric(self.acc_per_hp),
        ]
    }

    /// `(name, value)` pairs in model order.
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, FeatureValue<'_>)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }
}

/// Derive the engineered ratios and assemble the model input.
///
/// Pure and deterministic. Assumes `horsepower > 0`, `weight > 0`, which the
/// input bounds guarantee (cylinders is at least 3 by construction).
pub fn transform(spec: &VehicleSpec) -> FeatureVector {
    let cylinders = f64::from(spec.cylinders.count());

    let power_to_weight = spec.horsepower / spec.weight;
    let disp_per_cyl = spec.displacement / cylinders;
    let acc_per_hp = spec.acceleration / spec.horsepower;

    FeatureVector {
        cylinders: spec.cylinders.category().to_string(),
        displacement: spec.displacement,
        horsepower: spec.horsepower,
        weight: spec.weight,
        acceleration: spec.acceleration,
        model_year: f64::from(spec.model_year),
        origin: spec.origin.category().to_string(),
        power_to_weight,
        disp_per_cyl,
        acc_per_hp,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::vehicle::strategies::vehicle_spec;
    use crate::domain::{Cylinders, Origin};

    fn reference_spec() -> VehicleSpec {
        VehicleSpec {
            weight: 3000.0,
            horsepower: 130.0,
            displacement: 200.0,
            acceleration: 15.0,
            model_year: 79,
            cylinders: Cylinders::Four,
            origin: Origin::Usa,
        }
    }

    #[test]
    fn reference_vehicle_features() {
        let fv = transform(&reference_spec());

        assert_eq!(fv.cylinders, "4");
        assert_eq!(fv.displacement, 200.0);
        assert_eq!(fv.horsepower, 130.0);
        assert_eq!(fv.weight, 3000.0);
        assert_eq!(fv.acceleration, 15.0);
        assert_eq!(fv.model_year, 79.0);
        assert_eq!(fv.origin, "1");
        assert_eq!(fv.power_to_weight, 130.0 / 3000.0);
        assert_eq!(fv.disp_per_cyl, 50.0);
        assert_eq!(fv.acc_per_hp, 15.0 / 130.0);
    }

    #[test]
    fn values_follow_contract_order() {
        let fv = transform(&reference_spec());
        let values = fv.values();

        assert_eq!(values[0], FeatureValue::Categorical("4"));
        assert_eq!(values[1], FeatureValue::Numeric(200.0));
        assert_eq!(values[2], FeatureValue::Numeric(130.0));
        assert_eq!(values[3], FeatureValue::Numeric(3000.0));
        assert_eq!(values[4], FeatureValue::Numeric(15.0));
        assert_eq!(values[5], FeatureValue::Numeric(79.0));
        assert_eq!(values[6], FeatureValue::Categorical("1"));
        assert_eq!(values[7], FeatureValue::Numeric(130.0 / 3000.0));
        assert_eq!(values[8], FeatureValue::Numeric(50.0));
        assert_eq!(values[9], FeatureValue::Numeric(15.0 / 130.0));

        for (value, kind) in values.iter().zip(FEATURE_KINDS) {
            assert_eq!(value.kind(), kind);
        }
    }

    #[test]
    fn serialized_field_order_matches_names() {
        let fv = transform(&reference_spec());
        let json = serde_json::to_string(&fv).unwrap();

        let positions: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|name| json.find(&format!("\"{name}\":")).expect("field present"))
            .collect();
        assert!(
            positions.windows(2).all(|w| w[0] < w[1]),
            "fields out of order in {json}"
        );

        let names: Vec<&str> = fv.named_values().map(|(n, _)| n).collect();
        assert_eq!(names, FEATURE_NAMES);
    }

    #[test]
    fn every_origin_maps_to_its_code() {
        for (origin, code) in [(Origin::Usa, "1"), (Origin::Europe, "2"), (Origin::Asia, "3")] {
            let spec = VehicleSpec {
                origin,
                ..reference_spec()
            };
            assert_eq!(transform(&spec).origin, code);
        }
    }

    proptest! {
        #[test]
        fn ratios_are_positive_and_finite(spec in vehicle_spec()) {
            let fv = transform(&spec);
            prop_assert!(fv.power_to_weight > 0.0 && fv.power_to_weight.is_finite());
            prop_assert!(fv.disp_per_cyl > 0.0 && fv.disp_per_cyl.is_finite());
            prop_assert!(fv.acc_per_hp > 0.0 && fv.acc_per_hp.is_finite());
        }

        #[test]
        fn kinds_and_order_hold_for_every_input(spec in vehicle_spec()) {
            let fv = transform(&spec);
            let names: Vec<&str> = fv.named_values().map(|(n, _)| n).collect();
            prop_assert_eq!(names, FEATURE_NAMES.to_vec());
            for (value, kind) in fv.values().iter().zip(FEATURE_KINDS) {
                prop_assert_eq!(value.kind(), kind);
            }
            prop_assert_eq!(fv.cylinders, spec.cylinders.count().to_string());
            prop_assert_eq!(fv.origin.as_str(), spec.origin.category());
        }

        #[test]
        fn transform_is_deterministic(spec in vehicle_spec()) {
            prop_assert_eq!(transform(&spec), transform(&spec));
        }
    }
}
