//! Vehicle specification types.
//!
//! A [`VehicleSpec`] is the raw, human-facing description of a car as entered
//! in the form (or on the command line). It is built fresh for every request
//! and never mutated afterwards.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Input bounds enforced by the form controls and the CLI parsers.
pub mod bounds {
    use std::ops::RangeInclusive;

    pub const WEIGHT: RangeInclusive<f64> = 1500.0..=5200.0;
    pub const HORSEPOWER: RangeInclusive<f64> = 40.0..=250.0;
    pub const DISPLACEMENT: RangeInclusive<f64> = 60.0..=460.0;
    pub const ACCELERATION: RangeInclusive<f64> = 8.0..=25.0;
    /// Two-digit model year (70 = 1970).
    pub const MODEL_YEAR: RangeInclusive<u8> = 70..=82;
}

/// Engine cylinder count. Only the counts present in the training data are
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum Cylinders {
    #[serde(rename = "3")]
    #[value(name = "3")]
    Three,
    #[serde(rename = "4")]
    #[value(name = "4")]
    Four,
    #[serde(rename = "5")]
    #[value(name = "5")]
    Five,
    #[serde(rename = "6")]
    #[value(name = "6")]
    Six,
    #[serde(rename = "8")]
    #[value(name = "8")]
    Eight,
}

impl Cylinders {
    pub const ALL: [Cylinders; 5] = [
        Cylinders::Three,
        Cylinders::Four,
        Cylinders::Five,
        Cylinders::Six,
        Cylinders::Eight,
    ];

    pub fn count(self) -> u8 {
        match self {
            Cylinders::Three => 3,
            Cylinders::Four => 4,
            Cylinders::Five => 5,
            Cylinders::Six => 6,
            Cylinders::Eight => 8,
        }
    }

    /// Categorical encoding used by the model (`"4"`, `"8"`, ...).
    pub fn category(self) -> &'static str {
        match self {
            Cylinders::Three => "3",
            Cylinders::Four => "4",
            Cylinders::Five => "5",
            Cylinders::Six => "6",
            Cylinders::Eight => "8",
        }
    }
}

/// Region of manufacture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Usa,
    Europe,
    Asia,
}

impl Origin {
    pub const ALL: [Origin; 3] = [Origin::Usa, Origin::Europe, Origin::Asia];

    pub fn display_name(self) -> &'static str {
        match self {
            Origin::Usa => "USA",
            Origin::Europe => "Europe",
            Origin::Asia => "Asia",
        }
    }

    /// Categorical encoding used by the model.
    pub fn category(self) -> &'static str {
        match self {
            Origin::Usa => "1",
            Origin::Europe => "2",
            Origin::Asia => "3",
        }
    }
}

/// Raw vehicle attributes for a single prediction request.
///
/// Range checking is the job of whoever collects the values (form sliders,
/// CLI parsers); the transformer downstream relies on `horsepower >= 40` and
/// `cylinders >= 3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub weight: f64,
    pub horsepower: f64,
    pub displacement: f64,
    pub acceleration: f64,
    pub model_year: u8,
    pub cylinders: Cylinders,
    pub origin: Origin,
}

#[cfg(test)]
impl VehicleSpec {
    /// True when every numeric field lies inside its input bound. NaN is
    /// never contained in a range.
    pub(crate) fn is_within_bounds(&self) -> bool {
        bounds::WEIGHT.contains(&self.weight)
            && bounds::HORSEPOWER.contains(&self.horsepower)
            && bounds::DISPLACEMENT.contains(&self.displacement)
            && bounds::ACCELERATION.contains(&self.acceleration)
            && bounds::MODEL_YEAR.contains(&self.model_year)
    }
}

impl Default for VehicleSpec {
    /// The form's initial position.
    fn default() -> Self {
        Self {
            weight: 3000.0,
            horsepower: 130.0,
            displacement: 200.0,
            acceleration: 15.0,
            model_year: 79,
            cylinders: Cylinders::Four,
            origin: Origin::Usa,
        }
    }
}
