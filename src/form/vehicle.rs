//! The vehicle configuration form.
//!
//! Collection is continuous: [`VehicleForm::spec`] always reflects the current
//! control positions. Prediction is triggered separately by the caller.

use crate::domain::{Cylinders, Origin, VehicleSpec, bounds};
use crate::form::control::{COARSE_STEPS, Choice, Slider};

/// Form rows in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Weight,
    Horsepower,
    Displacement,
    Acceleration,
    ModelYear,
    Cylinders,
    Origin,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Weight,
        Field::Horsepower,
        Field::Displacement,
        Field::Acceleration,
        Field::ModelYear,
        Field::Cylinders,
        Field::Origin,
    ];
}

/// How a control should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjust {
    Step(i64),
    Coarse(i64),
    ToMin,
    ToMax,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleForm {
    weight: Slider,
    horsepower: Slider,
    displacement: Slider,
    acceleration: Slider,
    model_year: Slider,
    cylinders: Choice<Cylinders>,
    origin: Choice<Origin>,
}

impl Default for VehicleForm {
    fn default() -> Self {
        Self::from_spec(&VehicleSpec::default())
    }
}

impl VehicleForm {
    /// Build a form positioned at `spec` (out-of-range values are clamped).
    pub fn from_spec(spec: &VehicleSpec) -> Self {
        let year_range = f64::from(*bounds::MODEL_YEAR.start())..=f64::from(*bounds::MODEL_YEAR.end());
        let cylinders_index = Cylinders::ALL
            .iter()
            .position(|c| *c == spec.cylinders)
            .unwrap_or(1);
        let origin_index = Origin::ALL
            .iter()
            .position(|o| *o == spec.origin)
            .unwrap_or(0);

        Self {
            weight: Slider::new("Weight (lbs)", bounds::WEIGHT, spec.weight, 0),
            horsepower: Slider::new("Horsepower", bounds::HORSEPOWER, spec.horsepower, 0),
            displacement: Slider::new("Displacement (cu. in.)", bounds::DISPLACEMENT, spec.displacement, 0),
            acceleration: Slider::new("Acceleration (0–60 time)", bounds::ACCELERATION, spec.acceleration, 1),
            model_year: Slider::new(
                "Model Year (70 = 1970)",
                year_range,
                f64::from(spec.model_year),
                0,
            ),
            cylinders: Choice::new("Cylinders", &Cylinders::ALL, cylinders_index),
            origin: Choice::new("Origin", &Origin::ALL, origin_index),
        }
    }

    /// Current inputs as a fresh, immutable spec.
    pub fn spec(&self) -> VehicleSpec {
        VehicleSpec {
            weight: self.weight.value(),
            horsepower: self.horsepower.value(),
            displacement: self.displacement.value(),
            acceleration: self.acceleration.value(),
            model_year: self.model_year.value() as u8,
            cylinders: self.cylinders.selected(),
            origin: self.origin.selected(),
        }
    }

    /// Apply an adjustment to one field. Returns whether any input changed.
    pub fn adjust(&mut self, field: Field, adjust: Adjust) -> bool {
        if let Some(slider) = self.slider_mut(field) {
            return match adjust {
                Adjust::Step(n) => slider.step(n),
                Adjust::Coarse(n) => slider.step(n.saturating_mul(COARSE_STEPS)),
                Adjust::ToMin => slider.to_min(),
                Adjust::ToMax => slider.to_max(),
            };
        }

        match field {
            Field::Cylinders => adjust_choice(&mut self.cylinders, adjust),
            Field::Origin => adjust_choice(&mut self.origin, adjust),
            _ => false,
        }
    }

    pub fn label(&self, field: Field) -> &'static str {
        match field {
            Field::Cylinders => self.cylinders.label(),
            Field::Origin => self.origin.label(),
            _ => self.slider(field).map(Slider::label).unwrap_or_default(),
        }
    }

    /// Value as shown next to the control.
    pub fn display_value(&self, field: Field) -> String {
        match field {
            Field::Cylinders => self.cylinders.selected().count().to_string(),
            Field::Origin => self.origin.selected().display_name().to_string(),
            _ => self
                .slider(field)
                .map(Slider::display_value)
                .unwrap_or_default(),
        }
    }

    /// Control position in `0.0..=1.0` (sliders and selectors alike).
    pub fn fraction(&self, field: Field) -> f64 {
        let choice_fraction = |index: usize, len: usize| {
            if len <= 1 {
                0.0
            } else {
                index as f64 / (len - 1) as f64
            }
        };
        match field {
            Field::Cylinders => choice_fraction(self.cylinders.index(), self.cylinders.len()),
            Field::Origin => choice_fraction(self.origin.index(), self.origin.len()),
            _ => self.slider(field).map(Slider::fraction).unwrap_or_default(),
        }
    }

    pub fn is_selector(field: Field) -> bool {
        matches!(field, Field::Cylinders | Field::Origin)
    }

    fn slider(&self, field: Field) -> Option<&Slider> {
        match field {
            Field::Weight => Some(&self.weight),
            Field::Horsepower => Some(&self.horsepower),
            Field::Displacement => Some(&self.displacement),
            Field::Acceleration => Some(&self.acceleration),
            Field::ModelYear => Some(&self.model_year),
            Field::Cylinders | Field::Origin => None,
        }
    }

    fn slider_mut(&mut self, field: Field) -> Option<&mut Slider> {
        match field {
            Field::Weight => Some(&mut self.weight),
            Field::Horsepower => Some(&mut self.horsepower),
            Field::Displacement => Some(&mut self.displacement),
            Field::Acceleration => Some(&mut self.acceleration),
            Field::ModelYear => Some(&mut self.model_year),
            Field::Cylinders | Field::Origin => None,
        }
    }
}

/// Selectors have few options; coarse moves behave like single steps.
fn adjust_choice<T: Copy>(choice: &mut Choice<T>, adjust: Adjust) -> bool {
    match adjust {
        Adjust::Step(n) | Adjust::Coarse(n) => choice.step(n),
        Adjust::ToMin => choice.to_first(),
        Adjust::ToMax => choice.to_last(),
    }
}
