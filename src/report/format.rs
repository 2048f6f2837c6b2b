//! Formatted terminal output.
//!
//! Formatting lives in one place so the TUI widgets and the `predict` /
//! `features` commands print exactly the same strings.

use crate::domain::{MPG_REFERENCE_SCALE, Prediction, VehicleSpec};
use crate::features::FeatureVector;

/// Metric label shown for a prediction, e.g. `21.50 MPG`.
pub fn format_mpg(prediction: &Prediction) -> String {
    format!("{:.2} MPG", prediction.mpg())
}

/// Fill level of the progress indicator, `min(mpg / 50, 1.0)`.
pub fn progress_ratio(prediction: &Prediction) -> f64 {
    (prediction.mpg() / MPG_REFERENCE_SCALE).min(1.0)
}

pub fn reference_scale_caption() -> String {
    format!("Reference scale: 0–{MPG_REFERENCE_SCALE:.0} MPG")
}

/// Rows of the "Core Specs" group.
pub fn core_spec_rows(spec: &VehicleSpec) -> Vec<(&'static str, String)> {
    vec![
        ("weight", format!("{:.0}", spec.weight)),
        ("horsepower", format!("{:.0}", spec.horsepower)),
        ("displacement", format!("{:.0}", spec.displacement)),
    ]
}

/// Rows of the "Additional Specs" group.
pub fn additional_spec_rows(spec: &VehicleSpec) -> Vec<(&'static str, String)> {
    vec![
        ("acceleration", format!("{:.1}", spec.acceleration)),
        ("model_year", spec.model_year.to_string()),
        ("cylinders", spec.cylinders.count().to_string()),
        ("origin", spec.origin.category().to_string()),
    ]
}

/// Plain-text summary of the inputs, both groups.
pub fn format_spec_summary(spec: &VehicleSpec) -> String {
    let mut out = String::new();
    out.push_str("Core Specs\n");
    for (name, value) in core_spec_rows(spec) {
        out.push_str(&format!("  {name:<14} {value:>8}\n"));
    }
    out.push_str("Additional Specs\n");
    for (name, value) in additional_spec_rows(spec) {
        out.push_str(&format!("  {name:<14} {value:>8}\n"));
    }
    out
}

/// One line per feature, in model order.
pub fn format_feature_vector(features: &FeatureVector) -> String {
    let mut out = String::new();
    for (i, (name, value)) in features.named_values().enumerate() {
        out.push_str(&format!("{i:>2}  {name:<16} {value}\n"));
    }
    out
}

/// Text rendering of the prediction result with a fixed-width bar.
pub fn format_prediction(prediction: &Prediction, bar_width: usize) -> String {
    let filled = (progress_ratio(prediction) * bar_width as f64).round() as usize;
    let filled = filled.min(bar_width);
    format!(
        "Predicted Efficiency: {}\n[{}{}]\n{}",
        format_mpg(prediction),
        "#".repeat(filled),
        "-".repeat(bar_width - filled),
        reference_scale_caption(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Cylinders, Origin};
    use crate::features::transform;

    #[test]
    fn clamped_values_display_with_two_decimals() {
        assert_eq!(format_mpg(&Prediction::from_raw(2.0)), "5.00 MPG");
        assert_eq!(format_mpg(&Prediction::from_raw(75.0)), "60.00 MPG");
        assert_eq!(format_mpg(&Prediction::from_raw(21.456)), "21.46 MPG");
    }

    #[test]
    fn progress_saturates_at_reference_scale() {
        assert!((progress_ratio(&Prediction::from_raw(25.0)) - 0.5).abs() < 1e-12);
        assert_eq!(progress_ratio(&Prediction::from_raw(50.0)), 1.0);
        assert_eq!(progress_ratio(&Prediction::from_raw(58.0)), 1.0);
        assert!((progress_ratio(&Prediction::from_raw(-3.0)) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn spec_groups_match_form_sections() {
        let spec = VehicleSpec {
            cylinders: Cylinders::Six,
            origin: Origin::Europe,
            ..VehicleSpec::default()
        };
        let core: Vec<&str> = core_spec_rows(&spec).iter().map(|(n, _)| *n).collect();
        assert_eq!(core, ["weight", "horsepower", "displacement"]);

        let extra = additional_spec_rows(&spec);
        assert_eq!(extra[0], ("acceleration", "15.0".to_string()));
        assert_eq!(extra[2], ("cylinders", "6".to_string()));
        assert_eq!(extra[3], ("origin", "2".to_string()));
    }

    #[test]
    fn feature_listing_is_in_model_order() {
        let text = format_feature_vector(&transform(&VehicleSpec::default()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].contains("cylinders") && lines[0].contains("\"4\""));
        assert!(lines[6].contains("origin") && lines[6].contains("\"1\""));
        assert!(lines[9].contains("acc_per_hp"));
    }

    #[test]
    fn text_bar_reflects_ratio() {
        let text = format_prediction(&Prediction::from_raw(25.0), 10);
        assert!(text.contains("25.00 MPG"));
        assert!(text.contains("[#####-----]"));
        assert!(text.ends_with("Reference scale: 0–50 MPG"));
    }
}
