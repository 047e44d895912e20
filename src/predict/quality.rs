use serde::{Deserialize, Serialize};

use super::{PredictionKind, Render};
use crate::theme::Palette;

/// Potability prediction for water samples.
pub struct WaterQuality;

impl PredictionKind for WaterQuality {
    const NAME: &'static str = "quality";
    const TITLE: &'static str = "Water Quality Prediction";
    const ACTION: &'static str = "Predict Water Quality";
    // The quality page never declared a filter on its file input.
    const ACCEPT: Option<&'static str> = None;

    type Output = QualityReport;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub potability_prediction: Vec<f64>,
}

impl QualityReport {
    /// `(sample number, formatted potability)`, sample numbers start at 1.
    pub fn rows(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.potability_prediction
            .iter()
            .enumerate()
            .map(|(i, p)| (i + 1, two_decimals(*p)))
    }
}

/// Two-decimal text where exact halves round away from zero, matching how
/// the web dashboard printed scores. `{:.2}` alone rounds them to even.
fn two_decimals(p: f64) -> String {
    // Only multiples of 1/8 with an odd numerator sit exactly on a third-decimal 5.
    let eighths = p * 8.0;
    if eighths.is_finite() && eighths.fract() == 0.0 && eighths.rem_euclid(2.0) == 1.0 {
        format!("{:.2}", (p * 100.0).round() / 100.0)
    } else {
        format!("{p:.2}")
    }
}

impl Render for QualityReport {
    fn render(&self, palette: &Palette) -> String {
        if self.potability_prediction.is_empty() {
            return String::new();
        }
        let width = self.potability_prediction.len().to_string().len().max("Sample".len());
        let mut out = String::new();
        out.push_str(&palette.heading("Prediction Results"));
        out.push('\n');
        out.push_str(&palette.heading(&format!("{:<width$}  Potability", "Sample")));
        out.push('\n');
        for (i, (sample, potability)) in self.rows().enumerate() {
            out.push_str(&palette.stripe(i, &format!("{sample:<width$}  {potability}")));
            out.push('\n');
        }
        out
    }
}
