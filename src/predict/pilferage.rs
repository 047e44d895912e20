use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use super::{PredictionKind, Render};
use crate::theme::Palette;

/// Pilferage detection from flow readings.
pub struct Pilferage;

impl PredictionKind for Pilferage {
    const NAME: &'static str = "pilferage";
    const TITLE: &'static str = "Upload CSV File";
    const ACTION: &'static str = "Check Pilferage";
    const ACCEPT: Option<&'static str> = Some("csv");

    type Output = PilferageReport;
}

/// Sensors bucketed by flow quantile. Each list is independent.
///
/// The service echoes whatever its `Sensor_Node` column holds, so ids may
/// arrive as strings or numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilferageReport {
    #[serde(deserialize_with = "sensor_ids")]
    pub warning: Vec<String>,
    #[serde(deserialize_with = "sensor_ids")]
    pub high_risk: Vec<String>,
    #[serde(deserialize_with = "sensor_ids")]
    pub pilferage: Vec<String>,
}

fn sensor_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(number_label(&n)),
            other => Err(D::Error::custom(format!(
                "sensor id must be a string or number, got {other}"
            ))),
        })
        .collect()
}

/// Whole floats print without a fraction (`7.0` shows as `7`).
fn number_label(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

impl PilferageReport {
    /// Section headings paired with their sensors, in display order.
    pub fn sections(&self) -> [(&'static str, &[String]); 3] {
        [
            ("Warning Sensors", self.warning.as_slice()),
            ("High Risk Sensors", self.high_risk.as_slice()),
            ("Pilferage Sensors", self.pilferage.as_slice()),
        ]
    }
}

impl Render for PilferageReport {
    fn render(&self, palette: &Palette) -> String {
        let mut out = String::new();
        for (i, (heading, sensors)) in self.sections().into_iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&palette.heading(&format!("{heading}:")));
            out.push('\n');
            for sensor in sensors {
                out.push_str(&format!("  • {sensor}\n"));
            }
        }
        out
    }
}
