use serde::{Deserialize, Serialize};

use super::{Alert, PredictionKind, Render};
use crate::theme::Palette;

/// Leak detection from pressure readings.
pub struct Leakage;

impl PredictionKind for Leakage {
    const NAME: &'static str = "leak";
    const TITLE: &'static str = "Upload Pressure Data CSV File";
    const ACTION: &'static str = "Check Leak";
    const ACCEPT: Option<&'static str> = Some("csv");

    type Output = LeakReport;
}

/// Verdict for one sensor node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakReading {
    pub sensor_node: String,
    pub leak_detected: bool,
}

/// The service answers with a bare JSON array of readings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeakReport {
    pub readings: Vec<LeakReading>,
}

impl LeakReport {
    /// Leaking nodes first. Order within each group is kept.
    pub fn by_severity(&self) -> Vec<&LeakReading> {
        let mut rows: Vec<&LeakReading> = self.readings.iter().collect();
        rows.sort_by_key(|r| !r.leak_detected);
        rows
    }

    pub fn any_leak(&self) -> bool {
        self.readings.iter().any(|r| r.leak_detected)
    }
}

impl Render for LeakReport {
    fn render(&self, palette: &Palette) -> String {
        let rows = self.by_severity();
        let width = rows
            .iter()
            .map(|r| r.sensor_node.chars().count())
            .chain(std::iter::once("Sensor Node".len()))
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        out.push_str(&palette.heading(&format!("{:<width$}  Leak Detected", "Sensor Node")));
        out.push('\n');
        for (i, row) in rows.iter().enumerate() {
            let verdict = if row.leak_detected { "Yes" } else { "No" };
            let line = format!("{:<width$}  {verdict}", row.sensor_node);
            let line = if row.leak_detected {
                palette.danger(&line)
            } else {
                palette.stripe(i, &line)
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn alert(&self) -> Option<Alert> {
        self.any_leak().then(|| Alert {
            title: "Leak Detected!".to_string(),
            message: "One or more sensor nodes have detected a leak.".to_string(),
        })
    }
}
