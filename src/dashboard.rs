//! Dashboard summary cards fed from the realtime store.

use tracing::warn;

use crate::store::{RealtimeStore, display_value};
use crate::theme::Palette;

/// Litres shown on the static monthly leakage banner.
pub const MONTHLY_LEAK_DETECTS_LITERS: u32 = 930;

/// Values shown on the dashboard. Each starts at a fixed default and is only
/// replaced when the store has a value for its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub water_saved: String,
    pub active_sensors: String,
    pub frauds_detected: String,
    pub leaks_detected: String,
    pub reported_complaints: String,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            water_saved: String::new(),
            active_sensors: "38".to_string(),
            frauds_detected: "6".to_string(),
            leaks_detected: "3".to_string(),
            reported_complaints: "4".to_string(),
        }
    }
}

impl Summary {
    /// Store keys paired with the field each one fills.
    fn slots(&mut self) -> [(&'static str, &mut String); 5] {
        [
            ("WaterSaved", &mut self.water_saved),
            ("activeSensors", &mut self.active_sensors),
            ("fraudsDetected", &mut self.frauds_detected),
            ("leaksDetected", &mut self.leaks_detected),
            ("reportedComplaints", &mut self.reported_complaints),
        ]
    }

    /// Read all five keys concurrently. A missing key or a failed read keeps
    /// the default.
    pub async fn fetch(store: &dyn RealtimeStore) -> Self {
        let mut summary = Summary::default();
        let mut slots = summary.slots();
        let reads: Vec<_> = slots.iter().map(|(key, _)| store.get(*key)).collect();
        let results = futures::future::join_all(reads).await;
        for ((key, slot), result) in slots.iter_mut().zip(results) {
            match result {
                Ok(Some(value)) => **slot = display_value(&value),
                Ok(None) => {}
                Err(e) => warn!(key = *key, error = %e, "keeping default dashboard value"),
            }
        }
        summary
    }

    pub fn render(&self, palette: &Palette) -> String {
        let cards = [
            (&self.leaks_detected, "Leak Detects"),
            (&self.frauds_detected, "Fraud Detects"),
            (&self.reported_complaints, "Reported Complaints"),
            (&self.active_sensors, "Active Sensors"),
        ];
        let mut out = String::new();
        out.push_str(&palette.heading("Water Saved"));
        out.push('\n');
        out.push_str(&format!("  {} liters\n\n", self.water_saved));
        for (value, label) in cards {
            out.push_str(&format!("  {value:>6}  {label}\n"));
        }
        out.push('\n');
        out.push_str(&palette.heading("Leakage Detections"));
        out.push('\n');
        out.push_str(&format!(
            "  {MONTHLY_LEAK_DETECTS_LITERS} liters  Monthly Detects\n"
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn absent_keys_keep_defaults() {
        let store = MemoryStore::new();
        let summary = Summary::fetch(&store).await;
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.active_sensors, "38");
        assert_eq!(summary.water_saved, "");
    }

    #[tokio::test]
    async fn present_keys_replace_defaults() {
        let store = MemoryStore::new()
            .with("WaterSaved", json!("1500"))
            .with("leaksDetected", json!(7))
            .with("reportedComplaints", json!("11"));
        let summary = Summary::fetch(&store).await;
        assert_eq!(summary.water_saved, "1500");
        assert_eq!(summary.leaks_detected, "7");
        assert_eq!(summary.reported_complaints, "11");
        assert_eq!(summary.active_sensors, "38");
        assert_eq!(summary.frauds_detected, "6");
    }

    #[tokio::test]
    async fn failed_read_keeps_default_and_continues() {
        let store = MemoryStore::new()
            .failing("activeSensors")
            .with("fraudsDetected", json!("9"));
        let summary = Summary::fetch(&store).await;
        assert_eq!(summary.active_sensors, "38");
        assert_eq!(summary.frauds_detected, "9");
    }

    #[test]
    fn render_shows_every_card() {
        let out = Summary::default().render(&Palette::plain());
        for label in [
            "Water Saved",
            "Leak Detects",
            "Fraud Detects",
            "Reported Complaints",
            "Active Sensors",
            "930 liters",
        ] {
            assert!(out.contains(label), "missing {label}");
        }
        assert!(out.contains("    38  Active Sensors"));
    }
}
