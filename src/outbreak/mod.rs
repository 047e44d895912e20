//! Water-borne disease outbreak monitoring.
//!
//! Data comes from an [`OutbreakSource`]. The only source today is
//! [`mock::MockOutbreakSource`]; rendering does not care which one is used.

pub mod mock;
pub mod reports;

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::theme::Palette;
use reports::{CaseReport, ReportLog};

/// How many alerts the banner keeps.
pub const ALERT_CAPACITY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disease {
    #[default]
    Cholera,
    Diarrhea,
    Typhoid,
    HepatitisA,
}

impl Disease {
    pub const ALL: [Disease; 4] = [
        Disease::Cholera,
        Disease::Diarrhea,
        Disease::Typhoid,
        Disease::HepatitisA,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Disease::Cholera => "cholera",
            Disease::Diarrhea => "diarrhea",
            Disease::Typhoid => "typhoid",
            Disease::HepatitisA => "hepatitis A",
        }
    }
}

impl FromStr for Disease {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match Disease::ALL
            .into_iter()
            .find(|d| d.as_str().to_ascii_lowercase() == wanted)
        {
            Some(d) => Ok(d),
            None => bail!(
                "unknown disease: {s} (expected one of: cholera, diarrhea, typhoid, hepatitis A)"
            ),
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub cases: u32,
    pub symptoms: u32,
    pub turbidity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotspot {
    pub name: String,
    pub predicted_cases: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutbreakSummary {
    pub villages_reporting: u32,
    pub suspected_outbreaks: u32,
    pub unsafe_sources: u32,
}

/// Everything the outbreak page shows for one disease.
#[derive(Debug, Clone, PartialEq)]
pub struct OutbreakSnapshot {
    pub disease: Disease,
    /// Percent, 0..=100.
    pub risk_score: u8,
    pub time_series: Vec<DailyPoint>,
    pub hotspots: Vec<Hotspot>,
    pub summary: OutbreakSummary,
    /// Village the source raises a high-risk alert for.
    pub flagged_village: String,
}

/// Where outbreak data comes from. Swap in a real analytics backend here.
#[async_trait]
pub trait OutbreakSource: Send + Sync {
    async fn snapshot(&self, disease: Disease) -> Result<OutbreakSnapshot>;
}

/// Newest-first alert list with a fixed capacity.
#[derive(Debug, Default)]
pub struct AlertFeed {
    items: VecDeque<String>,
}

impl AlertFeed {
    pub fn push(&mut self, alert: String) {
        self.items.push_front(alert);
        self.items.truncate(ALERT_CAPACITY);
    }

    pub fn items(&self) -> Vec<String> {
        self.items.iter().cloned().collect()
    }
}

/// The outbreak page: selected disease, alert banner, manual reports.
pub struct OutbreakPage {
    source: Box<dyn OutbreakSource>,
    reports: ReportLog,
    disease: Mutex<Disease>,
    alerts: Mutex<AlertFeed>,
}

impl OutbreakPage {
    pub fn new(source: Box<dyn OutbreakSource>, reports: ReportLog) -> Self {
        Self {
            source,
            reports,
            disease: Mutex::new(Disease::default()),
            alerts: Mutex::new(AlertFeed::default()),
        }
    }

    pub fn disease(&self) -> Disease {
        *self.disease.lock().unwrap()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().items()
    }

    pub fn reports(&self) -> &ReportLog {
        &self.reports
    }

    /// Change the selected disease without loading anything.
    pub fn select(&self, disease: Disease) {
        *self.disease.lock().unwrap() = disease;
    }

    /// Select `disease` and load its data, raising a high-risk alert.
    pub async fn load(&self, disease: Disease) -> Result<OutbreakSnapshot> {
        self.select(disease);
        let snapshot = self.source.snapshot(disease).await?;
        self.alerts.lock().unwrap().push(format!(
            "High Risk: {} in {}",
            snapshot.disease, snapshot.flagged_village
        ));
        Ok(snapshot)
    }

    /// Record a manual case report against the selected disease.
    pub fn report(&self, village: &str, symptoms: &str, water_source: &str) -> Result<CaseReport> {
        let report = CaseReport {
            village: village.trim().to_string(),
            symptoms: symptoms.trim().to_string(),
            water_source: water_source.trim().to_string(),
            disease: self.disease(),
        };
        if report.village.is_empty() {
            bail!("village name is required");
        }
        self.reports.submit(&report)?;
        self.alerts.lock().unwrap().push(format!(
            "New Report: {} ({})",
            report.village, report.disease
        ));
        Ok(report)
    }

    pub fn render(&self, snapshot: &OutbreakSnapshot, palette: &Palette) -> String {
        let mut out = String::new();
        out.push_str(&palette.heading("Outbreak Detection"));
        out.push_str(&format!("  ({})\n", snapshot.disease));
        out.push_str("Monitoring water-borne disease risks\n\n");

        out.push_str(&format!(
            "  Outbreak Risk         {}%\n",
            snapshot.risk_score
        ));
        out.push_str(&format!(
            "  Villages Reporting    {}\n",
            snapshot.summary.villages_reporting
        ));
        out.push_str(&format!(
            "  Suspected Outbreaks   {}\n",
            snapshot.summary.suspected_outbreaks
        ));
        out.push_str(&format!(
            "  Unsafe Water Sources  {}\n\n",
            snapshot.summary.unsafe_sources
        ));

        out.push_str(&palette.heading("Alerts"));
        out.push('\n');
        let alerts = self.alerts();
        if alerts.is_empty() {
            out.push_str("  • No alerts\n");
        }
        for alert in alerts {
            out.push_str(&format!("  • {alert}\n"));
        }
        out.push('\n');

        let days = snapshot.time_series.len();
        out.push_str(&palette.heading(&format!("Cases & Symptoms (last {days} days)")));
        out.push('\n');
        let cases: Vec<f64> = snapshot.time_series.iter().map(|p| p.cases as f64).collect();
        let symptoms: Vec<f64> = snapshot.time_series.iter().map(|p| p.symptoms as f64).collect();
        let turbidity: Vec<f64> = snapshot.time_series.iter().map(|p| p.turbidity).collect();
        out.push_str(&format!("  Cases      {}\n", sparkline(&cases)));
        out.push_str(&format!("  Symptoms   {}\n", sparkline(&symptoms)));
        if let (Some(first), Some(last)) = (snapshot.time_series.first(), snapshot.time_series.last()) {
            out.push_str(&format!("             {} .. {}\n", first.date, last.date));
        }
        out.push('\n');
        out.push_str(&palette.heading("Water Quality (turbidity)"));
        out.push('\n');
        out.push_str(&format!("  Turbidity  {}\n\n", sparkline(&turbidity)));

        out.push_str(&palette.heading("Geographical Hotspots (predicted cases)"));
        out.push('\n');
        let width = snapshot
            .hotspots
            .iter()
            .map(|h| h.name.chars().count())
            .max()
            .unwrap_or(0);
        for h in &snapshot.hotspots {
            out.push_str(&format!(
                "  {:<width$}  {} {}\n",
                h.name,
                "█".repeat(h.predicted_cases as usize),
                h.predicted_cases
            ));
        }
        out
    }
}

const SPARKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One block character per value, scaled between the series min and max.
pub fn sparkline(values: &[f64]) -> String {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                SPARKS[0]
            } else {
                let level = ((v - min) / span * (SPARKS.len() - 1) as f64).round() as usize;
                SPARKS[level.min(SPARKS.len() - 1)]
            }
        })
        .collect()
}
