use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use super::{DailyPoint, Disease, Hotspot, OutbreakSnapshot, OutbreakSource, OutbreakSummary};

const DAYS: u32 = 30;
const VILLAGES: [&str; 3] = ["Village A", "Village B", "Village C"];

/// Random but plausible outbreak data, for demos until a real feed exists.
pub struct MockOutbreakSource {
    rng: Mutex<StdRng>,
    latency: Duration,
    today: Option<NaiveDate>,
}

impl MockOutbreakSource {
    pub fn new(latency: Duration) -> Self {
        let seed: u64 = rand::rng().random();
        Self::seeded(seed, latency)
    }

    /// Reproducible data, for tests.
    pub fn seeded(seed: u64, latency: Duration) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            latency,
            today: None,
        }
    }

    /// Pin the last day of the series instead of using the local date.
    pub fn ending(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn generate(&self, disease: Disease) -> OutbreakSnapshot {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let mut rng = self.rng.lock().unwrap();

        let time_series = (0..DAYS)
            .map(|i| {
                let wave = (8.0 * (f64::from(i) / 5.0).sin()).floor() as i64;
                let cases = (10 + wave + rng.random_range(0..6)).max(0) as u32;
                DailyPoint {
                    date: today
                        .checked_sub_days(Days::new(u64::from(DAYS - 1 - i)))
                        .unwrap_or(today),
                    cases,
                    symptoms: cases + rng.random_range(0..5),
                    turbidity: 2.0 + rng.random_range(0.0..4.0),
                }
            })
            .collect();

        let risk_score = (40 + rng.random_range(0..60u8)).min(95);
        let hotspots = VILLAGES
            .iter()
            .zip([24, 18, 11])
            .map(|(name, predicted_cases)| Hotspot {
                name: name.to_string(),
                predicted_cases,
            })
            .collect();
        let summary = OutbreakSummary {
            villages_reporting: 12 + rng.random_range(0..6),
            suspected_outbreaks: 1 + rng.random_range(0..4),
            unsafe_sources: 3 + rng.random_range(0..5),
        };
        let flagged_village = VILLAGES[rng.random_range(0..VILLAGES.len())].to_string();

        OutbreakSnapshot {
            disease,
            risk_score,
            time_series,
            hotspots,
            summary,
            flagged_village,
        }
    }
}

#[async_trait]
impl OutbreakSource for MockOutbreakSource {
    async fn snapshot(&self, disease: Disease) -> Result<OutbreakSnapshot> {
        tokio::time::sleep(self.latency).await;
        Ok(self.generate(disease))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(seed: u64) -> MockOutbreakSource {
        MockOutbreakSource::seeded(seed, Duration::ZERO)
            .ending(NaiveDate::from_ymd_opt(2024, 3, 30).unwrap())
    }

    #[tokio::test]
    async fn series_covers_thirty_days_ending_today() {
        let snap = source(1).snapshot(Disease::Cholera).await.unwrap();
        assert_eq!(snap.time_series.len(), 30);
        assert_eq!(
            snap.time_series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(
            snap.time_series.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 3, 30).unwrap()
        );
    }

    #[tokio::test]
    async fn values_stay_in_generator_ranges() {
        for seed in 0..20 {
            let snap = source(seed).snapshot(Disease::Typhoid).await.unwrap();
            assert!((40..=95).contains(&snap.risk_score));
            assert!((12..18).contains(&snap.summary.villages_reporting));
            assert!((1..5).contains(&snap.summary.suspected_outbreaks));
            assert!((3..8).contains(&snap.summary.unsafe_sources));
            assert!(VILLAGES.contains(&snap.flagged_village.as_str()));
            for p in &snap.time_series {
                assert!(p.symptoms >= p.cases && p.symptoms < p.cases + 5);
                assert!((2.0..6.0).contains(&p.turbidity));
            }
        }
    }

    #[tokio::test]
    async fn hotspots_are_fixed() {
        let snap = source(3).snapshot(Disease::Cholera).await.unwrap();
        let cases: Vec<_> = snap.hotspots.iter().map(|h| h.predicted_cases).collect();
        assert_eq!(cases, vec![24, 18, 11]);
    }

    #[tokio::test]
    async fn same_seed_same_data() {
        let a = source(42).snapshot(Disease::Diarrhea).await.unwrap();
        let b = source(42).snapshot(Disease::Diarrhea).await.unwrap();
        assert_eq!(a, b);
    }
}
