use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::Disease;

/// A case reported by hand from the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    pub village: String,
    pub symptoms: String,
    pub water_source: String,
    pub disease: Disease,
}

/// A stored report with its row id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredReport {
    pub id: i64,
    pub timestamp: String,
    pub report: CaseReport,
}

/// SQLite-backed log of manual case reports.
pub struct ReportLog {
    conn: Mutex<Connection>,
}

impl ReportLog {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open report database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS case_reports (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp    TEXT NOT NULL DEFAULT (datetime('now')),
                village      TEXT NOT NULL,
                symptoms     TEXT NOT NULL,
                water_source TEXT NOT NULL,
                disease      TEXT NOT NULL
            )",
        )
        .context("failed to create case_reports table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Store a report and return its row id.
    pub fn submit(&self, report: &CaseReport) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO case_reports (village, symptoms, water_source, disease)
             VALUES (?1, ?2, ?3, ?4)",
            [
                report.village.as_str(),
                report.symptoms.as_str(),
                report.water_source.as_str(),
                report.disease.as_str(),
            ],
        )
        .context("failed to save case report")?;
        Ok(conn.last_insert_rowid())
    }

    /// The last `limit` reports, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredReport>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, village, symptoms, water_source, disease
             FROM case_reports ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit as i64], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, timestamp, village, symptoms, water_source, disease)| {
                Ok(StoredReport {
                    id,
                    timestamp,
                    report: CaseReport {
                        village,
                        symptoms,
                        water_source,
                        disease: disease.parse()?,
                    },
                })
            })
            .collect()
    }
}
