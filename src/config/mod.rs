//! Key-value configuration storage backed by SQLite.
//!
//! Shares a database with [`ReportLog`](crate::outbreak::reports::ReportLog).
//! Raw values are strings; [`Settings`] is the typed view the CLI works with.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

use crate::consts::{DEFAULT_STORE_URL, LEAKAGE_ENDPOINT, PILFERAGE_ENDPOINT, QUALITY_ENDPOINT};
use crate::theme::{Color, Theme, ThemeMode};

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn get(&self, key: Key) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key.as_str()])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Validate and store a value (upsert).
    pub fn set(&self, key: Key, value: &str) -> Result<()> {
        key.validate(value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key.as_str(), value.trim()],
        )
        .with_context(|| format!("failed to save {key}"))?;
        Ok(())
    }

    pub fn remove(&self, key: Key) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", [key.as_str()])?;
        Ok(())
    }

    /// All stored pairs, sorted by key.
    pub fn entries(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT key, value FROM config ORDER BY key ASC")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Known configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ThemeColor,
    ThemeMode,
    StoreUrl,
    LeakageEndpoint,
    PilferageEndpoint,
    QualityEndpoint,
}

impl Key {
    pub const ALL: [Key; 6] = [
        Key::ThemeColor,
        Key::ThemeMode,
        Key::StoreUrl,
        Key::LeakageEndpoint,
        Key::PilferageEndpoint,
        Key::QualityEndpoint,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Key::ThemeColor => "theme.color",
            Key::ThemeMode => "theme.mode",
            Key::StoreUrl => "store.url",
            Key::LeakageEndpoint => "endpoint.leakage",
            Key::PilferageEndpoint => "endpoint.pilferage",
            Key::QualityEndpoint => "endpoint.quality",
        }
    }

    fn validate(self, value: &str) -> Result<()> {
        let value = value.trim();
        match self {
            Key::ThemeColor => value.parse::<Color>().map(|_| ()),
            Key::ThemeMode => value.parse::<ThemeMode>().map(|_| ()),
            Key::StoreUrl
            | Key::LeakageEndpoint
            | Key::PilferageEndpoint
            | Key::QualityEndpoint => {
                if value.starts_with("http://") || value.starts_with("https://") {
                    Ok(())
                } else {
                    bail!("{self} must be an http(s) URL, got: {value}")
                }
            }
        }
    }
}

impl FromStr for Key {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Key::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .with_context(|| {
                let known: Vec<_> = Key::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown config key: {s} (known: {})", known.join(", "))
            })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective settings after stored values are applied over the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: Theme,
    pub store_url: String,
    pub leakage_endpoint: String,
    pub pilferage_endpoint: String,
    pub quality_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            store_url: DEFAULT_STORE_URL.to_string(),
            leakage_endpoint: LEAKAGE_ENDPOINT.to_string(),
            pilferage_endpoint: PILFERAGE_ENDPOINT.to_string(),
            quality_endpoint: QUALITY_ENDPOINT.to_string(),
        }
    }
}

impl Settings {
    /// Read every known key. Values that no longer parse fall back to the default.
    pub fn load(config: &Config) -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(color) = config.get(Key::ThemeColor)? {
            match color.parse() {
                Ok(c) => settings.theme.color = c,
                Err(e) => tracing::warn!(error = %e, "ignoring stored theme colour"),
            }
        }
        if let Some(mode) = config.get(Key::ThemeMode)? {
            match mode.parse() {
                Ok(m) => settings.theme.mode = m,
                Err(e) => tracing::warn!(error = %e, "ignoring stored theme mode"),
            }
        }
        if let Some(url) = config.get(Key::StoreUrl)? {
            settings.store_url = url;
        }
        if let Some(url) = config.get(Key::LeakageEndpoint)? {
            settings.leakage_endpoint = url;
        }
        if let Some(url) = config.get(Key::PilferageEndpoint)? {
            settings.pilferage_endpoint = url;
        }
        if let Some(url) = config.get(Key::QualityEndpoint)? {
            settings.quality_endpoint = url;
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get(Key::StoreUrl).unwrap().is_none());
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set(Key::ThemeMode, "light").unwrap();
        config.set(Key::ThemeMode, "dark").unwrap();
        assert_eq!(config.get(Key::ThemeMode).unwrap().unwrap(), "dark");
    }

    #[test]
    fn set_rejects_invalid_values() {
        let config = mem_config();
        assert!(config.set(Key::ThemeColor, "blue").is_err());
        assert!(config.set(Key::LeakageEndpoint, "localhost:8000").is_err());
        assert!(config.get(Key::ThemeColor).unwrap().is_none());
    }

    #[test]
    fn remove_nonexistent_is_ok() {
        let config = mem_config();
        config.remove(Key::QualityEndpoint).unwrap();
    }

    #[test]
    fn entries_are_sorted() {
        let config = mem_config();
        config.set(Key::ThemeMode, "dark").unwrap();
        config.set(Key::LeakageEndpoint, "http://10.0.0.2:8000/predict").unwrap();
        let entries = config.entries().unwrap();
        assert_eq!(entries[0].0, "endpoint.leakage");
        assert_eq!(entries[1].0, "theme.mode");
    }

    #[test]
    fn key_round_trips_through_str() {
        for key in Key::ALL {
            assert_eq!(key.as_str().parse::<Key>().unwrap(), key);
        }
        assert!("theme.font".parse::<Key>().is_err());
    }

    #[test]
    fn settings_default_when_empty() {
        let config = mem_config();
        assert_eq!(Settings::load(&config).unwrap(), Settings::default());
    }

    #[test]
    fn settings_pick_up_stored_values() {
        let config = mem_config();
        config.set(Key::ThemeMode, "dark").unwrap();
        config.set(Key::ThemeColor, "#FB9678").unwrap();
        config
            .set(Key::PilferageEndpoint, "http://flow.local:5000/pilferage")
            .unwrap();

        let settings = Settings::load(&config).unwrap();
        assert_eq!(settings.theme.mode, ThemeMode::Dark);
        assert_eq!(settings.theme.color.to_string(), "#FB9678");
        assert_eq!(settings.pilferage_endpoint, "http://flow.local:5000/pilferage");
        assert_eq!(settings.leakage_endpoint, LEAKAGE_ENDPOINT);
    }

    #[test]
    fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-test.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set(Key::StoreUrl, "https://example.firebaseio.com").unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(
                config.get(Key::StoreUrl).unwrap().unwrap(),
                "https://example.firebaseio.com"
            );
        }
    }
}
