//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Leak detection service (pressure readings in, per-node verdicts out).
pub const LEAKAGE_ENDPOINT: &str = "http://localhost:8000/predict";

/// Pilferage service (flow readings in, risk buckets out).
pub const PILFERAGE_ENDPOINT: &str = "http://localhost:5000/pilferage";

/// Water-quality service (sample features in, potability scores out).
pub const QUALITY_ENDPOINT: &str = "http://127.0.0.1:5200/predict";

/// Name of the multipart field every prediction service reads the CSV from.
pub const UPLOAD_FIELD: &str = "file";

/// Content type declared on uploaded parts.
pub const CSV_MIME: &str = "text/csv";

/// Realtime database backing the dashboard and complaints pages.
pub const DEFAULT_STORE_URL: &str = "https://healthrakshak-bd7e3-default-rtdb.firebaseio.com";

/// Environment variable holding an optional database auth token.
pub const STORE_TOKEN_ENV: &str = "JALRAKSHAK_STORE_TOKEN";

/// Accent colour used until the user picks one.
pub const DEFAULT_THEME_COLOR: &str = "#03C9D7";

/// Artificial latency of the mock outbreak feed.
pub const MOCK_OUTBREAK_LATENCY_MS: u64 = 300;

/// Default database path: `~/.jalrakshak/jalrakshak.db`.
/// Holds config and manual case reports. Falls back to the working
/// directory when no home directory can be determined.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jalrakshak")
        .join("jalrakshak.db")
}
