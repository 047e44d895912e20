//! Citizen complaints read from the `Complains` collection.

use anyhow::Result;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::store::{RealtimeStore, display_value};
use crate::theme::Palette;

/// Store path of the complaints collection.
pub const COLLECTION: &str = "Complains";

/// Fields of one stored record. Anything missing or null renders empty;
/// other scalars render as their JSON text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Record {
    #[serde(deserialize_with = "text")]
    date: String,
    #[serde(deserialize_with = "text")]
    description: String,
    #[serde(deserialize_with = "optional_text")]
    image_url: Option<String>,
    #[serde(deserialize_with = "text")]
    location: String,
    #[serde(rename = "type", deserialize_with = "text")]
    kind: String,
}

fn optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        v => Some(display_value(&v)),
    })
}

fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    /// Key of the record in the store.
    pub id: String,
    pub date: String,
    pub description: String,
    pub image_url: Option<String>,
    pub location: String,
    pub kind: String,
}

impl Complaint {
    fn from_record(id: String, record: Record) -> Self {
        Self {
            id,
            date: record.date,
            description: record.description,
            image_url: record.image_url.filter(|u| !u.is_empty()),
            location: record.location,
            kind: record.kind,
        }
    }
}

/// Turn the collection value into rows. Objects are keyed by record id;
/// arrays (numeric keys) use the index and skip holes.
pub fn decode(value: Value) -> Result<Vec<Complaint>> {
    let entries: Vec<(String, Value)> = match value {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Value::Null => Vec::new(),
        other => anyhow::bail!("complaints collection is not a list: {other}"),
    };

    Ok(entries
        .into_iter()
        .filter_map(|(id, v)| match serde_json::from_value::<Record>(v) {
            Ok(record) => Some(Complaint::from_record(id, record)),
            Err(e) => {
                warn!(id = %id, error = %e, "skipping malformed complaint");
                None
            }
        })
        .collect())
}

/// Read the whole collection once.
pub async fn fetch(store: &dyn RealtimeStore) -> Result<Vec<Complaint>> {
    match store.get(COLLECTION).await? {
        Some(value) => decode(value),
        None => Ok(Vec::new()),
    }
}

pub fn render(complaints: &[Complaint], palette: &Palette) -> String {
    const HEADERS: [&str; 6] = ["ID", "Date", "Description", "Image", "Location", "Type"];

    let rows: Vec<[&str; 6]> = complaints
        .iter()
        .map(|c| {
            [
                c.id.as_str(),
                c.date.as_str(),
                c.description.as_str(),
                c.image_url.as_deref().unwrap_or("No image"),
                c.location.as_str(),
                c.kind.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str; 6]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&palette.heading(&line(&HEADERS)));
    out.push('\n');
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&palette.stripe(i, &line(row)));
        out.push('\n');
    }
    out
}
