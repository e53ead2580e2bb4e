use std::collections::HashMap;
use std::path::Path;

/// Builds the title -> TMDB id mapping from the bulk metadata CSV.
///
/// The dump is noisy: malformed rows shift columns around, and the id column
/// carries stray dates and free text. Rows whose id does not coerce to a
/// positive number are dropped, and duplicate titles keep their first
/// occurrence in file order.
///
/// Any failure opening or reading the file degrades to an empty map; the
/// service stays up and enrichment falls back to placeholder content.
pub fn load_id_map(path: impl AsRef<Path>) -> HashMap<String, u64> {
    match build_id_map(path.as_ref()) {
        Ok(map) => {
            tracing::info!(titles = map.len(), "External id mapping built");
            map
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %path.as_ref().display(),
                "Failed to build external id mapping, enrichment will degrade"
            );
            HashMap::new()
        }
    }
}

fn build_id_map(path: &Path) -> Result<HashMap<String, u64>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let id_col = headers.iter().position(|h| h == "id");
    let title_col = headers.iter().position(|h| h == "title");
    let (id_col, title_col) = match (id_col, title_col) {
        (Some(id), Some(title)) => (id, title),
        _ => {
            tracing::warn!("Metadata CSV is missing an id or title column");
            return Ok(HashMap::new());
        }
    };

    let mut map = HashMap::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        let id = record.get(id_col).and_then(coerce_id);
        let title = record.get(title_col).filter(|t| !t.is_empty());
        match (id, title) {
            (Some(id), Some(title)) => {
                // first occurrence wins on duplicate titles
                map.entry(title.to_string()).or_insert(id);
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Dropped metadata rows with unusable ids or titles");
    }

    Ok(map)
}

/// Numeric coercion for the id column: parse through f64 the way the offline
/// pipeline coerces the column, then truncate. Non-finite and non-positive
/// values are rejected.
fn coerce_id(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value >= 1.0 {
        Some(value as u64)
    } else {
        None
    }
}
