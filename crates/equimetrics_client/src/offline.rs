//! Offline CSV summary, mirroring the server-side computation locally.
//!
//! Desktop use: visualize a CSV without a backend. Column lookup runs
//! through one schema-normalization pass that maps header aliases (case
//! variants, unit-suffixed names like `FLOWRATE (L/MIN)`) to canonical
//! field names; everything downstream works on canonical names only.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

/// Summary computed locally over a CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSummary {
    pub total_count: usize,
    /// Rounded to 2 decimals; 0 when no parseable values exist.
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    /// Ordered by descending count, ties broken alphabetically, matching
    /// the server's distribution order.
    pub type_distribution: IndexMap<String, i64>,
}

/// Offline summary failures.
#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// No header resolved to the given canonical column.
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
}

/// Canonical column names the offline summary operates on.
const COL_TYPE: &str = "equipment_type";
const COL_FLOWRATE: &str = "flowrate";
const COL_PRESSURE: &str = "pressure";
const COL_TEMPERATURE: &str = "temperature";

/// Map a raw header to its canonical column name, if it has one.
///
/// Normalization is a single rule, not a per-call alias branch: lowercase,
/// strip a trailing parenthesized unit, trim. So `FLOWRATE (L/MIN)`,
/// `Flowrate` and `flowrate` all resolve to `flowrate`, and `Type` resolves
/// to `equipment_type`.
fn canonical_column(header: &str) -> Option<&'static str> {
    let lowered = header.to_ascii_lowercase();
    let stripped = match lowered.find(" (") {
        Some(pos) => &lowered[..pos],
        None => lowered.as_str(),
    };
    match stripped.trim() {
        "equipment_type" | "type" => Some(COL_TYPE),
        "flowrate" => Some(COL_FLOWRATE),
        "pressure" => Some(COL_PRESSURE),
        "temperature" => Some(COL_TEMPERATURE),
        _ => None,
    }
}

/// Compute the local summary over a CSV file.
pub fn summarize_local_csv(path: &std::path::Path) -> Result<LocalSummary, OfflineError> {
    let file = std::fs::File::open(path)?;
    summarize_local_reader(file)
}

/// Compute the local summary over any CSV reader.
pub fn summarize_local_reader<R: std::io::Read>(input: R) -> Result<LocalSummary, OfflineError> {
    let mut reader = csv::Reader::from_reader(input);

    // Normalize headers once; first match wins if a file carries duplicates.
    let mut positions: IndexMap<&'static str, usize> = IndexMap::new();
    for (i, header) in reader.headers()?.iter().enumerate() {
        if let Some(canonical) = canonical_column(header) {
            positions.entry(canonical).or_insert(i);
        }
    }

    let type_pos = *positions
        .get(COL_TYPE)
        .ok_or(OfflineError::MissingColumn(COL_TYPE))?;
    let flow_pos = *positions
        .get(COL_FLOWRATE)
        .ok_or(OfflineError::MissingColumn(COL_FLOWRATE))?;
    let pressure_pos = *positions
        .get(COL_PRESSURE)
        .ok_or(OfflineError::MissingColumn(COL_PRESSURE))?;
    let temp_pos = *positions
        .get(COL_TEMPERATURE)
        .ok_or(OfflineError::MissingColumn(COL_TEMPERATURE))?;

    let mut total = 0usize;
    let mut flow = MeanAcc::default();
    let mut pressure = MeanAcc::default();
    let mut temperature = MeanAcc::default();
    let mut counts: IndexMap<String, i64> = IndexMap::new();

    for row in reader.records() {
        let row = row?;
        total += 1;

        // Unparseable numeric cells are skipped, matching the tolerant
        // behavior of the visualization path (this is not the ingestion
        // validator).
        flow.push_parsed(row.get(flow_pos));
        pressure.push_parsed(row.get(pressure_pos));
        temperature.push_parsed(row.get(temp_pos));

        let kind = row.get(type_pos).unwrap_or("").trim();
        if !kind.is_empty() {
            *counts.entry(kind.to_string()).or_insert(0) += 1;
        }
    }

    counts.sort_by(|ka, va, kb, vb| vb.cmp(va).then_with(|| ka.cmp(kb)));

    debug!(rows = total, types = counts.len(), "Local CSV summarized");

    Ok(LocalSummary {
        total_count: total,
        avg_flowrate: flow.mean(),
        avg_pressure: pressure.mean(),
        avg_temperature: temperature.mean(),
        type_distribution: counts,
    })
}

#[derive(Default)]
struct MeanAcc {
    sum: f64,
    n: u32,
}

impl MeanAcc {
    fn push_parsed(&mut self, cell: Option<&str>) {
        if let Some(value) = cell.and_then(|c| c.trim().parse::<f64>().ok()) {
            self.sum += value;
            self.n += 1;
        }
    }

    fn mean(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        ((self.sum / self.n as f64) * 100.0).round() / 100.0
    }
}
