//! Report rows: the tabular anomaly summary exported alongside a response.
//!
//! Rendering (PDF, HTML) stays outside the core; this module only shapes
//! the rows and writes the CSV artifact.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::error::AnalysisError;

/// At most this many anomaly rows appear in a report.
pub const MAX_REPORT_ROWS: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyRow {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: Option<f64>,
    pub vol_spike: Option<f64>,
    pub atr: Option<f64>,
    pub adx: Option<f64>,
}

impl AnomalyRow {
    fn from_bar(bar: &Bar) -> Self {
        Self {
            date: bar.date,
            close: bar.close,
            rsi: bar.rsi,
            vol_spike: bar.vol_spike,
            atr: bar.atr,
            adx: bar.adx,
        }
    }
}

/// First [`MAX_REPORT_ROWS`] anomalous bars, in date order.
pub fn anomaly_rows(bars: &[Bar]) -> Vec<AnomalyRow> {
    bars.iter()
        .filter(|b| b.is_anomalous())
        .take(MAX_REPORT_ROWS)
        .map(AnomalyRow::from_bar)
        .collect()
}

/// Write rows as CSV to any writer.
pub fn write_csv<W: Write>(writer: W, rows: &[AnomalyRow]) -> Result<(), AnalysisError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| AnalysisError::FeatureComputation(format!("CSV export failed: {e}")))?;
    }
    csv_writer
        .flush()
        .map_err(|e| AnalysisError::FeatureComputation(format!("CSV export failed: {e}")))?;
    Ok(())
}

/// Write rows as a CSV file at `path`.
pub fn write_csv_file(path: &Path, rows: &[AnomalyRow]) -> Result<(), AnalysisError> {
    let file = std::fs::File::create(path)
        .map_err(|e| AnalysisError::FeatureComputation(format!("cannot create {path:?}: {e}")))?;
    write_csv(file, rows)
}
