use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{MetricTable, NumericSeries, MISSING};
use crate::error::AlignError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a metrics CSV, dropping the last `skip_footer` records.
///
/// CSV layout: header row with metric names (`time-ms`,
/// `kafka-consumer:fetch-total`, ...), then one row per sample. The load
/// generator appends a summary line, which is what `skip_footer` removes.
pub fn load_metric_table(path: &Path, skip_footer: usize) -> Result<MetricTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    read_metric_table(file, skip_footer).with_context(|| format!("reading {}", path.display()))
}

/// Same as [`load_metric_table`] over any reader.
pub fn read_metric_table<R: Read>(input: R, skip_footer: usize) -> Result<MetricTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        // Short rows (typically the summary line) read as missing cells.
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    let keep = rows.len().saturating_sub(skip_footer);
    rows.truncate(keep);

    Ok(MetricTable::new(headers, rows))
}

// ---------------------------------------------------------------------------
// Column extraction
// ---------------------------------------------------------------------------

/// Extract a named column as a series.
///
/// Empty cells and `NaN` / `NA` spellings become missing markers; any other
/// non-numeric cell fails with [`AlignError::InvalidInput`].
pub fn column(table: &MetricTable, name: &str) -> Result<NumericSeries> {
    let idx = table
        .column_index(name)
        .with_context(|| format!("CSV missing '{name}' column"))?;

    table
        .rows
        .iter()
        .enumerate()
        .map(|(row_no, row)| {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            parse_cell(cell).ok_or_else(|| {
                anyhow::Error::new(AlignError::InvalidInput(format!(
                    "row {row_no}, column '{name}': '{cell}' is not a number"
                )))
            })
        })
        .collect()
}

/// The x axis for a run: the time column with no missing samples allowed.
pub fn time_axis(table: &MetricTable, name: &str) -> Result<NumericSeries> {
    let axis = column(table, name)?;
    if axis.count() != axis.len() {
        bail!(
            "time column '{name}' has {} missing values",
            axis.len() - axis.count()
        );
    }
    Ok(axis)
}

fn parse_cell(cell: &str) -> Option<f64> {
    match cell {
        "" | "NaN" | "nan" | "NA" | "N/A" => Some(MISSING),
        other => other.parse::<f64>().ok(),
    }
}
